// Snapshot management for stepping through execution history

use crate::canvas::{brush::Brush, Canvas};
use crate::interpreter::value::Value;
use crate::parser::ast::SourceLocation;
use rustc_hash::FxHashMap;

/// Snapshot of execution state
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub canvas: Canvas,
    pub brush: Brush,
    pub variables: FxHashMap<String, Value>,
    /// Index of the next instruction to execute
    pub instruction_index: usize,
    pub source_location: SourceLocation,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // Rough estimate: 32 bytes of overhead per variable plus the name
        let variables_size: usize = self
            .variables
            .iter()
            .map(|(name, value)| {
                32 + name.len()
                    + match value {
                        Value::Str(s) => s.len(),
                        _ => 0,
                    }
            })
            .sum();

        std::mem::size_of::<Self>() + self.canvas.estimated_size() + variables_size
    }
}

/// Manages execution history with a memory budget
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), String> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(format!(
                "Snapshot memory limit exceeded: {} + {} > {}",
                self.current_memory, snapshot_size, self.max_memory
            ));
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(size: usize) -> Snapshot {
        Snapshot {
            canvas: Canvas::new(size),
            brush: Brush::default(),
            variables: FxHashMap::default(),
            instruction_index: 0,
            source_location: SourceLocation::new(1, 1),
        }
    }

    #[test]
    fn test_push_within_budget() {
        let mut manager = SnapshotManager::new(1024 * 1024);
        manager.push(snapshot(8)).unwrap();
        manager.push(snapshot(8)).unwrap();

        assert_eq!(manager.len(), 2);
        assert!(manager.memory_usage() > 0);
        assert!(manager.get(1).is_some());
    }

    #[test]
    fn test_push_over_budget_fails() {
        let one = snapshot(16).estimated_size();
        let mut manager = SnapshotManager::new(one + one / 2);

        assert!(manager.push(snapshot(16)).is_ok());
        let err = manager.push(snapshot(16)).unwrap_err();
        assert!(err.contains("limit exceeded"));
        assert_eq!(manager.len(), 1);
    }
}
