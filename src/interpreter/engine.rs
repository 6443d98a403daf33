// Execution engine for the drawing language

use crate::canvas::{brush::Brush, Canvas};
use crate::interpreter::constants::DEFAULT_MAX_STEPS;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::value::Value;
use crate::parser::ast::*;
use crate::snapshot::{Snapshot, SnapshotManager};
use log::{debug, trace, warn};
use rustc_hash::FxHashMap;

/// Where execution continues after an instruction
pub(crate) enum Flow {
    Next,
    /// Jump to the label at this instruction index; execution resumes right after it
    JumpTo(usize),
}

/// The main interpreter that executes a drawing program
pub struct Interpreter {
    /// Instructions, in source order
    program: Program,

    /// Live canvas
    pub(crate) canvas: Canvas,

    /// Live brush
    pub(crate) brush: Brush,

    /// Flat variable namespace; last write wins
    pub(crate) variables: FxHashMap<String, Value>,

    /// Label name -> instruction index
    pub(crate) labels: FxHashMap<String, usize>,

    /// Index of the next instruction to execute
    program_counter: usize,

    /// Instructions executed so far
    steps: usize,
    max_steps: usize,

    /// Current source location being executed
    current_location: SourceLocation,

    /// Snapshot manager for history stepping; `None` when history is disabled
    snapshot_manager: Option<SnapshotManager>,

    /// Set once the history budget is exhausted
    recording_stopped: bool,

    /// Current position in execution history
    history_position: usize,

    /// Whether execution has finished
    finished: bool,

    /// Index of the instruction that raised a runtime error
    failed_instruction: Option<usize>,
}

impl Interpreter {
    /// Create a new interpreter for a validated program on a fresh `canvas_size` canvas
    pub fn new(program: Program, canvas_size: usize) -> Self {
        let mut labels = FxHashMap::default();
        for (index, node) in program.instructions.iter().enumerate() {
            if let AstNode::Label { name, .. } = node {
                labels.entry(name.clone()).or_insert(index);
            }
        }

        Interpreter {
            program,
            canvas: Canvas::new(canvas_size),
            brush: Brush::default(),
            variables: FxHashMap::default(),
            labels,
            program_counter: 0,
            steps: 0,
            max_steps: DEFAULT_MAX_STEPS,
            current_location: SourceLocation::new(1, 1),
            snapshot_manager: None,
            recording_stopped: false,
            history_position: 0,
            finished: false,
            failed_instruction: None,
        }
    }

    /// Limit the number of executed instructions
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Record a snapshot after every instruction, within `memory_limit` bytes
    pub fn with_history(mut self, memory_limit: usize) -> Self {
        self.snapshot_manager = Some(SnapshotManager::new(memory_limit));
        self
    }

    /// Run the program from start to finish
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        let program = std::mem::take(&mut self.program);
        let result = self.run_instructions(&program);
        self.program = program;

        self.finished = true;
        match &result {
            Ok(()) => debug!("run finished after {} steps", self.steps),
            Err(err) => debug!("run failed at line {}: {}", err.location().line, err),
        }
        result
    }

    fn run_instructions(&mut self, program: &Program) -> Result<(), RuntimeError> {
        self.take_snapshot();

        while let Some(instruction) = program.instructions.get(self.program_counter) {
            if self.steps >= self.max_steps {
                self.failed_instruction = Some(self.program_counter);
                return Err(RuntimeError::StepLimitExceeded {
                    limit: self.max_steps,
                    location: instruction.location(),
                });
            }
            self.steps += 1;

            let flow = match self.execute_instruction(instruction) {
                Ok(flow) => flow,
                Err(err) => {
                    self.failed_instruction = Some(self.program_counter);
                    return Err(err);
                }
            };

            self.program_counter = match flow {
                Flow::Next => self.program_counter + 1,
                Flow::JumpTo(label_index) => label_index + 1,
            };
            self.take_snapshot();
        }

        Ok(())
    }

    /// Execute one instruction. Canvas writes are undone if it fails.
    fn execute_instruction(&mut self, instruction: &AstNode) -> Result<Flow, RuntimeError> {
        self.current_location = instruction.location();
        trace!(
            "executing instruction {} at line {}",
            self.program_counter,
            self.current_location.line
        );

        self.canvas.begin_journal();
        let result = self.dispatch(instruction);
        if result.is_ok() {
            self.canvas.commit();
        } else {
            let restored = self.canvas.rollback();
            trace!("rolled back {} cells", restored);
        }
        result
    }

    fn dispatch(&mut self, instruction: &AstNode) -> Result<Flow, RuntimeError> {
        match instruction {
            AstNode::Spawn { x, y, location } => {
                self.execute_spawn(*x, *y, *location)?;
                Ok(Flow::Next)
            }

            AstNode::SetColor { name, location } => {
                self.execute_set_color(name, *location)?;
                Ok(Flow::Next)
            }

            AstNode::SetSize { size, location } => {
                self.execute_set_size(*size, *location)?;
                Ok(Flow::Next)
            }

            AstNode::DrawCommand {
                command,
                args,
                location,
            } => {
                self.execute_draw(*command, args, *location)?;
                Ok(Flow::Next)
            }

            AstNode::Fill { location } => {
                self.execute_fill(*location)?;
                Ok(Flow::Next)
            }

            AstNode::Assign { name, expr, .. } => {
                let value = self.evaluate_expr(expr)?;
                self.variables.insert(name.clone(), value);
                Ok(Flow::Next)
            }

            AstNode::Label { .. } => Ok(Flow::Next),

            AstNode::GoTo {
                label,
                condition,
                location,
            } => self.execute_goto(label, condition, *location),

            // A bare call or expression: evaluate for its errors, discard the value
            _ => {
                self.evaluate_expr(instruction)?;
                Ok(Flow::Next)
            }
        }
    }

    /// Take a snapshot of the current execution state
    fn take_snapshot(&mut self) {
        if self.recording_stopped {
            return;
        }
        let Some(manager) = self.snapshot_manager.as_mut() else {
            return;
        };

        let snapshot = Snapshot {
            canvas: self.canvas.clone(),
            brush: self.brush,
            variables: self.variables.clone(),
            instruction_index: self.program_counter,
            source_location: self.current_location,
        };

        match manager.push(snapshot) {
            Ok(()) => self.history_position = manager.len() - 1,
            Err(message) => {
                warn!("history recording stopped: {}", message);
                self.recording_stopped = true;
            }
        }
    }

    /// Restore execution state from a snapshot
    fn restore_snapshot(&mut self, index: usize) -> Result<(), RuntimeError> {
        let snapshot = self
            .snapshot_manager
            .as_ref()
            .and_then(|manager| manager.get(index))
            .cloned()
            .ok_or_else(|| RuntimeError::HistoryOperationFailed {
                message: format!("Snapshot {} not found in history", index),
                location: self.current_location,
            })?;

        self.canvas = snapshot.canvas;
        self.brush = snapshot.brush;
        self.variables = snapshot.variables;
        self.program_counter = snapshot.instruction_index;
        self.current_location = snapshot.source_location;
        self.history_position = index;
        Ok(())
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position == 0 {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "Already at the beginning of execution".to_string(),
                location: self.current_location,
            });
        }
        self.restore_snapshot(self.history_position - 1)
    }

    /// Step forward in execution (restore next snapshot)
    pub fn step_forward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position + 1 >= self.total_snapshots() {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "No more snapshots available (execution finished)".to_string(),
                location: self.current_location,
            });
        }
        self.restore_snapshot(self.history_position + 1)
    }

    /// Rewind to the beginning of execution history
    pub fn rewind_to_start(&mut self) -> Result<(), RuntimeError> {
        self.restore_snapshot(0)
    }

    /// Jump to the last recorded snapshot
    pub fn jump_to_end(&mut self) -> Result<(), RuntimeError> {
        match self.total_snapshots() {
            0 => Err(RuntimeError::HistoryOperationFailed {
                message: "No snapshots available".to_string(),
                location: self.current_location,
            }),
            n => self.restore_snapshot(n - 1),
        }
    }

    // ========== Getter methods ==========

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Take the canvas out of the interpreter
    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn variables(&self) -> &FxHashMap<String, Value> {
        &self.variables
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn program_counter(&self) -> usize {
        self.program_counter
    }

    pub fn current_location(&self) -> SourceLocation {
        self.current_location
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn failed_instruction(&self) -> Option<usize> {
        self.failed_instruction
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.as_ref().map_or(0, SnapshotManager::len)
    }

    /// True once history recording hit its memory budget
    pub fn history_truncated(&self) -> bool {
        self.recording_stopped
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
