//! Static validation of parsed programs
//!
//! [`validate`] walks the program once in source order with a shared
//! [`SemanticContext`] and appends [`Diagnostic`]s; it never fails. Errors block
//! evaluation, warnings do not.
//!
//! - [`checks`]: one checker per instruction kind, plus expression checks
//! - [`types`]: static type inference for expressions
//!
//! # Simulated Brush
//!
//! The context tracks where the brush would be and which color it would hold,
//! as long as every step is a literal. Either can become unknown: after a draw
//! with non-literal arguments, and at every label, because control may arrive
//! there from any `GoTo`.

mod checks;
pub mod types;

use crate::canvas::ColorName;
use crate::parser::ast::{AstNode, Program, SourceLocation, ValueType};
use log::trace;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A validation finding attached to a source location
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: SourceLocation,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, location: SourceLocation) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            location,
        }
    }

    pub fn warning(message: impl Into<String>, location: SourceLocation) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: message.into(),
            location,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        };
        write!(f, "[{}] line {}: {}", tag, self.location.line, self.message)
    }
}

/// Brush state as far as it can be known statically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedBrush {
    pub position: Option<(i32, i32)>,
    pub color: Option<ColorName>,
}

impl Default for SimulatedBrush {
    fn default() -> Self {
        SimulatedBrush {
            position: None,
            color: Some(ColorName::Transparent),
        }
    }
}

impl SimulatedBrush {
    pub fn forget(&mut self) {
        self.position = None;
        self.color = None;
    }
}

/// State shared by all checkers during one validation pass
#[derive(Debug)]
pub struct SemanticContext {
    pub(crate) canvas_size: usize,
    pub(crate) brush: SimulatedBrush,
    /// Variables assigned so far, in program order
    pub(crate) declared: FxHashSet<String>,
    /// Statically known variable types
    pub(crate) types: FxHashMap<String, ValueType>,
    /// Label name -> instruction index
    pub(crate) labels: FxHashMap<String, usize>,
    pub(crate) errors: Vec<Diagnostic>,
    pub(crate) warnings: Vec<Diagnostic>,
    pub(crate) goto_count: usize,
    /// Index of the instruction being checked
    pub(crate) current_index: usize,
}

impl SemanticContext {
    pub fn new(canvas_size: usize) -> Self {
        SemanticContext {
            canvas_size,
            brush: SimulatedBrush::default(),
            declared: FxHashSet::default(),
            types: FxHashMap::default(),
            labels: FxHashMap::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
            goto_count: 0,
            current_index: 0,
        }
    }

    pub(crate) fn error(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.errors.push(Diagnostic::error(message, location));
    }

    pub(crate) fn warning(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.warnings.push(Diagnostic::warning(message, location));
    }

    pub fn canvas_size(&self) -> usize {
        self.canvas_size
    }

    pub fn brush(&self) -> &SimulatedBrush {
        &self.brush
    }

    pub fn variable_type(&self, name: &str) -> Option<ValueType> {
        self.types.get(name).copied()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn goto_count(&self) -> usize {
        self.goto_count
    }

    /// Errors and warnings merged in source order
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut all: Vec<Diagnostic> = self
            .errors
            .iter()
            .chain(self.warnings.iter())
            .cloned()
            .collect();
        all.sort_by_key(|d| (d.location.line, d.location.column));
        all
    }
}

/// Validate a whole program, appending diagnostics to `ctx`
pub fn validate(program: &Program, ctx: &mut SemanticContext) {
    check_program_shape(program, ctx);

    for (index, instruction) in program.instructions.iter().enumerate() {
        ctx.current_index = index;
        checks::check_instruction(instruction, ctx);
    }

    trace!(
        "validation finished: {} errors, {} warnings",
        ctx.errors.len(),
        ctx.warnings.len()
    );
}

/// Pre-pass: Spawn placement and label declarations
fn check_program_shape(program: &Program, ctx: &mut SemanticContext) {
    match program.instructions.first() {
        Some(AstNode::Spawn { .. }) => {}
        Some(first) => ctx.error("Program must start with Spawn", first.location()),
        None => ctx.error("Program must start with Spawn", SourceLocation::new(1, 1)),
    }

    for (index, instruction) in program.instructions.iter().enumerate() {
        match instruction {
            AstNode::Spawn { location, .. } if index > 0 => {
                ctx.error("Spawn can only be used once", *location);
            }
            AstNode::Label { name, location } => {
                if ctx.labels.contains_key(name) {
                    ctx.error(format!("Label '{}' is declared more than once", name), *location);
                } else {
                    ctx.labels.insert(name.clone(), index);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn check(source: &str) -> SemanticContext {
        let program = Parser::new(source).unwrap().parse_program().unwrap();
        let mut ctx = SemanticContext::new(10);
        validate(&program, &mut ctx);
        ctx
    }

    #[test]
    fn test_valid_program_is_clean() {
        let ctx = check("Spawn(0, 0)\nColor(\"Red\")\nDrawLine(0, 1, 5)\nFill()");
        assert!(!ctx.has_errors(), "{:?}", ctx.errors());
        assert!(ctx.warnings().is_empty());
        assert_eq!(ctx.brush().position, Some((5, 0)));
    }

    #[test]
    fn test_must_start_with_spawn() {
        let ctx = check("Color(\"Red\")\nSpawn(0, 0)");
        assert_eq!(ctx.errors().len(), 2);
        assert!(ctx.errors()[0].message.contains("must start with Spawn"));
        assert!(ctx.errors()[1].message.contains("only be used once"));
    }

    #[test]
    fn test_empty_program() {
        let program = Program::new();
        let mut ctx = SemanticContext::new(10);
        validate(&program, &mut ctx);
        assert!(ctx.has_errors());
    }

    #[test]
    fn test_duplicate_label() {
        let ctx = check("Spawn(0, 0)\nL\nL");
        assert!(ctx.errors()[0].message.contains("more than once"));
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::warning("Size adjusted to 3", SourceLocation::new(2, 1));
        assert_eq!(d.to_string(), "[Warning] line 2: Size adjusted to 3");
    }

    #[test]
    fn test_diagnostics_are_in_source_order() {
        let ctx = check("Spawn(0, 0)\nSize(2)\nColor(\"Pink\")");
        let lines: Vec<usize> = ctx.diagnostics().iter().map(|d| d.location.line).collect();
        assert_eq!(lines, vec![2, 3]);
    }
}
