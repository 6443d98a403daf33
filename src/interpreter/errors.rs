//! Runtime error types for the drawing-language interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to lex, parse or validation errors).
//!
//! All runtime errors are fatal: they halt execution, and the canvas writes of the
//! failing instruction are rolled back before the error is reported. `Display`
//! renders the message only; callers add the line number.

use crate::parser::ast::SourceLocation;
use std::fmt;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Variable read before any assignment executed
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// Operand or argument of the wrong type
    TypeError {
        expected: String,
        got: String,
        location: SourceLocation,
    },

    /// Division or modulo by zero
    DivisionError {
        operation: String,
        location: SourceLocation,
    },

    /// Integer overflow in arithmetic operation
    IntegerOverflow {
        operation: String,
        location: SourceLocation,
    },

    /// Direction component outside {-1, 0, 1}
    InvalidDirection {
        dir_x: i32,
        dir_y: i32,
        location: SourceLocation,
    },

    /// Non-positive brush size
    InvalidBrushSize { size: i32, location: SourceLocation },

    /// String that is not a palette color
    InvalidColor {
        name: String,
        location: SourceLocation,
    },

    /// Negative distance, radius, width or height
    InvalidArgument {
        message: String,
        location: SourceLocation,
    },

    /// Spawn or Fill at a position outside the canvas
    OutOfBounds {
        x: i32,
        y: i32,
        size: usize,
        location: SourceLocation,
    },

    /// GoTo to a label that does not exist
    UnknownLabel {
        name: String,
        location: SourceLocation,
    },

    /// Fill with a Transparent brush
    FillTransparent { location: SourceLocation },

    /// Run exceeded the configured number of executed instructions
    StepLimitExceeded {
        limit: usize,
        location: SourceLocation,
    },

    /// History/snapshot operation failed
    HistoryOperationFailed {
        message: String,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            RuntimeError::UndefinedVariable { location, .. }
            | RuntimeError::TypeError { location, .. }
            | RuntimeError::DivisionError { location, .. }
            | RuntimeError::IntegerOverflow { location, .. }
            | RuntimeError::InvalidDirection { location, .. }
            | RuntimeError::InvalidBrushSize { location, .. }
            | RuntimeError::InvalidColor { location, .. }
            | RuntimeError::InvalidArgument { location, .. }
            | RuntimeError::OutOfBounds { location, .. }
            | RuntimeError::UnknownLabel { location, .. }
            | RuntimeError::FillTransparent { location }
            | RuntimeError::StepLimitExceeded { location, .. }
            | RuntimeError::HistoryOperationFailed { location, .. } => location,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::UndefinedVariable { name, .. } => {
                write!(f, "Undefined variable '{}'", name)
            }
            RuntimeError::TypeError { expected, got, .. } => {
                write!(f, "Type error: expected {}, got {}", expected, got)
            }
            RuntimeError::DivisionError { operation, .. } => write!(f, "{}", operation),
            RuntimeError::IntegerOverflow { operation, .. } => {
                write!(f, "Integer overflow in operation: {}", operation)
            }
            RuntimeError::InvalidDirection { dir_x, dir_y, .. } => {
                write!(
                    f,
                    "Invalid direction ({}, {}): components must be -1, 0 or 1",
                    dir_x, dir_y
                )
            }
            RuntimeError::InvalidBrushSize { size, .. } => {
                write!(f, "Invalid brush size: {} (must be positive)", size)
            }
            RuntimeError::InvalidColor { name, .. } => write!(f, "Unknown color '{}'", name),
            RuntimeError::InvalidArgument { message, .. } => {
                write!(f, "Invalid argument: {}", message)
            }
            RuntimeError::OutOfBounds { x, y, size, .. } => {
                write!(
                    f,
                    "Position ({}, {}) is outside the {}x{} canvas",
                    x, y, size, size
                )
            }
            RuntimeError::UnknownLabel { name, .. } => write!(f, "Unknown label '{}'", name),
            RuntimeError::FillTransparent { .. } => {
                write!(f, "Cannot use Fill with a Transparent brush")
            }
            RuntimeError::StepLimitExceeded { limit, .. } => {
                write!(
                    f,
                    "Step limit of {} instructions exceeded (infinite GoTo loop?)",
                    limit
                )
            }
            RuntimeError::HistoryOperationFailed { message, .. } => {
                write!(f, "History operation failed: {}", message)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_accessor() {
        let err = RuntimeError::FillTransparent {
            location: SourceLocation::new(4, 1),
        };
        assert_eq!(err.location().line, 4);
    }

    #[test]
    fn test_display() {
        let err = RuntimeError::InvalidDirection {
            dir_x: 2,
            dir_y: 0,
            location: SourceLocation::new(1, 1),
        };
        assert_eq!(
            err.to_string(),
            "Invalid direction (2, 0): components must be -1, 0 or 1"
        );
    }
}
