//! Drawing-language execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Main interpreter with the instruction loop and history stepping
//! - [`errors`]: Runtime error types
//! - [`value`]: Runtime values
//! - [`constants`]: Defaults and limits
//!
//! # Execution Model
//!
//! The program is a flat list of instructions. A program counter walks it; a
//! `GoTo` whose condition holds sets the counter to its label's index, and the
//! normal increment then lands on the instruction after the label. Labels are
//! indexed once before the run.
//!
//! Each instruction runs inside a canvas undo journal, so a failing instruction
//! leaves no partial drawing behind. When history is enabled, a snapshot is taken
//! before the first instruction and after each executed one.

mod builtins;
pub mod constants;
pub mod engine;
pub mod errors;
mod expressions;
mod statements;
pub mod value;

pub use engine::Interpreter;
pub use errors::RuntimeError;
pub use value::Value;
