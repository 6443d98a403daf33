//! # Introduction
//!
//! pixwall compiles and runs programs in a small pixel-drawing language: spawn a
//! brush on a square canvas, pick a color and size, draw lines, circles and
//! rectangles, flood-fill regions, and jump to labels on a condition.
//!
//! ```text
//! Spawn(0, 0)
//! Color("Red")
//! Size(3)
//! DrawLine(1, 1, 5)
//! n <- GetColorCount("Red", 0, 0, 9, 9)
//! GoTo[done](n > 20)
//! Fill()
//! done
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Validator → Interpreter → Canvas (+ Snapshots → TUI)
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds the AST.
//! 2. [`semantic`]: one static pass producing errors and warnings; any error
//!    stops the pipeline before execution.
//! 3. [`interpreter`]: runs the instructions against a [`canvas::Canvas`],
//!    optionally recording a [`snapshot::Snapshot`] after every instruction.
//! 4. [`session`]: the compile-and-run entry point, owning the [`config::Config`].
//! 5. [`ui`]: ratatui viewer for stepping through the recorded history; not part
//!    of the stable library API.

pub mod canvas;
pub mod config;
pub mod interpreter;
pub mod parser;
pub mod semantic;
pub mod session;
pub mod snapshot;
pub mod ui;
