//! Terminal viewer built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, auto-play
//! - **[`panes`]**: stateless render functions for each pane (canvas, source,
//!   variables, diagnostics, status bar)
//! - **[`theme`]**: color palette shared by all panes, and the mapping from
//!   canvas colors to terminal colors
//!
//! Construct an [`App`] from an [`Interpreter`] that ran with history enabled and
//! call [`App::run`] to start the event loop.
//!
//! [`Interpreter`]: crate::interpreter::engine::Interpreter
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
