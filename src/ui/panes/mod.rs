//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`canvas`]: The canvas grid with the brush marker
//! - [`source`]: Program source with highlighting and the current line indicator
//! - [`variables`]: Variable values at the current history position
//! - [`diagnostics`]: Warnings and errors of the run
//! - [`status`]: Status bar with keybindings and history position
//!
//! Each module exports one `render_*` function taking the frame, its area and
//! the data to draw, plus any scroll state it keeps between frames.

pub mod canvas;
pub mod diagnostics;
pub mod source;
pub mod status;
pub mod variables;

pub use canvas::render_canvas_pane;
pub use diagnostics::render_diagnostics_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use variables::render_variables_pane;
