// Constants for the drawing-language interpreter

/// Canvas size used when none is configured
pub const DEFAULT_CANVAS_SIZE: usize = 32;

/// Smallest and largest accepted canvas size; requests are clamped into this range
pub const MIN_CANVAS_SIZE: usize = 1;
pub const MAX_CANVAS_SIZE: usize = 512;

/// Executed instructions allowed per run before the run is aborted
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

/// Memory budget for execution history snapshots (256 MiB)
pub const DEFAULT_HISTORY_LIMIT: usize = 256 * 1024 * 1024;

/// A program with more `GoTo` instructions than this gets a single warning
pub const GOTO_WARNING_THRESHOLD: usize = 50;
