//! Log viewer: discovers the game's rotating log files and renders them.
//!
//! The game writes `game_<timestamp>.log` and `errors_<timestamp>.log` into
//! its `logs` directory. This crate only reads them; every invocation
//! re-scans the directory.

mod error;
mod scan;
mod tail;
mod view;

pub use error::ViewerError;
pub use scan::{LOG_EXTENSION, LogFile, LogKind, list_logs, select_latest};
pub use tail::tail_lines;
pub use view::{View, ViewMode, render, view};

/// Default log directory name under the base directory.
pub const LOGS_DIR_NAME: &str = "logs";

/// Default number of lines shown by [`ViewMode::Latest`].
pub const DEFAULT_TAIL_LINES: i64 = 50;
