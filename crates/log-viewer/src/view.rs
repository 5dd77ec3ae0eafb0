//! View modes and text rendering.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::ViewerError;
use crate::scan::{LogFile, LogKind, list_logs, select_latest};
use crate::tail::tail_lines;

/// What the viewer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Latest game log, whole file unless a line limit is given.
    All,
    /// Latest error log, whole file unless a line limit is given.
    Errors,
    /// Last N lines of the latest game log.
    #[default]
    Latest,
    /// Every log file with size and modification time.
    List,
}

impl ViewMode {
    /// Line limit used when none is given on the command line.
    ///
    /// `Latest` tails `latest_default`; the other modes show whole files.
    pub fn default_lines(&self, latest_default: i64) -> i64 {
        match self {
            ViewMode::Latest => latest_default,
            ViewMode::All | ViewMode::Errors | ViewMode::List => 0,
        }
    }
}

/// Result of a view request, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// The logs directory does not exist.
    NoLogsDir(PathBuf),
    /// Directory listing, newest first. May be empty.
    Listing { dir: PathBuf, files: Vec<LogFile> },
    /// No log of the requested kind exists.
    Missing(LogKind),
    /// Content of the selected log, possibly tail-limited.
    Content {
        file: LogFile,
        text: String,
        /// Line limit that cut the file short, if any.
        limit: Option<usize>,
    },
}

/// Runs one view request against `logs_dir`.
///
/// Absence of the directory or of a matching log is a [`View`] variant, not
/// an error. Only scan and read failures are errors.
pub fn view(logs_dir: &Path, mode: ViewMode, lines: i64) -> Result<View, ViewerError> {
    if !logs_dir.is_dir() {
        tracing::debug!(dir = %logs_dir.display(), "logs directory missing");
        return Ok(View::NoLogsDir(logs_dir.to_path_buf()));
    }

    match mode {
        ViewMode::List => Ok(View::Listing {
            dir: logs_dir.to_path_buf(),
            files: list_logs(logs_dir)?,
        }),
        ViewMode::All | ViewMode::Latest => show_latest(logs_dir, LogKind::Game, lines),
        // Never falls back to the game log.
        ViewMode::Errors => show_latest(logs_dir, LogKind::Error, lines),
    }
}

fn show_latest(logs_dir: &Path, kind: LogKind, lines: i64) -> Result<View, ViewerError> {
    let Some(file) = select_latest(logs_dir, kind)? else {
        return Ok(View::Missing(kind));
    };

    let content = std::fs::read_to_string(&file.path).map_err(|e| ViewerError::Read {
        path: file.path.clone(),
        source: e,
    })?;

    let text = tail_lines(&content, lines).to_string();
    let limit = usize::try_from(lines)
        .ok()
        .filter(|n| *n > 0 && content.lines().count() > *n);
    tracing::debug!(file = %file.path.display(), lines, "read log file");

    Ok(View::Content { file, text, limit })
}

/// Runs a view request and renders the result, including any failure.
pub fn render(logs_dir: &Path, mode: ViewMode, lines: i64) -> String {
    match view(logs_dir, mode, lines) {
        Ok(v) => v.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "view failed");
            format!("✗ {e}")
        }
    }
}

fn format_timestamp(time: std::time::SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::NoLogsDir(dir) => write!(f, "✗ No logs directory found at {}", dir.display()),
            View::Listing { dir, files } if files.is_empty() => {
                write!(f, "✗ No log files found in {}", dir.display())
            }
            View::Listing { dir, files } => {
                writeln!(f, "Log files in {} ({} total):", dir.display(), files.len())?;
                for file in files {
                    writeln!(
                        f,
                        "  {:<40} {:>9.1} KB  {}",
                        file.name(),
                        file.size_kb(),
                        format_timestamp(file.modified)
                    )?;
                }
                Ok(())
            }
            View::Missing(LogKind::Error) => write!(f, "✗ No error log found"),
            View::Missing(LogKind::Game) => write!(f, "✗ No game log found"),
            View::Missing(kind) => write!(f, "✗ No {kind} log found"),
            View::Content { file, text, limit } => {
                match limit {
                    Some(n) => writeln!(f, "=== {} (last {n} lines) ===", file.name())?,
                    None => writeln!(f, "=== {} ===", file.name())?,
                }
                write!(f, "{text}")
            }
        }
    }
}
