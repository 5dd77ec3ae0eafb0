//! Log directory scanning and latest-file selection.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::ViewerError;

/// Extension every log file carries.
pub const LOG_EXTENSION: &str = ".log";

/// Kind of log file, derived from its filename prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    Game,
    Error,
    Other,
}

/// Filename prefix for each known kind. Files matching none are `Other`.
const KIND_PREFIXES: &[(&str, LogKind)] = &[
    ("game_", LogKind::Game),
    ("errors_", LogKind::Error),
];

impl LogKind {
    /// Classifies a log filename. Only the prefix is considered.
    pub fn classify(file_name: &str) -> Self {
        KIND_PREFIXES
            .iter()
            .find(|(prefix, _)| file_name.starts_with(prefix))
            .map(|(_, kind)| *kind)
            .unwrap_or(LogKind::Other)
    }

    /// Returns the filename prefix for this kind, if it has one.
    pub fn prefix(&self) -> Option<&'static str> {
        KIND_PREFIXES
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(prefix, _)| *prefix)
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogKind::Game => write!(f, "game"),
            LogKind::Error => write!(f, "error"),
            LogKind::Other => write!(f, "other"),
        }
    }
}

/// A log file found in the logs directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub path: PathBuf,
    pub kind: LogKind,
    pub modified: SystemTime,
    pub size: u64,
}

impl LogFile {
    /// Returns the file name (not full path).
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Returns the size in kilobytes.
    pub fn size_kb(&self) -> f64 {
        self.size as f64 / 1024.0
    }
}

/// Lists every `*.log` file in `dir`, newest first.
pub fn list_logs(dir: &Path) -> Result<Vec<LogFile>, ViewerError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ViewerError::Scan {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut logs: Vec<LogFile> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(LOG_EXTENSION) {
                return None;
            }
            // Follows symlinks, so a link to a rotated log is listed with the target's mtime.
            let path = entry.path();
            let metadata = std::fs::metadata(&path).ok()?;
            if !metadata.is_file() {
                return None;
            }
            Some(LogFile {
                path,
                kind: LogKind::classify(&name),
                modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                size: metadata.len(),
            })
        })
        .collect();

    // Newest first; name breaks ties so output is stable.
    logs.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| b.path.cmp(&a.path)));

    tracing::debug!(dir = %dir.display(), count = logs.len(), "scanned log directory");
    Ok(logs)
}

/// Returns the most recently modified log of the given kind.
pub fn select_latest(dir: &Path, kind: LogKind) -> Result<Option<LogFile>, ViewerError> {
    let latest = list_logs(dir)?
        .into_iter()
        .filter(|log| log.kind == kind)
        .max_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path)));
    Ok(latest)
}
