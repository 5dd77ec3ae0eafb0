//! Log viewer error types.

use std::path::PathBuf;

/// Errors produced while scanning or reading log files.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("failed to scan {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", file_label(.path))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
