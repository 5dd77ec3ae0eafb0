//! Audio probe error types.

use std::process::ExitStatus;

/// Errors produced while probing or driving an audio player.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for {command}: {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}")]
    Exited { command: String, status: ExitStatus },

    #[error("probe for {command} timed out")]
    ProbeTimeout { command: String },
}
