//! Log viewer configuration.
//!
//! Read from the optional `gamediag.toml` in the base directory (`[viewer]`
//! section). A missing file means defaults; the viewer never writes it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Shared diagnostics config filename, looked up in the base directory.
pub const CONFIG_FILE_NAME: &str = "gamediag.toml";

/// Viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory the `logs` directory lives in. Never read from the file.
    #[serde(skip)]
    pub base_dir: PathBuf,

    #[serde(default)]
    pub viewer: ViewerConfig,
}

/// The `[viewer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Logs directory, relative to the base directory.
    #[serde(default = "default_logs_dir")]
    pub logs_dir: String,

    /// Lines shown by `latest` when `-n` is not given.
    #[serde(default = "default_lines")]
    pub default_lines: i64,
}

fn default_logs_dir() -> String {
    gamediag_log_viewer::LOGS_DIR_NAME.into()
}

fn default_lines() -> i64 {
    gamediag_log_viewer::DEFAULT_TAIL_LINES
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            logs_dir: default_logs_dir(),
            default_lines: default_lines(),
        }
    }
}

impl Config {
    /// Loads configuration for `base_dir`.
    ///
    /// An unreadable or malformed file is logged and replaced by defaults.
    pub fn load(base_dir: &Path) -> Self {
        let path = base_dir.join(CONFIG_FILE_NAME);
        let mut config = if path.is_file() {
            read_file(&path).unwrap_or_else(|e| {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "ignoring invalid configuration"
                );
                Config::default()
            })
        } else {
            Config::default()
        };
        config.base_dir = base_dir.to_path_buf();
        config
    }

    /// Returns the logs directory path.
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join(&self.viewer.logs_dir)
    }
}

fn read_file(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Resolves the base directory: explicit value, else the executable's directory.
pub fn resolve_base_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
        })
        .unwrap_or_else(|| PathBuf::from("."))
}
