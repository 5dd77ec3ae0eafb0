//! Audio prober configuration.
//!
//! Read from the optional `gamediag.toml` in the base directory (`[audio]`
//! section). A missing file means defaults; the prober never writes it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Shared diagnostics config filename, looked up in the base directory.
pub const CONFIG_FILE_NAME: &str = "gamediag.toml";

/// Prober configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory that holds the sound assets. Never read from the file.
    #[serde(skip)]
    pub base_dir: PathBuf,

    #[serde(default)]
    pub audio: AudioConfig,
}

/// The `[audio]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Timeout for each player resolution probe, in milliseconds.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Test playback window, in seconds.
    #[serde(default = "default_playback_seconds")]
    pub playback_seconds: u64,

    /// Title theme asset, relative to the base directory.
    #[serde(default = "default_title_asset")]
    pub title_asset: String,

    /// Quack effect asset, relative to the base directory.
    #[serde(default = "default_quack_asset")]
    pub quack_asset: String,
}

fn default_probe_timeout_ms() -> u64 {
    gamediag_audio_probe::DEFAULT_PROBE_TIMEOUT.as_millis() as u64
}

fn default_playback_seconds() -> u64 {
    gamediag_audio_probe::DEFAULT_PLAYBACK_DURATION.as_secs()
}

fn default_title_asset() -> String {
    gamediag_audio_probe::TITLE_ASSET.into()
}

fn default_quack_asset() -> String {
    gamediag_audio_probe::QUACK_ASSET.into()
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: default_probe_timeout_ms(),
            playback_seconds: default_playback_seconds(),
            title_asset: default_title_asset(),
            quack_asset: default_quack_asset(),
        }
    }
}

impl AudioConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn playback_window(&self) -> Duration {
        Duration::from_secs(self.playback_seconds)
    }
}

impl Config {
    /// Loads configuration for `base_dir`.
    ///
    /// An unreadable or malformed file is logged and replaced by defaults.
    pub fn load(base_dir: &Path) -> Self {
        let path = base_dir.join(CONFIG_FILE_NAME);
        let mut config = if path.is_file() {
            match read_file(&path) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "configuration loaded");
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "ignoring invalid configuration"
                    );
                    Config::default()
                }
            }
        } else {
            Config::default()
        };
        config.base_dir = base_dir.to_path_buf();
        config
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AudioConfig::default();
        assert_eq!(config.probe_timeout(), Duration::from_secs(1));
        assert_eq!(config.playback_window(), Duration::from_secs(3));
        assert_eq!(config.title_asset, "Title.wav");
        assert_eq!(config.quack_asset, "quack.wav");
    }

    #[test]
    fn config_partial_toml() {
        let toml_str = "[audio]\nplayback_seconds = 5\n\n[viewer]\ndefault_lines = 10\n";
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.audio.playback_seconds, 5);
        assert_eq!(config.audio.probe_timeout_ms, 1000);
        assert_eq!(config.audio.title_asset, "Title.wav");
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(tmp.path());
        assert_eq!(config.base_dir, tmp.path());
        assert_eq!(config.audio.playback_seconds, 3);
        assert!(!tmp.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn load_reads_file() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[audio]\ntitle_asset = \"sounds/Title.wav\"\n",
        )
        .unwrap();

        let config = Config::load(tmp.path());
        assert_eq!(config.audio.title_asset, "sounds/Title.wav");
    }

    #[test]
    fn load_malformed_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "[audio\nnot toml").unwrap();

        let config = Config::load(tmp.path());
        assert_eq!(config.audio.playback_seconds, 3);
    }

    #[test]
    fn explicit_base_dir_wins() {
        let dir = resolve_base_dir(Some(PathBuf::from("/opt/game")));
        assert_eq!(dir, PathBuf::from("/opt/game"));
    }

    #[test]
    fn base_dir_defaults_to_exe_dir() {
        let exe = std::env::current_exe().unwrap();
        assert_eq!(resolve_base_dir(None), exe.parent().unwrap());
    }
}
