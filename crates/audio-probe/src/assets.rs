//! Sound asset lookup.

use std::path::{Path, PathBuf};

/// Title theme asset filename.
pub const TITLE_ASSET: &str = "Title.wav";

/// Quack effect asset filename.
pub const QUACK_ASSET: &str = "quack.wav";

/// Presence of a single asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetStatus {
    pub name: String,
    pub path: PathBuf,
    pub found: bool,
}

impl AssetStatus {
    fn check(base_dir: &Path, name: &str) -> Self {
        let path = base_dir.join(name);
        let found = path.is_file();
        tracing::debug!(path = %path.display(), found, "asset checked");
        Self {
            name: name.to_string(),
            path,
            found,
        }
    }
}

/// Presence of both sound assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReport {
    pub title: AssetStatus,
    pub quack: AssetStatus,
}

impl AssetReport {
    /// Returns the asset to test-play: the title theme, else the quack effect.
    pub fn playable(&self) -> Option<&AssetStatus> {
        [&self.title, &self.quack].into_iter().find(|a| a.found)
    }

    /// Iterates both assets in report order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetStatus> {
        [&self.title, &self.quack].into_iter()
    }
}

/// Checks both asset files under `base_dir`, using the given filenames.
///
/// Never fails; a missing asset is reported with `found == false`.
pub fn locate_assets(base_dir: &Path, title: &str, quack: &str) -> AssetReport {
    AssetReport {
        title: AssetStatus::check(base_dir, title),
        quack: AssetStatus::check(base_dir, quack),
    }
}
