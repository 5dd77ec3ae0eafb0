//! Audio prober: asset checks, player detection and bounded test playback.
//!
//! The prober consumes artifacts owned by the game (sound assets) and host
//! tools (command-line audio players). Nothing here is fatal: absence of an
//! asset or a player is reported as data, and playback failures are folded
//! into [`PlaybackOutcome`].

mod assets;
mod candidates;
mod error;
mod playback;
mod resolver;

pub use assets::{AssetReport, AssetStatus, QUACK_ASSET, TITLE_ASSET, locate_assets};
pub use candidates::{DurationControl, PLAYER_CANDIDATES, PlayerCandidate};
pub use error::AudioError;
pub use playback::{PLAYBACK_SLACK, PlaybackOutcome, PlaybackReport, play_bounded, test_play};
pub use resolver::{
    CommandResolver, DEFAULT_PROBE_TIMEOUT, PlayerProbe, ShellResolver, detect_player,
    first_available, probe_players,
};

/// Default test playback window.
pub const DEFAULT_PLAYBACK_DURATION: std::time::Duration = std::time::Duration::from_secs(3);
