//! Ordered table of command-line audio players.

use std::fmt;
use std::time::Duration;

/// How a player's run time is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationControl {
    /// Player plays to the end of the file; the parent terminates it after the window.
    Terminate,
    /// Player accepts a duration flag (followed by whole seconds).
    Flag(&'static str),
}

/// A command-line audio player the prober may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCandidate {
    /// Executable name resolved on the search path.
    pub command: &'static str,
    /// Human-readable description for the report.
    pub description: &'static str,
    /// Priority rank, lower is preferred.
    pub rank: u8,
    /// Fixed arguments placed before the duration flag and the asset path.
    pub args: &'static [&'static str],
    /// Whether the player bounds itself or must be terminated.
    pub duration: DurationControl,
}

/// Player candidates in priority order.
pub const PLAYER_CANDIDATES: &[PlayerCandidate] = &[
    PlayerCandidate {
        command: "paplay",
        description: "PulseAudio player",
        rank: 0,
        args: &[],
        duration: DurationControl::Terminate,
    },
    PlayerCandidate {
        command: "aplay",
        description: "ALSA player",
        rank: 1,
        args: &["-q"],
        duration: DurationControl::Flag("-d"),
    },
    PlayerCandidate {
        command: "ffplay",
        description: "FFmpeg player",
        rank: 2,
        args: &["-nodisp", "-autoexit", "-loglevel", "quiet"],
        duration: DurationControl::Flag("-t"),
    },
];

impl PlayerCandidate {
    /// Builds the argument vector for playing `asset` for at most `window`.
    pub fn playback_args(&self, asset: &std::path::Path, window: Duration) -> Vec<String> {
        let mut args: Vec<String> = self.args.iter().map(|a| (*a).to_string()).collect();
        if let DurationControl::Flag(flag) = self.duration {
            // Flags take whole seconds; round up so a short window still plays.
            let secs = window
                .as_secs()
                .saturating_add(u64::from(window.subsec_nanos() > 0));
            args.push(flag.to_string());
            args.push(secs.max(1).to_string());
        }
        args.push(asset.to_string_lossy().into_owned());
        args
    }
}

impl fmt::Display for PlayerCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.command, self.description)
    }
}
