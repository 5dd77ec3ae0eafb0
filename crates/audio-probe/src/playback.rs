//! Bounded test playback.
//!
//! The spawned player is owned by a [`PlaybackGuard`] for its whole life.
//! Every exit path either reaps the child or kills it: the happy path waits
//! for it, the timeout path kills and reaps it, and an early return drops the
//! guard, which kills it (tokio reaps dropped children in the background).

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tokio::process::{Child, Command};

use crate::candidates::{DurationControl, PlayerCandidate};
use crate::error::AudioError;

/// Extra time granted to players that bound themselves with a duration flag.
pub const PLAYBACK_SLACK: Duration = Duration::from_secs(1);

/// How long to wait for a killed player to be reaped.
const REAP_TIMEOUT: Duration = Duration::from_millis(500);

/// Result of a test playback attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    Success,
    NoPlayer,
    NoAsset,
    PlaybackError(String),
}

/// Details of a completed bounded playback.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackReport {
    /// OS process id of the player, if it was still known after spawn.
    pub pid: Option<u32>,
    /// Wall time from spawn until the player was gone.
    pub elapsed: Duration,
    /// Whether the player had to be killed at the end of the window.
    pub terminated: bool,
}

/// Owns a running player process and kills it if dropped while running.
struct PlaybackGuard {
    command: &'static str,
    child: Option<Child>,
}

impl PlaybackGuard {
    fn spawn(player: &PlayerCandidate, asset: &Path, window: Duration) -> Result<Self, AudioError> {
        let args = player.playback_args(asset, window);
        tracing::debug!(command = player.command, ?args, "spawning player");

        let child = Command::new(player.command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AudioError::Spawn {
                command: player.command.to_string(),
                source: e,
            })?;

        Ok(Self {
            command: player.command,
            child: Some(child),
        })
    }

    fn id(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    /// Waits up to `bound` for the player to exit.
    ///
    /// Returns `None` if it is still running when the bound elapses.
    async fn wait_within(&mut self, bound: Duration) -> Result<Option<ExitStatus>, AudioError> {
        let Some(child) = self.child.as_mut() else {
            return Ok(None);
        };

        let waited = tokio::time::timeout(bound, child.wait()).await;
        match waited {
            Ok(Ok(status)) => {
                self.child = None;
                Ok(Some(status))
            }
            Ok(Err(e)) => Err(AudioError::Wait {
                command: self.command.to_string(),
                source: e,
            }),
            Err(_) => Ok(None),
        }
    }

    /// Kills the player and waits briefly for it to be reaped.
    async fn terminate(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        if let Err(e) = child.start_kill() {
            tracing::warn!(command = self.command, error = %e, "failed to signal player");
        }

        match tokio::time::timeout(REAP_TIMEOUT, child.wait()).await {
            Ok(Ok(status)) => {
                tracing::debug!(command = self.command, %status, "player terminated");
            }
            Ok(Err(e)) => {
                tracing::warn!(command = self.command, error = %e, "failed to reap player");
            }
            Err(_) => {
                // Dropping `child` below re-sends the kill via kill_on_drop.
                tracing::warn!(command = self.command, "player did not exit after kill");
            }
        }
    }
}

impl Drop for PlaybackGuard {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            tracing::debug!(command = self.command, "killing player on drop");
            let _ = child.start_kill();
        }
    }
}

/// Plays `asset` with `player` and guarantees the player is gone afterwards.
///
/// Players with [`DurationControl::Terminate`] run for `window` and are then
/// killed. Players with [`DurationControl::Flag`] are asked to stop after
/// `window` and killed if they are still running after [`PLAYBACK_SLACK`].
pub async fn play_bounded(
    player: &PlayerCandidate,
    asset: &Path,
    window: Duration,
) -> Result<PlaybackReport, AudioError> {
    let started = Instant::now();
    let mut guard = PlaybackGuard::spawn(player, asset, window)?;
    let pid = guard.id();

    let bound = match player.duration {
        DurationControl::Terminate => window,
        DurationControl::Flag(_) => window.saturating_add(PLAYBACK_SLACK),
    };

    let terminated = match guard.wait_within(bound).await? {
        Some(status) if status.success() => false,
        Some(status) => {
            return Err(AudioError::Exited {
                command: player.command.to_string(),
                status,
            });
        }
        None => {
            if matches!(player.duration, DurationControl::Flag(_)) {
                tracing::warn!(command = player.command, "player overran its duration flag");
            }
            guard.terminate().await;
            true
        }
    };

    Ok(PlaybackReport {
        pid,
        elapsed: started.elapsed(),
        terminated,
    })
}

/// Attempts one bounded playback and folds every failure into the outcome.
pub async fn test_play(
    asset: Option<&Path>,
    player: Option<&PlayerCandidate>,
    window: Duration,
) -> PlaybackOutcome {
    let Some(player) = player else {
        return PlaybackOutcome::NoPlayer;
    };
    let Some(asset) = asset.filter(|a| a.is_file()) else {
        return PlaybackOutcome::NoAsset;
    };

    match play_bounded(player, asset, window).await {
        Ok(report) => {
            tracing::debug!(
                command = player.command,
                elapsed_ms = report.elapsed.as_millis() as u64,
                terminated = report.terminated,
                "playback finished"
            );
            PlaybackOutcome::Success
        }
        Err(e) => {
            tracing::warn!(command = player.command, error = %e, "playback failed");
            PlaybackOutcome::PlaybackError(e.to_string())
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    const HANGING_PLAYER: PlayerCandidate = PlayerCandidate {
        command: "sh",
        description: "never exits",
        rank: 0,
        args: &["-c", "exec sleep 30", "mock-player"],
        duration: DurationControl::Terminate,
    };

    fn shell_player(script: &'static [&'static str], duration: DurationControl) -> PlayerCandidate {
        PlayerCandidate {
            command: "sh",
            description: "scripted",
            rank: 0,
            args: script,
            duration,
        }
    }

    fn asset() -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"RIFF").unwrap();
        file
    }

    #[cfg(target_os = "linux")]
    fn is_running(pid: u32) -> bool {
        Path::new(&format!("/proc/{pid}")).exists()
    }

    #[tokio::test]
    async fn hanging_player_is_killed_within_window() {
        let asset = asset();
        let window = Duration::from_secs(1);

        let report = play_bounded(&HANGING_PLAYER, asset.path(), window).await.unwrap();

        assert!(report.terminated);
        assert!(report.elapsed >= window);
        assert!(report.elapsed < window + REAP_TIMEOUT + Duration::from_millis(500));
        #[cfg(target_os = "linux")]
        assert!(!is_running(report.pid.unwrap()));
    }

    #[tokio::test]
    async fn player_ignoring_duration_flag_is_killed_after_slack() {
        let asset = asset();
        let player = shell_player(
            &["-c", "exec sleep 30", "mock-player"],
            DurationControl::Flag("-d"),
        );
        let window = Duration::from_secs(1);

        let report = play_bounded(&player, asset.path(), window).await.unwrap();

        assert!(report.terminated);
        assert!(report.elapsed >= window + PLAYBACK_SLACK);
        assert!(report.elapsed < window + PLAYBACK_SLACK + REAP_TIMEOUT + Duration::from_secs(1));
        #[cfg(target_os = "linux")]
        assert!(!is_running(report.pid.unwrap()));
    }

    #[tokio::test]
    async fn self_terminating_player_is_not_killed() {
        let asset = asset();
        let player = shell_player(&["-c", "exit 0", "mock-player"], DurationControl::Flag("-d"));

        let report = play_bounded(&player, asset.path(), Duration::from_secs(3)).await.unwrap();

        assert!(!report.terminated);
        assert!(report.elapsed < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn failing_player_reports_exit_status() {
        let asset = asset();
        let player = shell_player(&["-c", "exit 3", "mock-player"], DurationControl::Terminate);

        let outcome = test_play(Some(asset.path()), Some(&player), Duration::from_secs(2)).await;

        match outcome {
            PlaybackOutcome::PlaybackError(detail) => assert!(detail.contains("exited with")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn spawn_failure_is_playback_error() {
        let asset = asset();
        let player = PlayerCandidate {
            command: "gamediag-definitely-not-a-player",
            ..HANGING_PLAYER
        };

        let outcome = test_play(Some(asset.path()), Some(&player), Duration::from_secs(1)).await;

        match outcome {
            PlaybackOutcome::PlaybackError(detail) => {
                assert!(detail.contains("failed to spawn gamediag-definitely-not-a-player"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn huge_window_does_not_overflow() {
        let asset = asset();
        let player = shell_player(&["-c", "exit 0", "mock-player"], DurationControl::Flag("-d"));

        let report = play_bounded(&player, asset.path(), Duration::MAX).await.unwrap();

        assert!(!report.terminated);
    }

    #[tokio::test]
    async fn no_player_wins_over_missing_asset() {
        let outcome = test_play(None, None, Duration::from_secs(1)).await;
        assert_eq!(outcome, PlaybackOutcome::NoPlayer);
    }

    #[tokio::test]
    async fn missing_asset_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("Title.wav");

        let outcome =
            test_play(Some(&missing), Some(&HANGING_PLAYER), Duration::from_secs(1)).await;
        assert_eq!(outcome, PlaybackOutcome::NoAsset);
    }

    #[tokio::test]
    async fn hanging_player_counts_as_success() {
        let asset = asset();
        let started = Instant::now();

        let outcome =
            test_play(Some(asset.path()), Some(&HANGING_PLAYER), Duration::from_secs(1)).await;

        assert_eq!(outcome, PlaybackOutcome::Success);
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
