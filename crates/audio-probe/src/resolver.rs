//! Host command resolution and player detection.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use crate::candidates::PlayerCandidate;
use crate::error::AudioError;

/// Per-candidate probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Answers "is this command resolvable on the search path".
///
/// `ShellResolver` asks the host shell; tests substitute scripted resolvers.
pub trait CommandResolver: Send + Sync {
    /// Returns `Ok(true)` if `command` resolves to an executable.
    fn resolve<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool, AudioError>> + Send + 'a>>;
}

/// Resolves commands with the POSIX `command -v` builtin.
#[derive(Debug, Clone)]
pub struct ShellResolver {
    timeout: Duration,
}

impl ShellResolver {
    /// Creates a resolver whose probes give up after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for ShellResolver {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

impl CommandResolver for ShellResolver {
    fn resolve<'a>(
        &'a self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<bool, AudioError>> + Send + 'a>> {
        Box::pin(async move {
            let output = tokio::process::Command::new("sh")
                .args(["-c", "command -v \"$1\"", "sh", command])
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .output();

            match tokio::time::timeout(self.timeout, output).await {
                Ok(Ok(o)) => Ok(o.status.success() && !o.stdout.is_empty()),
                Ok(Err(e)) => Err(AudioError::Spawn {
                    command: command.to_string(),
                    source: e,
                }),
                Err(_) => Err(AudioError::ProbeTimeout {
                    command: command.to_string(),
                }),
            }
        })
    }
}

/// Result of probing a single candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerProbe {
    pub candidate: PlayerCandidate,
    pub available: bool,
}

/// Probes one candidate. Any failure counts as "not available".
async fn probe(resolver: &dyn CommandResolver, candidate: &PlayerCandidate) -> bool {
    match resolver.resolve(candidate.command).await {
        Ok(found) => {
            tracing::debug!(command = candidate.command, found, "player probe finished");
            found
        }
        Err(e) => {
            tracing::warn!(command = candidate.command, error = %e, "player probe failed");
            false
        }
    }
}

/// Probes every candidate, preserving priority order.
pub async fn probe_players(
    resolver: &dyn CommandResolver,
    candidates: &[PlayerCandidate],
) -> Vec<PlayerProbe> {
    let mut probes = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        probes.push(PlayerProbe {
            candidate: *candidate,
            available: probe(resolver, candidate).await,
        });
    }
    probes
}

/// Returns the highest-priority available candidate from a probe report.
pub fn first_available(probes: &[PlayerProbe]) -> Option<PlayerCandidate> {
    probes.iter().find(|p| p.available).map(|p| p.candidate)
}

/// Returns the first candidate (in priority order) that resolves on the host.
///
/// Stops probing at the first hit.
pub async fn detect_player(
    resolver: &dyn CommandResolver,
    candidates: &[PlayerCandidate],
) -> Option<PlayerCandidate> {
    for candidate in candidates {
        if probe(resolver, candidate).await {
            return Some(*candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::PLAYER_CANDIDATES;
    use std::sync::Mutex;

    /// Answers from a fixed table and records the probe order.
    struct ScriptedResolver {
        answers: Vec<(&'static str, Result<bool, ()>)>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedResolver {
        fn new(answers: Vec<(&'static str, Result<bool, ()>)>) -> Self {
            Self {
                answers,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandResolver for ScriptedResolver {
        fn resolve<'a>(
            &'a self,
            command: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<bool, AudioError>> + Send + 'a>> {
            self.calls.lock().unwrap().push(command.to_string());
            let answer = self
                .answers
                .iter()
                .find(|(name, _)| *name == command)
                .map(|(_, a)| *a)
                .unwrap_or(Ok(false));
            Box::pin(async move {
                answer.map_err(|()| AudioError::ProbeTimeout {
                    command: command.to_string(),
                })
            })
        }
    }

    #[tokio::test]
    async fn detect_prefers_highest_priority() {
        let resolver = ScriptedResolver::new(vec![
            ("paplay", Ok(true)),
            ("aplay", Ok(true)),
            ("ffplay", Ok(true)),
        ]);
        let found = detect_player(&resolver, PLAYER_CANDIDATES).await.unwrap();
        assert_eq!(found.command, "paplay");
        assert_eq!(resolver.calls(), ["paplay"]);
    }

    #[tokio::test]
    async fn detect_skips_failed_probes() {
        let resolver = ScriptedResolver::new(vec![
            ("paplay", Err(())),
            ("aplay", Ok(false)),
            ("ffplay", Ok(true)),
        ]);
        let found = detect_player(&resolver, PLAYER_CANDIDATES).await.unwrap();
        assert_eq!(found.command, "ffplay");
        assert_eq!(resolver.calls(), ["paplay", "aplay", "ffplay"]);
    }

    #[tokio::test]
    async fn detect_none_when_nothing_resolves() {
        let resolver = ScriptedResolver::new(vec![]);
        assert!(detect_player(&resolver, PLAYER_CANDIDATES).await.is_none());
    }

    #[tokio::test]
    async fn detect_matches_first_available_for_every_combination() {
        for mask in 0u8..8 {
            let answers = PLAYER_CANDIDATES
                .iter()
                .enumerate()
                .map(|(i, c)| (c.command, Ok(mask & (1 << i) != 0)))
                .collect();
            let resolver = ScriptedResolver::new(answers);

            let detected = detect_player(&resolver, PLAYER_CANDIDATES).await;
            let probes = probe_players(&resolver, PLAYER_CANDIDATES).await;
            assert_eq!(detected, first_available(&probes), "mask {mask:03b}");

            if let Some(found) = detected {
                let index = PLAYER_CANDIDATES.iter().position(|c| *c == found).unwrap();
                assert_eq!(index, mask.trailing_zeros() as usize);
            }
        }
    }

    #[tokio::test]
    async fn probe_players_reports_every_candidate() {
        let resolver = ScriptedResolver::new(vec![("aplay", Ok(true))]);
        let probes = probe_players(&resolver, PLAYER_CANDIDATES).await;
        let available: Vec<_> = probes.iter().map(|p| p.available).collect();
        assert_eq!(available, [false, true, false]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_resolver_finds_sh() {
        let resolver = ShellResolver::default();
        assert!(resolver.resolve("sh").await.unwrap());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_resolver_misses_unknown_command() {
        let resolver = ShellResolver::default();
        assert!(
            !resolver
                .resolve("gamediag-definitely-not-a-player")
                .await
                .unwrap()
        );
    }
}
