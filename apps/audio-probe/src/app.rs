//! Runs the fixed probe sequence and writes the report.

use std::io::Write;

use gamediag_audio_probe::{
    CommandResolver, PLAYER_CANDIDATES, PlaybackOutcome, first_available, locate_assets,
    probe_players, test_play,
};

use crate::config::Config;

/// A reader that went away (`audio-probe | head`) is a normal end of output.
pub fn ignore_broken_pipe(result: std::io::Result<()>) -> std::io::Result<()> {
    match result {
        Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
            tracing::debug!("stdout closed by reader");
            Ok(())
        }
        other => other,
    }
}

/// Reports assets, then players, then one test playback.
///
/// Sub-check failures are written to `out`; only a failing writer is an error.
pub async fn run(
    config: &Config,
    resolver: &dyn CommandResolver,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    writeln!(out, "=== Audio Test ===")?;
    writeln!(out, "Base directory: {}", config.base_dir.display())?;

    // -- Assets --
    writeln!(out, "\nChecking sound assets...")?;
    let assets = locate_assets(
        &config.base_dir,
        &config.audio.title_asset,
        &config.audio.quack_asset,
    );
    for asset in assets.iter() {
        if asset.found {
            writeln!(out, "  ✓ {} found at {}", asset.name, asset.path.display())?;
        } else {
            writeln!(out, "  ✗ {} not found ({})", asset.name, asset.path.display())?;
        }
    }
    out.flush()?;

    // -- Players --
    writeln!(out, "\nChecking audio players...")?;
    let probes = probe_players(resolver, PLAYER_CANDIDATES).await;
    for probe in &probes {
        if probe.available {
            writeln!(out, "  ✓ {} available", probe.candidate)?;
        } else {
            writeln!(out, "  ✗ {} not found", probe.candidate)?;
        }
    }
    out.flush()?;

    // -- Playback --
    writeln!(out, "\nTest playback...")?;
    let player = first_available(&probes);
    let asset = assets.playable();
    let window = config.audio.playback_window();
    if let (Some(player), Some(asset)) = (&player, asset) {
        writeln!(
            out,
            "  Playing {} with {} for {}s...",
            asset.name,
            player.command,
            window.as_secs()
        )?;
        out.flush()?;
    }

    let outcome = test_play(asset.map(|a| a.path.as_path()), player.as_ref(), window).await;
    match outcome {
        PlaybackOutcome::Success => writeln!(out, "  ✓ Playback succeeded")?,
        PlaybackOutcome::NoPlayer => writeln!(out, "  ✗ No audio player available")?,
        PlaybackOutcome::NoAsset => writeln!(out, "  ✗ No sound asset available")?,
        PlaybackOutcome::PlaybackError(detail) => writeln!(out, "  ✗ Playback failed: {detail}")?,
    }

    writeln!(out, "\n=== Test Complete ===")?;
    out.flush()
}
