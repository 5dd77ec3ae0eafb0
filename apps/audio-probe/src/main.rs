//! Audio prober entry point.

mod app;
mod config;

use std::path::PathBuf;

use clap::Parser;
use gamediag_audio_probe::ShellResolver;
use tracing_subscriber::EnvFilter;

/// Checks sound assets and audio players, then test-plays a sound.
#[derive(Parser)]
#[command(name = "audio-probe", version, about)]
struct Cli {
    /// Directory holding the sound assets (defaults to the executable's directory).
    #[arg(long, env = "GAMEDIAG_BASE_DIR")]
    base_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::Config::load(&config::resolve_base_dir(cli.base_dir));
    tracing::debug!(base_dir = %config.base_dir.display(), "configuration resolved");

    let resolver = ShellResolver::new(config.audio.probe_timeout());
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = rt.block_on(app::run(&config, &resolver, &mut std::io::stdout().lock()));
    app::ignore_broken_pipe(result)?;

    Ok(())
}
