//! Log viewer entry point.

mod config;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use gamediag_log_viewer::{ViewMode, render};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Lists and tails the game's log files.
#[derive(Parser)]
#[command(name = "viewer", version, about)]
struct Cli {
    /// What to show.
    #[arg(value_enum, default_value_t = Action::Latest)]
    action: Action,

    /// Number of lines to show; 0 or negative shows the whole file.
    ///
    /// Defaults to 50 for `latest` and the whole file for `all` and `errors`.
    #[arg(short = 'n', long = "lines", allow_negative_numbers = true)]
    lines: Option<i64>,

    /// Directory containing `logs/` (defaults to the executable's directory).
    #[arg(long, env = "GAMEDIAG_BASE_DIR")]
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Action {
    /// Latest game log.
    All,
    /// Latest error log.
    Errors,
    /// Tail of the latest game log.
    Latest,
    /// Every log file with size and timestamp.
    List,
}

impl From<Action> for ViewMode {
    fn from(action: Action) -> Self {
        match action {
            Action::All => ViewMode::All,
            Action::Errors => ViewMode::Errors,
            Action::Latest => ViewMode::Latest,
            Action::List => ViewMode::List,
        }
    }
}

/// Renders the requested view for `config`.
fn output(config: &Config, action: Action, lines: Option<i64>) -> String {
    let mode = ViewMode::from(action);
    let lines = lines.unwrap_or_else(|| mode.default_lines(config.viewer.default_lines));
    tracing::debug!(?mode, lines, dir = %config.logs_dir().display(), "rendering view");
    render(&config.logs_dir(), mode, lines)
}

/// Writes `text` to `out`, ending it with a newline.
fn write_text(out: &mut dyn Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}

/// A reader that went away (`viewer all | head`) is a normal end of output.
fn ignore_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("stdout closed by reader");
            Ok(())
        }
        other => other,
    }
}

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr; stdout carries the log text.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&config::resolve_base_dir(cli.base_dir));

    let text = output(&config, cli.action, cli.lines);
    ignore_broken_pipe(write_text(&mut io::stdout().lock(), &text))?;
    Ok(())
}
