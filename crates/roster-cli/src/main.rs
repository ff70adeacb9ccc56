//! roster: an interactive contact directory session.
//!
//! Reads `roster.toml` (or the path given with `--config`), seeds the sample
//! directory unless told not to, then runs one command per line of stdin
//! until `quit` or end of input. Type `help` for the command list.
//!
//! Everything lives in memory; use `export <file>` to keep a copy.

mod command;
mod config;
mod photo;
mod render;
mod session;

use std::{
  io::{self, BufRead, IsTerminal, Write},
  path::PathBuf,
};

use anyhow::Context as _;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use self::{
  config::Settings,
  session::{Outcome, Session},
};

#[derive(Parser)]
#[command(author, version, about = "Interactive contact directory")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "roster.toml")]
  config: PathBuf,

  /// Start with an empty directory instead of the sample contacts.
  #[arg(long)]
  no_seed: bool,
}

fn main() -> anyhow::Result<()> {
  // Logs go to stderr so command output stays clean on stdout.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if cli.no_seed {
    settings.seed_sample_data = false;
  }
  tracing::info!(
    operator = %settings.operator.name,
    role = ?settings.operator.role,
    "session starting"
  );

  let mut session = Session::new(settings)?;

  let stdin = io::stdin();
  let interactive = stdin.is_terminal();
  let mut stdout = io::stdout().lock();
  let mut lines = stdin.lock().lines();

  loop {
    if interactive {
      write!(stdout, "roster> ")?;
      stdout.flush()?;
    }
    let Some(line) = lines.next() else { break };
    let line = line.context("failed to read stdin")?;

    match session.handle_line(&line) {
      Outcome::Output(text) => write!(stdout, "{text}")?,
      Outcome::Nothing => {}
      Outcome::Quit => break,
    }
  }

  tracing::info!(contacts = session.store().len(), "session ended");
  Ok(())
}
