#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays the labyrinth over stdin and stdout.
//!
//! Directions go to stdout one per line; diagnostics go to stderr so they
//! never mix with the protocol channel.

mod protocol;
mod session;
mod settings;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use protocol::TurnReader;
use session::Session;
use settings::Settings;

/// Turn-based labyrinth agent.
#[derive(Debug, Parser)]
#[command(name = "labyrinth", version)]
struct Args {
    /// TOML settings file with optional `[navigation]` and `[logging]` tables.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is unset, e.g. `labyrinth_system_navigation=debug`.
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,
    /// Overrides the number of frontier cells searched per exploring turn.
    #[arg(long, value_name = "COUNT")]
    frontier_candidates: Option<usize>,
    /// Re-checks cached paths before following them.
    #[arg(long)]
    revalidate_cached_paths: bool,
}

/// Entry point for the labyrinth command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args)?;

    let filter = args
        .log_filter
        .as_deref()
        .unwrap_or_else(|| settings.log_filter());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .target(env_logger::Target::Stderr)
        .init();

    run(settings)
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(count) = args.frontier_candidates {
        settings.navigation.frontier_candidates = count;
    }
    if args.revalidate_cached_paths {
        settings.navigation.revalidate_cached_paths = true;
    }
    Ok(settings)
}

fn run(settings: Settings) -> Result<()> {
    let stdin = io::stdin();
    let mut reader = TurnReader::new(stdin.lock());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let Some(header) = reader.read_header().context("failed to read session header")? else {
        warn!("input closed before the session header");
        return Ok(());
    };
    info!(
        "session {}x{} with {} alarm rounds, navigation {:?}",
        header.columns, header.rows, header.alarm_rounds, settings.navigation
    );
    let mut session = Session::new(header, settings.navigation);

    let mut turns = 0u64;
    while let Some(turn) = reader
        .read_turn()
        .with_context(|| format!("failed to read turn {}", turns + 1))?
    {
        turns += 1;
        let direction = session.play(turn);
        writeln!(out, "{direction}").context("failed to write direction")?;
        out.flush().context("failed to flush direction")?;
    }

    info!("input closed after {turns} turns");
    Ok(())
}
