//! `fleet`: command-line front end for the fleet record keeper.
//!
//! # Usage
//!
//! ```
//! fleet alerts
//! fleet --config ~/.config/fleet/fleet.toml notifications --unread
//! FLEET_STORE_PATH=/tmp/fleet.db fleet history --all
//! ```
//!
//! Every invocation opens the workspace, which prunes stale activity and
//! notifications and records any new licence expiry notifications before
//! the command runs.

mod commands;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context as _, Result};
use clap::Parser;
use commands::{Command, warn_unsaved};
use fleet_core::{Workspace, clock::Env};
use fleet_store_sqlite::SqliteStore;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "fleet", version, about = "Fleet drivers, vehicles and licence alerts")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "fleet.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let env = Env::system();

  let store_path = settings.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?
    .with_clock(env.clock.clone());

  let opened = Workspace::open(Arc::new(store), env.clone(), settings.workspace())
    .await
    .context("failed to load workspace")?;
  let mut workspace = warn_unsaved(opened);

  commands::run(&mut workspace, &env, cli.command).await
}
