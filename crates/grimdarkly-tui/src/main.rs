//! `grimdarkly-tui`: terminal browser for the Grimdarkly catalog.
//!
//! Built on [ratatui](https://ratatui.rs). Screens are reachable via number
//! keys: Factions (1), Units (2) and Weapons (3), plus unit and weapon
//! detail views opened from search results.
//!
//! Logs are written to a file (default `/tmp/grimdarkly-tui.log`) so they
//! never corrupt the terminal. Catalog requests run on spawned tasks and
//! report back through the action loop.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use grimdarkly_config::FilePreferenceStore;
use grimdarkly_core::{Catalog, CatalogConfig, Preferences, RecordKind};

use crate::app::App;

/// Terminal UI for searching Warhammer units and weapons.
#[derive(Parser, Debug)]
#[command(name = "grimdarkly-tui", version, about)]
struct Cli {
    /// Catalog API root (overrides the config file)
    #[arg(short = 'u', long, env = "GRIMDARKLY_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, env = "GRIMDARKLY_TIMEOUT")]
    timeout: Option<u64>,

    /// Open the units screen with a shared search link, e.g. "?faction=Orks"
    #[arg(long, conflicts_with = "weapon_query")]
    query: Option<String>,

    /// Open the weapons screen with a shared search link
    #[arg(long)]
    weapon_query: Option<String>,

    /// Log file path (defaults to /tmp/grimdarkly-tui.log)
    #[arg(long, default_value = "/tmp/grimdarkly-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn initial_query(&self) -> Option<(RecordKind, String)> {
        match (&self.query, &self.weapon_query) {
            (Some(q), _) => Some((RecordKind::Unit, q.clone())),
            (None, Some(q)) => Some((RecordKind::Weapon, q.clone())),
            (None, None) => None,
        }
    }
}

/// File-based tracing. Nothing may reach stdout/stderr while the terminal
/// is in raw mode. Hold the returned guard until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "grimdarkly_tui={log_level},grimdarkly_core={log_level},grimdarkly_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("grimdarkly-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Priority: CLI flags > environment > config file > defaults.
fn catalog_config(cli: &Cli) -> Result<CatalogConfig> {
    let cfg = grimdarkly_config::load_config_or_default();
    let api_url = cli.api_url.as_deref().unwrap_or(&cfg.api_url);
    let timeout = cli.timeout.unwrap_or(cfg.defaults.timeout);
    Ok(CatalogConfig::new(api_url, timeout)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal enters raw mode.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = catalog_config(&cli)?;
    let catalog = Catalog::new(&config)?;
    let store = FilePreferenceStore::default_location();
    info!(
        api_url = catalog.api_url(),
        prefs = %store.path().display(),
        "starting grimdarkly-tui"
    );

    let prefs = Preferences::load(store);
    let mut app = App::new(catalog, prefs, cli.initial_query());
    app.run().await?;

    Ok(())
}
