//! Command dispatch.

pub mod config_cmd;
pub mod factions;
pub mod prefs;
pub mod search;
pub mod units;
pub mod util;
pub mod weapons;

use grimdarkly_core::Catalog;

use crate::cli::Command;
use crate::config::Settings;
use crate::error::CliError;

/// Route a catalog command to its handler.
pub async fn dispatch(cmd: Command, catalog: &Catalog, settings: &Settings) -> Result<(), CliError> {
    match cmd {
        Command::Factions(args) => factions::handle(catalog, args, settings).await,
        Command::Units(args) => units::handle(catalog, args, settings).await,
        Command::Weapons(args) => weapons::handle(catalog, args, settings).await,
        // Handled before a catalog is built
        Command::Prefs(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
