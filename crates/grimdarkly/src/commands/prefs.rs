//! Preference command handlers.

use grimdarkly_core::settings::SHOW_VARIANTS_KEY;

use crate::cli::{PrefsArgs, PrefsCommand, Switch};
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(args: PrefsArgs, quiet: bool) -> Result<(), CliError> {
    let mut prefs = util::load_preferences();

    match args.command {
        PrefsCommand::Show => {
            let out = format!(
                "{SHOW_VARIANTS_KEY} = {}\n# {}",
                prefs.show_variants(),
                prefs.store().path().display()
            );
            output::print_output(&out, quiet);
        }

        PrefsCommand::Variants { state } => {
            let shown = match state {
                Switch::On => {
                    prefs.set_show_variants(true)?;
                    true
                }
                Switch::Off => {
                    prefs.set_show_variants(false)?;
                    false
                }
                Switch::Toggle => prefs.toggle_variants()?,
            };
            let verb = if shown { "shown" } else { "hidden" };
            output::print_status(&format!("Variant content {verb}"), quiet);
        }
    }
    Ok(())
}
