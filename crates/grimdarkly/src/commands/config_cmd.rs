//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    let _ = writeln!(out, "api_url = \"{}\"", cfg.api_url);
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = write!(out, "timeout = {}", cfg.defaults.timeout);
    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

const OUTPUT_CHOICES: &[&str] = &["table", "json", "json-compact", "yaml", "plain"];

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, quiet: bool) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let mut cfg = config::load_config().unwrap_or_default();
            eprintln!("Grimdarkly configuration");
            eprintln!("   Config path: {}\n", config::config_path().display());

            let api_url: String = Input::new()
                .with_prompt("Catalog API URL")
                .default(cfg.api_url.clone())
                .interact_text()
                .map_err(prompt_err)?;
            cfg.set("api_url", &api_url)?;

            let current = OUTPUT_CHOICES
                .iter()
                .position(|c| *c == cfg.defaults.output)
                .unwrap_or(0);
            let output_idx = Select::new()
                .with_prompt("Default output format")
                .items(OUTPUT_CHOICES)
                .default(current)
                .interact()
                .map_err(prompt_err)?;
            let chosen = OUTPUT_CHOICES.get(output_idx).copied().unwrap_or("table");
            cfg.set("defaults.output", chosen)?;

            let timeout: String = Input::new()
                .with_prompt("Request timeout (seconds)")
                .default(cfg.defaults.timeout.to_string())
                .interact_text()
                .map_err(prompt_err)?;
            cfg.set("defaults.timeout", &timeout)?;

            let path = config::save_config(&cfg)?;
            eprintln!("\n   Saved to {}", path.display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            output::print_output(&format_config(&cfg), quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            cfg.set(&key, &value)?;
            let path = config::save_config(&cfg)?;
            output::print_status(&format!("Set {key} = {value} in {}", path.display()), quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_lists_every_key() {
        let text = format_config(&Config::default());
        assert!(text.starts_with("api_url = \"http://localhost:3000/api\""));
        assert!(text.contains("[defaults]"));
        assert!(text.ends_with("timeout = 10"));
    }
}
