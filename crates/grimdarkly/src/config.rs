//! CLI configuration -- thin wrapper around `grimdarkly_config` shared types.
//!
//! Re-exports the shared types and layers `GlobalOpts` flag overrides
//! (--api-url, --timeout, --output, --color) over the loaded file.

use clap::ValueEnum;
use tracing::warn;

use grimdarkly_core::CatalogConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use grimdarkly_config::{
    Config, FilePreferenceStore, config_path, load_config, save_config,
};

/// Effective settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub catalog: CatalogConfig,
    pub output: OutputFormat,
    pub color: ColorMode,
    pub quiet: bool,
}

/// Load the config file and apply flag overrides (flag > env > file > default).
pub fn resolve(global: &GlobalOpts) -> Result<Settings, CliError> {
    let cfg = load_config().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable config file");
        Config::default()
    });
    resolve_with(&cfg, global)
}

pub fn resolve_with(cfg: &Config, global: &GlobalOpts) -> Result<Settings, CliError> {
    let api_url = global.api_url.as_deref().unwrap_or(&cfg.api_url);
    let timeout = global.timeout.unwrap_or(cfg.defaults.timeout);
    let catalog = CatalogConfig::new(api_url, timeout).map_err(|e| CliError::Validation {
        field: "api_url".into(),
        reason: e.to_string(),
    })?;

    let output = global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table);
    let color = global
        .color
        .or_else(|| ColorMode::from_str(&cfg.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto);

    Ok(Settings {
        catalog,
        output,
        color,
        quiet: global.quiet,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn global() -> GlobalOpts {
        GlobalOpts {
            api_url: None,
            output: None,
            color: None,
            verbose: 0,
            quiet: false,
            timeout: None,
        }
    }

    #[test]
    fn file_values_apply_without_flags() {
        let mut cfg = Config::default();
        cfg.set("defaults.output", "yaml").unwrap();
        cfg.set("defaults.timeout", "4").unwrap();

        let s = resolve_with(&cfg, &global()).unwrap();
        assert_eq!(s.output, OutputFormat::Yaml);
        assert_eq!(s.color, ColorMode::Auto);
        assert_eq!(s.catalog.timeout.as_secs(), 4);
    }

    #[test]
    fn flags_win_over_file() {
        let cfg = Config::default();
        let mut g = global();
        g.api_url = Some("https://catalog.example/api".into());
        g.output = Some(OutputFormat::Json);
        g.timeout = Some(2);

        let s = resolve_with(&cfg, &g).unwrap();
        assert_eq!(s.catalog.api_url, "https://catalog.example/api");
        assert_eq!(s.output, OutputFormat::Json);
        assert_eq!(s.catalog.timeout.as_secs(), 2);
    }

    #[test]
    fn bad_url_flag_is_rejected() {
        let mut g = global();
        g.api_url = Some("ftp://nope".into());
        assert!(matches!(
            resolve_with(&Config::default(), &g),
            Err(CliError::Validation { .. })
        ));
    }
}
