//! Shared helpers for command handlers.

use std::fmt::Display;
use std::io::IsTerminal;
use std::str::FromStr;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use strum::IntoEnumIterator;

use grimdarkly_core::presentation::DEFAULT_MAX_VISIBLE;
use grimdarkly_core::{Disclosure, Preferences};

use crate::config::FilePreferenceStore;
use crate::error::CliError;

/// Parse a `--sort` value, listing the valid keys on failure.
pub fn parse_sort_key<K>(raw: &str) -> Result<K, CliError>
where
    K: FromStr + IntoEnumIterator + Display,
{
    raw.trim().parse().map_err(|_| CliError::Validation {
        field: "sort".into(),
        reason: format!(
            "unknown sort key '{raw}' (expected one of: {})",
            K::iter().map(|k| k.to_string()).collect::<Vec<_>>().join(", ")
        ),
    })
}

/// Spinner on stderr while a request runs. `None` when quiet or piped.
pub fn spinner(message: String, quiet: bool) -> Option<ProgressBar> {
    if quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.red} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Names of a capped list: the first few plus `+K more`, or all of them.
pub fn capped_names<T>(items: &[T], expand: bool, name: impl Fn(&T) -> String) -> String {
    let state = if expand {
        Disclosure::Expanded
    } else {
        Disclosure::Collapsed
    };
    let view = state.view(items, DEFAULT_MAX_VISIBLE);
    let mut parts: Vec<String> = view.items.iter().map(name).collect();
    if let Some(control) = view.control.filter(|_| !expand) {
        parts.push(format!("({})", control.label()));
    }
    parts.join(", ")
}

/// Persisted preferences from the platform data directory.
pub fn load_preferences() -> Preferences<FilePreferenceStore> {
    Preferences::load(FilePreferenceStore::default_location())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grimdarkly_core::UnitSortKey;

    #[test]
    fn capped_names_collapses_long_lists() {
        let items = ["Bolt pistol", "Chainblade", "Plasma pistol", "Power fist", "Meltagun"];
        let names = |s: &&str| (*s).to_owned();
        assert_eq!(
            capped_names(&items, false, names),
            "Bolt pistol, Chainblade, Plasma pistol, (+2 more)"
        );
        assert_eq!(
            capped_names(&items, true, names),
            "Bolt pistol, Chainblade, Plasma pistol, Power fist, Meltagun"
        );
        assert_eq!(capped_names(&items[..3], false, names), "Bolt pistol, Chainblade, Plasma pistol");
    }

    #[test]
    fn sort_key_errors_list_choices() {
        assert_eq!(
            parse_sort_key::<UnitSortKey>("toughness").ok(),
            Some(UnitSortKey::Toughness)
        );
        let Err(CliError::Validation { reason, .. }) = parse_sort_key::<UnitSortKey>("speed")
        else {
            panic!("expected validation error");
        };
        assert!(reason.contains("objective-control"));
        assert!(reason.contains("name, faction"));
    }
}
