//! Shared configuration for the Grimdarkly CLI and TUI.
//!
//! Layered settings (defaults → `config.toml` → `GRIMDARKLY_*` env), the
//! translation to `grimdarkly_core::CatalogConfig`, and the file-backed
//! store for the persisted preferences. The CLI adds flag overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use grimdarkly_core::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use grimdarkly_core::{CatalogConfig, CoreError, PreferenceStore};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Catalog API root.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            defaults: Defaults::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    /// Build the runtime connection config, validating the URL.
    pub fn catalog_config(&self) -> Result<CatalogConfig, ConfigError> {
        CatalogConfig::new(&self.api_url, self.defaults.timeout).map_err(|e| {
            ConfigError::Validation {
                field: "api_url".into(),
                reason: e.to_string(),
            }
        })
    }

    /// Set a value by dotted key (`api_url`, `defaults.output`, ...).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "api_url" => {
                CatalogConfig::new(value, self.defaults.timeout).map_err(|e| {
                    ConfigError::Validation {
                        field: key.into(),
                        reason: e.to_string(),
                    }
                })?;
                self.api_url = value.trim().to_owned();
            }
            "defaults.output" => {
                if !matches!(value, "table" | "json" | "json-compact" | "yaml" | "plain") {
                    return Err(ConfigError::Validation {
                        field: key.into(),
                        reason: format!("unknown output format '{value}'"),
                    });
                }
                value.clone_into(&mut self.defaults.output);
            }
            "defaults.color" => {
                if !matches!(value, "auto" | "always" | "never") {
                    return Err(ConfigError::Validation {
                        field: key.into(),
                        reason: format!("unknown color mode '{value}'"),
                    });
                }
                value.clone_into(&mut self.defaults.color);
            }
            "defaults.timeout" => {
                self.defaults.timeout =
                    value.parse().map_err(|_| ConfigError::Validation {
                        field: key.into(),
                        reason: format!("'{value}' is not a number of seconds"),
                    })?;
            }
            other => {
                return Err(ConfigError::Validation {
                    field: other.into(),
                    reason: "unknown config key".into(),
                });
            }
        }
        Ok(())
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "grimdarkly", "grimdarkly")
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("grimdarkly");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where the persisted preferences live.
pub fn preferences_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share").join("preferences.toml"),
        |dirs| dirs.data_dir().join("preferences.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from a specific file (+ environment).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("GRIMDARKLY_").split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), api_url = %config.api_url, "config loaded");
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Preference storage ──────────────────────────────────────────────

/// Preferences kept as string pairs in a small TOML file.
///
/// A missing or unreadable file loads as empty; writes rewrite the file.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform data directory.
    pub fn default_location() -> Self {
        Self::new(preferences_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| toml::from_str(&raw).ok())
            .unwrap_or_default()
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn store(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut values = self.read_all();
        values.insert(key.to_owned(), value.to_owned());

        let io_err = |e: std::io::Error| CoreError::Config {
            message: format!("cannot write {}: {e}", self.path.display()),
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = toml::to_string(&values).map_err(|e| CoreError::Config {
            message: format!("cannot encode preferences: {e}"),
        })?;
        std::fs::write(&self.path, raw).map_err(io_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use grimdarkly_core::Preferences;
    use grimdarkly_core::settings::SHOW_VARIANTS_KEY;

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://catalog.example/api\"\n[defaults]\noutput = \"json\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.api_url, "https://catalog.example/api");
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, DEFAULT_TIMEOUT_SECS);
        assert_eq!(
            cfg.catalog_config().unwrap().timeout.as_secs(),
            DEFAULT_TIMEOUT_SECS
        );
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.set("defaults.timeout", "3").unwrap();
        cfg.set("api_url", "http://10.0.0.2:3000/api").unwrap();
        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("api_url", "nope").is_err());
        assert!(cfg.set("defaults.output", "xml").is_err());
        assert!(cfg.set("defaults.timeout", "soon").is_err());
        assert!(cfg.set("profile", "x").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn preferences_persist_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("preferences.toml");

        let mut prefs = Preferences::load(FilePreferenceStore::new(&path));
        assert!(prefs.show_variants());
        prefs.set_show_variants(false).unwrap();

        let reloaded = Preferences::load(FilePreferenceStore::new(&path));
        assert!(!reloaded.show_variants());
        assert_eq!(
            FilePreferenceStore::new(&path).load(SHOW_VARIANTS_KEY).as_deref(),
            Some("false")
        );
    }

    #[test]
    fn corrupt_preferences_default_to_true() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        let prefs = Preferences::load(FilePreferenceStore::new(&path));
        assert!(prefs.show_variants());
    }
}
