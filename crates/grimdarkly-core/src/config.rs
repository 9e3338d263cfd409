// ── Runtime connection configuration ──
//
// Describes how to reach the catalog API. Never touches disk; the CLI and
// TUI build a `CatalogConfig` from their layered settings and hand it in.

use std::time::Duration;

use url::Url;

use crate::error::CoreError;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// API root, e.g. `http://localhost:3000/api`.
    pub api_url: String,
    pub timeout: Duration,
}

impl CatalogConfig {
    /// Validated config; rejects URLs that do not parse or are not http(s).
    pub fn new(api_url: &str, timeout_secs: u64) -> Result<Self, CoreError> {
        let url = Url::parse(api_url.trim()).map_err(|e| CoreError::Config {
            message: format!("invalid API URL '{api_url}': {e}"),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::Config {
                message: format!("API URL must be http or https, got '{}'", url.scheme()),
            });
        }
        Ok(Self {
            api_url: api_url.trim().to_owned(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
