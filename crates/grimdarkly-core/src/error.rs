// ── Core error types ──
//
// User-facing errors from grimdarkly-core. Consumers never see raw HTTP
// or JSON failures; the `From<grimdarkly_api::Error>` impl translates
// transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
///
/// `Clone` so results can travel inside UI action messages.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the catalog API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Catalog request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Attach the entity kind and lookup key to a not-found error.
    pub(crate) fn for_entity(self, entity_type: &str, identifier: impl ToString) -> Self {
        match self {
            Self::NotFound { .. } => Self::NotFound {
                entity_type: entity_type.to_owned(),
                identifier: identifier.to_string(),
            },
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<grimdarkly_api::Error> for CoreError {
    fn from(err: grimdarkly_api::Error) -> Self {
        match err {
            grimdarkly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            grimdarkly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            grimdarkly_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            grimdarkly_api::Error::Client(message) => CoreError::Config { message },
            grimdarkly_api::Error::NotFound { path } => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: path,
            },
            grimdarkly_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            grimdarkly_api::Error::Rejected { message } => CoreError::Api {
                message,
                status: None,
            },
            grimdarkly_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Malformed response: {message}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_tagged_with_entity() {
        let err = CoreError::from(grimdarkly_api::Error::NotFound {
            path: "/api/units/9".into(),
        })
        .for_entity("Unit", 9);
        assert_eq!(err.to_string(), "Unit not found: 9");
        assert!(err.is_not_found());
    }

    #[test]
    fn other_errors_keep_their_shape() {
        let err = CoreError::from(grimdarkly_api::Error::Api {
            status: 500,
            message: "boom".into(),
        })
        .for_entity("Unit", 9);
        assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    }
}
