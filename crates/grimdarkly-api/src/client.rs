// Catalog API HTTP client
//
// Wraps `reqwest::Client` with base-URL handling and `{ success, data }`
// envelope unwrapping. Endpoint groups (factions, units, weapons) are
// implemented as inherent methods in separate files.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{Envelope, SearchMeta};
use crate::transport::TransportConfig;

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Search results together with the server-side echo of the query.
#[derive(Debug, Clone)]
pub struct SearchResponse<T> {
    pub data: Vec<T>,
    pub meta: Option<SearchMeta>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the read-only catalog API.
///
/// The `base_url` is the API root (e.g. `http://localhost:3000/api`);
/// every endpoint path is resolved relative to it.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl CatalogClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            timeout_secs: transport.timeout.as_secs(),
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            timeout_secs: crate::transport::DEFAULT_TIMEOUT.as_secs(),
        })
    }

    /// The API root every path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Parse the base URL and make sure it ends in `/` so joins append.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let trimmed = raw.trim().trim_end_matches('/');
        Ok(Url::parse(&format!("{trimmed}/"))?)
    }

    // ── URL builders ─────────────────────────────────────────────────

    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Build `{base}/{prefix}/{segment}` with the segment percent-encoded.
    pub(crate) fn url_with_segment(&self, prefix: &str, segment: &str) -> Result<Url, Error> {
        let mut url = self.url(prefix)?;
        url.path_segments_mut()
            .map_err(|()| Error::Client(format!("base URL cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await.map_err(|e| self.send_error(e))?;
        let envelope: Envelope<T> = self.handle_response(resp).await?;
        envelope.into_data()
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<SearchResponse<T>, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        let envelope: Envelope<Vec<T>> = self.handle_response(resp).await?;
        let meta = envelope.meta.clone();
        Ok(SearchResponse {
            data: envelope.into_data()?,
            meta,
        })
    }

    fn send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await.map_err(|e| self.send_error(e))?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let path = resp.url().path().to_owned();
        let raw = resp.text().await.unwrap_or_default();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Error::NotFound { path };
        }

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|err| err.error.or(err.message))
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}
