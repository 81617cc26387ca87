use std::env;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use super::types::{SearchResponse, SearchResult};

const API_BASE: &str = "https://serpapi.com/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, thiserror::Error)]
pub enum SerpApiError {
    #[error("SERPAPI_KEY not set. Get one at https://serpapi.com/manage-api-key")]
    ApiKeyNotSet,

    #[error("SerpAPI error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Abstraction for the web-search provider.
/// Implemented by `SerpApiClient` for production; mock implementations used in tests.
pub trait SearchProvider {
    async fn query(
        &self,
        q: &str,
        num: u8,
        tbs: Option<&str>,
    ) -> Result<Vec<SearchResult>, SerpApiError>;
}

#[derive(Clone)]
struct ApiKey(String);

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Clone)]
pub struct SerpApiClient {
    http: Client,
    api_key: ApiKey,
    base_url: String,
}

impl SerpApiClient {
    pub fn from_env(http: Client) -> Result<Self, SerpApiError> {
        let api_key = env::var("SERPAPI_KEY").map_err(|_| SerpApiError::ApiKeyNotSet)?;
        if api_key.trim().is_empty() {
            return Err(SerpApiError::ApiKeyNotSet);
        }
        Ok(Self {
            http,
            api_key: ApiKey(api_key.trim().to_string()),
            base_url: API_BASE.to_string(),
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            api_key: ApiKey("test-key".to_string()),
            base_url: base_url.to_string(),
        }
    }
}

impl SearchProvider for SerpApiClient {
    async fn query(
        &self,
        q: &str,
        num: u8,
        tbs: Option<&str>,
    ) -> Result<Vec<SearchResult>, SerpApiError> {
        let mut request = self
            .http
            .get(&self.base_url)
            .query(&[
                ("engine", "google"),
                ("q", q),
                ("api_key", self.api_key.0.as_str()),
            ])
            .query(&[("num", num)])
            .header("User-Agent", crate::USER_AGENT)
            .timeout(REQUEST_TIMEOUT);
        if let Some(tbs) = tbs {
            request = request.query(&[("tbs", tbs)]);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if let Ok(body) = serde_json::from_str::<SearchResponse>(&text)
                && let Some(message) = body.error
            {
                warn!(code = status.as_u16(), error = %message, "SerpAPI error");
                return Err(SerpApiError::Api {
                    code: status.as_u16(),
                    message,
                });
            }
            let snippet = if text.len() > 200 { &text[..200] } else { &text };
            warn!(status = %status, "SerpAPI error (no structured body)");
            return Err(SerpApiError::Api {
                code: status.as_u16(),
                message: format!("HTTP {status}: {snippet}"),
            });
        }

        let body: SearchResponse = response.json().await?;
        if let Some(message) = body.error {
            warn!(error = %message, "SerpAPI error in 200 response");
            return Err(SerpApiError::Api {
                code: status.as_u16(),
                message,
            });
        }

        debug!(hits = body.organic_results.len(), "search results received");
        Ok(body
            .organic_results
            .into_iter()
            .map(SearchResult::from)
            .collect())
    }
}
