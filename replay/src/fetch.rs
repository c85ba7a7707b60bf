use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::SourceError;

/// Settings for remote replay retrieval
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
    /// Whether an HTML page without an embedded log falls back to `<url>.json`
    pub json_fallback: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: format!("scout-replay/{}", env!("CARGO_PKG_VERSION")),
            json_fallback: true,
        }
    }
}

/// Retrieves the body of a URL as text
///
/// Implement this to plug in another transport, or a canned one for tests.
///
/// # Example
///
/// ```ignore
/// struct Canned(String);
///
/// #[async_trait]
/// impl Fetcher for Canned {
///     async fn fetch(&self, _url: &str) -> Result<String, SourceError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, SourceError>;
}

/// `reqwest`-backed fetcher with a bounded timeout
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| SourceError::fetch("http client", e))?;

        Ok(Self { client })
    }

    /// Use a preconfigured client, which keeps its own timeout
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        info!(url, "fetching replay");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::fetch(url, format!("HTTP {status}")));
        }

        let body = response.text().await.map_err(|e| request_error(url, e))?;

        debug!(url, bytes = body.len(), "fetched replay");
        Ok(body)
    }
}

fn request_error(url: &str, error: reqwest::Error) -> SourceError {
    if error.is_timeout() {
        SourceError::fetch(url, "timed out")
    } else {
        SourceError::fetch(url, error)
    }
}
