use std::path::PathBuf;

use tracing::info;

use crate::error::{AttemptFailure, SourceError};
use crate::fetch::{FetchConfig, Fetcher, HttpFetcher};
use crate::html;
use crate::normalize::{NormalizedLog, normalize_text};
use crate::wrapper::parse_wrapper;

/// Where a replay comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaySource {
    Text(String),
    Bytes(Vec<u8>),
    File(PathBuf),
    Url(String),
}

impl ReplaySource {
    /// Interpret a command-line argument
    ///
    /// `http(s)://` means a URL. Anything that looks like log, JSON or HTML
    /// content is taken as text; everything else is a file path.
    pub fn parse(arg: &str) -> Self {
        let lower = arg.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return ReplaySource::Url(arg.trim().to_string());
        }

        let content = arg.trim_start();
        if content.starts_with('|') || content.starts_with('{') || content.starts_with('<') {
            ReplaySource::Text(arg.to_string())
        } else {
            ReplaySource::File(PathBuf::from(arg))
        }
    }
}

/// Loads a [`ReplaySource`] into a [`NormalizedLog`]
pub struct ReplayLoader<F> {
    fetcher: F,
    json_fallback: bool,
}

impl ReplayLoader<HttpFetcher> {
    /// Loader backed by `reqwest` with the given settings
    pub fn http(config: &FetchConfig) -> Result<Self, SourceError> {
        Ok(Self::new(HttpFetcher::new(config)?).with_json_fallback(config.json_fallback))
    }
}

impl<F: Fetcher> ReplayLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            json_fallback: true,
        }
    }

    pub fn with_json_fallback(mut self, enabled: bool) -> Self {
        self.json_fallback = enabled;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub async fn load(&self, source: ReplaySource) -> Result<NormalizedLog, SourceError> {
        match source {
            ReplaySource::Text(text) => self.normalize(&text, None).await,
            ReplaySource::Bytes(bytes) => self.normalize(decode(&bytes)?, None).await,
            ReplaySource::File(path) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|e| SourceError::fetch(path.display().to_string(), e))?;
                self.normalize(decode(&bytes)?, None).await
            }
            ReplaySource::Url(url) => {
                let body = self.fetcher.fetch(&url).await?;
                self.normalize(&body, Some(&url)).await
            }
        }
    }

    async fn normalize(&self, text: &str, origin_url: Option<&str>) -> Result<NormalizedLog, SourceError> {
        match normalize_text(text, origin_url) {
            Err(SourceError::Format { failures }) => self.fall_back(text, origin_url, failures).await,
            other => other,
        }
    }

    /// Fetch `<url>.json` for an HTML page that had no embedded log
    async fn fall_back(
        &self,
        text: &str,
        origin_url: Option<&str>,
        mut failures: Vec<AttemptFailure>,
    ) -> Result<NormalizedLog, SourceError> {
        if !self.json_fallback || !html::looks_like_html(text) {
            return Err(SourceError::Format { failures });
        }

        let Some(url) = html::hosted_replay_url(text, origin_url) else {
            failures.push(AttemptFailure::new("json-endpoint", "no hosted replay url in page"));
            return Err(SourceError::Format { failures });
        };

        let endpoint = html::json_endpoint(&url);
        info!(%endpoint, "no log embedded in page, falling back to json endpoint");

        let body = match self.fetcher.fetch(&endpoint).await {
            Ok(body) => body,
            Err(e) => {
                failures.push(AttemptFailure::new("json-endpoint", e.to_string()));
                return Err(SourceError::Format { failures });
            }
        };

        let body = body.strip_prefix('\u{feff}').unwrap_or(&body);
        match parse_wrapper(body) {
            Ok((wrapper, log)) => Ok(NormalizedLog::from_log(&log, Some(wrapper), Some(&url))),
            Err(reason) => {
                failures.push(AttemptFailure::new("json-endpoint", reason));
                Err(SourceError::Format { failures })
            }
        }
    }
}

/// Inputs must be UTF-8; a leading BOM is stripped later
fn decode(bytes: &[u8]) -> Result<&str, SourceError> {
    std::str::from_utf8(bytes).map_err(|e| SourceError::format("utf-8", e.to_string()))
}
