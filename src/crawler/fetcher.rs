//! The fetch capability
//!
//! The scheduler core treats fetching as an opaque, replaceable dependency:
//! a [`Fetcher`] maps a URL to raw content or a classified failure. This
//! module provides the trait plus the production HTTP implementation built
//! on reqwest; tests substitute stub fetchers.

use crate::config::{FetchConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single fetch attempt
///
/// The `Display` form of a variant is the failure reason surfaced in a
/// [`crate::TaskOutcome::Failure`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("timeout")]
    Timeout,

    #[error("connection refused")]
    Connect,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("{0}")]
    Other(String),
}

/// Maps a resource identifier to raw content or a failure
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the resource at `url`, returning its body as text
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Production fetcher backed by an HTTP client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with the configured timeouts and user agent
    pub fn new(fetch: &FetchConfig, user_agent: &UserAgentConfig) -> crate::Result<Self> {
        let client = build_http_client(fetch, user_agent)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(classify_error)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use kumo::config::{FetchConfig, UserAgentConfig};
/// use kumo::crawler::build_http_client;
///
/// let client =
///     build_http_client(&FetchConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    fetch: &FetchConfig,
    config: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version
    let user_agent = format!("{}/{}", config.crawler_name, config.crawler_version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(fetch.request_timeout_secs))
        .connect_timeout(Duration::from_secs(fetch.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Classifies a transport error into a fetch failure
fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Connect
    } else {
        FetchError::Other(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&FetchConfig::default(), &UserAgentConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_new_http_fetcher_from_default_config() {
        let fetcher = HttpFetcher::new(&FetchConfig::default(), &UserAgentConfig::default());
        assert!(fetcher.is_ok());
    }

    #[test]
    fn test_failure_reasons() {
        assert_eq!(FetchError::Timeout.to_string(), "timeout");
        assert_eq!(FetchError::Connect.to_string(), "connection refused");
        assert_eq!(FetchError::Status(404).to_string(), "HTTP 404");
        assert_eq!(
            FetchError::Other("broken pipe".to_string()).to_string(),
            "broken pipe"
        );
    }

    // HTTP behavior (status handling, bodies, timeouts) is covered with
    // wiremock in the integration tests.
}
