//! HTTP content fetching.
//!
//! Provides a blocking HTTP client for downloading raw template content.

use reqwest::blocking::Client;
use std::time::Duration;

use super::build_client;
use crate::error::{IgnrError, Result};

/// Timeout for downloading a single template's content.
pub const CONTENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches raw template content over HTTP/HTTPS.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher with the default 10-second timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(CONTENT_TIMEOUT)
    }

    /// Create a new HTTP fetcher with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            timeout,
        })
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the body at `url` as text.
    ///
    /// Any non-success status is an error naming the status.
    pub fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("Fetching {}", url);

        let fetch_err = |reason: String| IgnrError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_err(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_err(format!("HTTP {}", response.status())));
        }

        response.text().map_err(|e| fetch_err(e.to_string()))
    }
}
