//! Template fetching from remote collections.
//!
//! [`GithubClient`] lists template files through the repository contents
//! API; [`HttpFetcher`] downloads raw template content.

pub mod github;
pub mod http;

pub use github::{GithubClient, DEFAULT_API_URL, LISTING_TIMEOUT, MAX_DEPTH};
pub use http::{HttpFetcher, CONTENT_TIMEOUT};

use anyhow::Context;
use reqwest::blocking::Client;
use std::time::Duration;

use crate::error::Result;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("ignr/", env!("CARGO_PKG_VERSION"));

/// Build a blocking client with the crate user agent and a fixed timeout.
fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")?;
    Ok(client)
}
