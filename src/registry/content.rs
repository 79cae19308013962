//! Cache-first retrieval of raw template content.

use super::fetch::HttpFetcher;
use crate::cache::ContentCache;
use crate::error::Result;

/// Returns template content by content reference, consulting the shared
/// content cache before the network.
#[derive(Debug, Clone)]
pub struct ContentResolver {
    fetcher: HttpFetcher,
    cache: ContentCache,
}

impl ContentResolver {
    /// Create a resolver over a fetcher and cache.
    pub fn new(fetcher: HttpFetcher, cache: ContentCache) -> Self {
        Self { fetcher, cache }
    }

    /// Get the underlying content cache.
    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Get content for a reference.
    ///
    /// A fresh cached copy is returned without network access. Otherwise the
    /// content is downloaded and stored before being returned; a failure to
    /// store it is only logged.
    pub fn get_content(&self, content_ref: &str) -> Result<String> {
        if let Some(content) = self.cache.get(content_ref) {
            return Ok(content);
        }

        let content = self.fetcher.fetch(content_ref)?;

        if let Err(e) = self.cache.put(content_ref, &content) {
            tracing::warn!("Failed to cache content for {}: {}", content_ref, e);
        }

        Ok(content)
    }
}
