//! Shared content cache keyed by content reference.

use chrono::Duration;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::entry::ContentRecord;
use crate::error::Result;

/// File name of the shared content cache.
pub const CONTENT_CACHE_FILE: &str = "template-content.json";

/// Raw template content cache.
///
/// A single JSON file maps each content reference to its content and fetch
/// time. Each entry expires independently.
#[derive(Debug, Clone)]
pub struct ContentCache {
    path: PathBuf,
    ttl: Duration,
}

impl ContentCache {
    /// Create a content cache in `dir` with the default TTL.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_ttl(dir, super::default_ttl())
    }

    /// Create a content cache in `dir` with a custom TTL.
    pub fn with_ttl(dir: impl AsRef<Path>, ttl: Duration) -> Self {
        Self {
            path: dir.as_ref().join(CONTENT_CACHE_FILE),
            ttl,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record. Missing or corrupt files read as empty.
    fn read_all(&self) -> BTreeMap<String, ContentRecord> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(_) => return BTreeMap::new(),
        };

        serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::debug!("Ignoring corrupt content cache {:?}: {}", self.path, e);
            BTreeMap::new()
        })
    }

    /// Get fresh content for a reference.
    pub fn get(&self, content_ref: &str) -> Option<String> {
        let record = self.read_all().remove(content_ref)?;

        if record.is_expired(self.ttl) {
            tracing::debug!("Content cache expired for {}", content_ref);
            return None;
        }

        tracing::debug!("Content cache hit for {}", content_ref);
        Some(record.content)
    }

    /// Store content for a reference, stamped with the current time.
    pub fn put(&self, content_ref: &str, content: &str) -> Result<()> {
        let mut records = self.read_all();
        records.insert(content_ref.to_string(), ContentRecord::new(content));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&records).map_err(anyhow::Error::from)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// Number of stored records, fresh or not.
    pub fn len(&self) -> usize {
        self.read_all().len()
    }

    /// Check if the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delete the backing file. Returns whether it existed.
    pub fn clear(&self) -> Result<bool> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            return Ok(true);
        }
        Ok(false)
    }
}
