//! Per-source listing cache.

use chrono::Duration;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::entry::ListingRecord;
use crate::error::{IgnrError, Result};
use crate::registry::template::TemplateEntry;

/// Result of looking up a source's listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CachedListing {
    /// Entries from the record, possibly stale. Empty on a miss.
    pub entries: Vec<TemplateEntry>,
    /// Whether the record exists and is within the TTL.
    pub fresh: bool,
}

/// Storage for per-source listing records.
///
/// Each source key maps to `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct TemplateCache {
    root: PathBuf,
    ttl: Duration,
}

impl TemplateCache {
    /// Create a listing cache with the default TTL.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_ttl(root, super::default_ttl())
    }

    /// Create a listing cache with a custom TTL.
    pub fn with_ttl(root: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            root: root.into(),
            ttl,
        }
    }

    /// Get the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Path of the record file for a source key.
    pub fn record_path(&self, source_key: &str) -> PathBuf {
        self.root.join(format!("{}.json", source_key))
    }

    /// Read the raw record for a source key, regardless of freshness.
    pub fn read_record(&self, source_key: &str) -> Result<Option<ListingRecord>> {
        let path = self.record_path(source_key);

        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)?;
        let record = serde_json::from_str(&json).map_err(|e| IgnrError::CacheCorrupt {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(Some(record))
    }

    /// Load the listing for a source key.
    ///
    /// Missing, unreadable and corrupt records all report not-fresh.
    pub fn load(&self, source_key: &str) -> CachedListing {
        match self.read_record(source_key) {
            Ok(Some(record)) => {
                let fresh = !record.is_expired(self.ttl);
                tracing::debug!(
                    "Listing cache {} for {} ({} entries)",
                    if fresh { "hit" } else { "expired" },
                    source_key,
                    record.templates.len()
                );
                CachedListing {
                    entries: record.templates,
                    fresh,
                }
            }
            Ok(None) => {
                tracing::debug!("Listing cache miss for {}", source_key);
                CachedListing::default()
            }
            Err(e) => {
                tracing::debug!("Ignoring listing cache for {}: {}", source_key, e);
                CachedListing::default()
            }
        }
    }

    /// Persist entries for a source key.
    ///
    /// A fresh existing record is merged by path (new entries win, old-only
    /// entries are kept). An expired, missing or corrupt record is replaced.
    pub fn save(&self, source_key: &str, entries: Vec<TemplateEntry>) -> Result<ListingRecord> {
        let existing = match self.read_record(source_key) {
            Ok(Some(record)) if !record.is_expired(self.ttl) => record.templates,
            Ok(_) => Vec::new(),
            Err(e) => {
                tracing::debug!("Replacing unreadable listing cache for {}: {}", source_key, e);
                Vec::new()
            }
        };

        let record = ListingRecord::new(merge_entries(existing, entries));
        self.write_record(source_key, &record)?;

        Ok(record)
    }

    /// Write a record as-is, using write-to-temp-then-rename.
    pub fn write_record(&self, source_key: &str, record: &ListingRecord) -> Result<()> {
        fs::create_dir_all(&self.root)?;

        let path = self.record_path(source_key);
        let json = serde_json::to_string_pretty(record).map_err(anyhow::Error::from)?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    /// List all readable records with their source keys, sorted by key.
    pub fn list(&self) -> Result<Vec<(String, ListingRecord)>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();

            if !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(Some(record)) = self.read_record(key) {
                records.push((key.to_string(), record));
            }
        }

        records.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(records)
    }

    /// Paths of every record file, readable or not.
    fn record_files(&self) -> Result<Vec<PathBuf>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }

    /// Number of record files on disk, corrupt ones included.
    pub fn file_count(&self) -> Result<usize> {
        Ok(self.record_files()?.len())
    }

    /// Remove every record file. Returns the number removed.
    pub fn clear(&self) -> Result<usize> {
        let files = self.record_files()?;
        for path in &files {
            fs::remove_file(path)?;
        }
        Ok(files.len())
    }
}

/// Merge `incoming` into `base` by path.
///
/// Later entries replace earlier ones with the same path in place; the
/// result holds at most one entry per path.
pub fn merge_entries(base: Vec<TemplateEntry>, incoming: Vec<TemplateEntry>) -> Vec<TemplateEntry> {
    let mut merged: Vec<TemplateEntry> = Vec::with_capacity(base.len() + incoming.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in base.into_iter().chain(incoming) {
        match index.get(&entry.path) {
            Some(&i) => merged[i] = entry,
            None => {
                index.insert(entry.path.clone(), merged.len());
                merged.push(entry);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn entry(path: &str, content_ref: &str) -> TemplateEntry {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        TemplateEntry {
            name,
            path: path.to_string(),
            content_ref: content_ref.to_string(),
            source_label: "GitHub".to_string(),
        }
    }

    fn sorted(mut entries: Vec<TemplateEntry>) -> Vec<TemplateEntry> {
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }

    fn backdate(cache: &TemplateCache, key: &str, entries: Vec<TemplateEntry>, days: i64) {
        let record = ListingRecord {
            updated_at: Utc::now() - Duration::days(days),
            templates: entries,
        };
        cache.write_record(key, &record).unwrap();
    }

    #[test]
    fn load_after_save_returns_saved_entries() {
        let temp = TempDir::new().unwrap();
        let cache = TemplateCache::new(temp.path());

        let entries = vec![entry("Go.gitignore", "u/go"), entry("Global/macOS.gitignore", "u/mac")];
        cache.save("gh", entries.clone()).unwrap();

        let loaded = cache.load("gh");
        assert!(loaded.fresh);
        assert_eq!(loaded.entries, entries);
    }

    #[test]
    fn missing_record_is_not_fresh() {
        let temp = TempDir::new().unwrap();
        let cache = TemplateCache::new(temp.path());

        let loaded = cache.load("gh");
        assert!(!loaded.fresh);
        assert!(loaded.entries.is_empty());
    }

    #[test]
    fn expired_record_is_not_fresh() {
        let temp = TempDir::new().unwrap();
        let cache = TemplateCache::new(temp.path());

        backdate(&cache, "tt", vec![entry("templates/Rust.gitignore", "u/rust")], 15);

        let loaded = cache.load("tt");
        assert!(!loaded.fresh);
        assert_eq!(loaded.entries.len(), 1);
    }

    #[test]
    fn zero_ttl_expires_everything() {
        let temp = TempDir::new().unwrap();
        let cache = TemplateCache::with_ttl(temp.path(), Duration::seconds(-1));

        cache.save("gh", vec![entry("Go.gitignore", "u/go")]).unwrap();
        assert!(!cache.load("gh").fresh);
    }

    #[test]
    fn corrupt_record_is_a_miss() {
        let temp = TempDir::new().unwrap();
        let cache = TemplateCache::new(temp.path());

        fs::write(cache.record_path("gh"), "{ not json").unwrap();

        assert!(matches!(cache.read_record("gh"), Err(IgnrError::CacheCorrupt { .. })));
        assert_eq!(cache.load("gh"), CachedListing::default());
    }

    #[test]
    fn save_merges_into_fresh_record() {
        let temp = TempDir::new().unwrap();
        let cache = TemplateCache::new(temp.path());

        let a = entry("A.gitignore", "u/a");
        let b = entry("B.gitignore", "u/b");
        let b2 = entry("B.gitignore", "u/b-v2");
        let c = entry("C.gitignore", "u/c");

        cache.save("mine", vec![a.clone(), b]).unwrap();
        let record = cache.save("mine", vec![b2.clone(), c.clone()]).unwrap();

        assert_eq!(sorted(record.templates), vec![a, b2, c]);
    }

    #[test]
    fn save_replaces_expired_record() {
        let temp = TempDir::new().unwrap();
        let cache = TemplateCache::new(temp.path());

        backdate(&cache, "mine", vec![entry("A.gitignore", "u/a"), entry("B.gitignore", "u/b")], 20);

        let c = entry("C.gitignore", "u/c");
        let record = cache.save("mine", vec![c.clone()]).unwrap();

        assert_eq!(record.templates, vec![c.clone()]);
        assert_eq!(cache.load("mine").entries, vec![c]);
    }

    #[test]
    fn save_replaces_corrupt_record() {
        let temp = TempDir::new().unwrap();
        let cache = TemplateCache::new(temp.path());
        fs::write(cache.record_path("gh"), "garbage").unwrap();

        let record = cache.save("gh", vec![entry("Go.gitignore", "u/go")]).unwrap();
        assert_eq!(record.templates.len(), 1);
    }

    #[test]
    fn repeated_save_is_idempotent_except_timestamp() {
        let temp = TempDir::new().unwrap();
        let cache = TemplateCache::new(temp.path());
        let entries = vec![entry("A.gitignore", "u/a"), entry("sub/B.gitignore", "u/b")];

        let first = cache.save("gh", entries.clone()).unwrap();
        let second = cache.save("gh", entries.clone()).unwrap();

        assert_eq!(first.templates, second.templates);
        assert!(second.updated_at >= first.updated_at);
    }

    #[test]
    fn sources_are_isolated() {
        let temp = TempDir::new().unwrap();
        let cache = TemplateCache::new(temp.path());

        cache.save("gh", vec![entry("Go.gitignore", "u/go")]).unwrap();
        cache.save("tt", vec![entry("templates/Rust.gitignore", "u/rust")]).unwrap();

        assert_eq!(cache.load("gh").entries[0].name, "Go.gitignore");
        assert_eq!(cache.load("tt").entries[0].name, "Rust.gitignore");
    }

    #[test]
    fn merge_dedupes_incoming() {
        let merged = merge_entries(
            Vec::new(),
            vec![entry("A.gitignore", "u/1"), entry("A.gitignore", "u/2")],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].content_ref, "u/2");
    }

    #[test]
    fn list_and_clear() {
        let temp = TempDir::new().unwrap();
        let cache = TemplateCache::new(temp.path());

        cache.save("tt", vec![entry("templates/Rust.gitignore", "u/rust")]).unwrap();
        cache.save("gh", vec![]).unwrap();
        fs::write(cache.record_path("broken"), "nope").unwrap();

        let keys: Vec<String> = cache.list().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["gh".to_string(), "tt".to_string()]);

        assert_eq!(cache.clear().unwrap(), 3);
        assert!(cache.list().unwrap().is_empty());
    }

    #[test]
    fn list_on_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let cache = TemplateCache::new(temp.path().join("missing"));
        assert!(cache.list().unwrap().is_empty());
        assert_eq!(cache.clear().unwrap(), 0);
    }
}
