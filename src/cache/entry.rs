//! Persisted cache record types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::template::TemplateEntry;

/// Listing cache record, one file per source collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// When this record was last written.
    #[serde(rename = "updated")]
    pub updated_at: DateTime<Utc>,
    /// Template entries, at most one per path.
    pub templates: Vec<TemplateEntry>,
}

impl ListingRecord {
    /// Create a record stamped with the current time.
    pub fn new(templates: Vec<TemplateEntry>) -> Self {
        Self {
            updated_at: Utc::now(),
            templates,
        }
    }

    /// Check whether the record is older than `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        super::is_expired(self.updated_at, ttl)
    }

    /// Get the age of this record.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.updated_at)
    }
}

/// Content cache record, keyed by content reference in the shared file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// When this content was fetched.
    #[serde(rename = "updated")]
    pub updated_at: DateTime<Utc>,
    /// Raw template content.
    pub content: String,
}

impl ContentRecord {
    /// Create a record stamped with the current time.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            updated_at: Utc::now(),
            content: content.into(),
        }
    }

    /// Check whether the record is older than `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        super::is_expired(self.updated_at, ttl)
    }
}
