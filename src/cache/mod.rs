//! Template caching system.
//!
//! Two independent disk caches with the same lazy TTL discipline:
//! - [`TemplateCache`]: one listing record per source collection
//! - [`ContentCache`]: one shared file of raw template content keyed by
//!   content reference
//!
//! Expiry is computed at read time from each record's timestamp; nothing is
//! evicted in the background.

pub mod content;
pub mod entry;
pub mod store;

pub use content::{ContentCache, CONTENT_CACHE_FILE};
pub use entry::{ContentRecord, ListingRecord};
pub use store::{merge_entries, CachedListing, TemplateCache};

use chrono::{DateTime, Duration, Utc};

/// Records older than this many days are stale.
pub const DEFAULT_TTL_DAYS: i64 = 14;

/// The default time-to-live for listing and content records.
pub fn default_ttl() -> Duration {
    Duration::days(DEFAULT_TTL_DAYS)
}

/// Check whether a record written at `updated_at` is older than `ttl`.
pub fn is_expired(updated_at: DateTime<Utc>, ttl: Duration) -> bool {
    Utc::now().signed_duration_since(updated_at) > ttl
}

/// Format a duration for display.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.num_seconds();

    if secs >= 86400 {
        format!("{}d", secs / 86400)
    } else if secs >= 3600 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs.max(0))
    }
}
