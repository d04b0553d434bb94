//! On-disk entry format and lookup outcomes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A persisted cache entry.
///
/// Serialized as `{ "timestamp": <epoch-ms>, "content": <string> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Write time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Opaque payload, JSON in practice.
    pub content: String,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(content: impl Into<String>) -> Self {
        Self { timestamp: chrono::Utc::now().timestamp_millis(), content: content.into() }
    }

    /// Whether the embedded timestamp is older than `ttl` at `now_ms`.
    ///
    /// Timestamps in the future count as fresh.
    pub fn is_expired_at(&self, now_ms: i64, ttl: Duration) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(self.timestamp) > ttl_ms
    }
}

/// Internal outcome of a cache read.
///
/// Callers that only care about presence use [`Lookup::into_content`];
/// the other variants exist for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Fresh entry found.
    Hit(String),
    /// No entry stored for the key.
    Miss,
    /// Entry was stale and has been evicted.
    Expired,
    /// Entry exists but could not be read or parsed.
    Unreadable,
}

impl Lookup {
    pub fn into_content(self) -> Option<String> {
        match self {
            Lookup::Hit(content) => Some(content),
            Lookup::Miss | Lookup::Expired | Lookup::Unreadable => None,
        }
    }
}
