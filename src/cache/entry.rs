use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single cached value plus the metadata the expiry and eviction policies
/// act on. Entries round-trip through JSON unchanged, so exports keep their
/// original timestamps and tags.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub key: String,
    pub data: T,
    pub timestamp: DateTime<Utc>,
    pub ttl: Duration,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl<T> CacheEntry<T> {
    #[must_use]
    pub fn new(key: impl Into<String>, data: T, ttl: Duration, tags: Vec<String>) -> Self {
        Self { key: key.into(), data, timestamp: Utc::now(), ttl, tags }
    }

    /// An entry is expired once its age strictly exceeds its TTL.
    pub fn is_expired(&self) -> bool {
        let elapsed = Utc::now().signed_duration_since(self.timestamp);
        match chrono::Duration::from_std(self.ttl) {
            Ok(d) => elapsed > d,
            Err(_) => false,
        }
    }

    pub fn has_any_tag(&self, tags: &[&str]) -> bool {
        self.tags.iter().any(|t| tags.contains(&t.as_str()))
    }
}

/// Per-`set` options. A `ttl` of `None` falls back to the configured default.
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    pub ttl: Option<Duration>,
    pub tags: Vec<String>,
    /// Store the value as its own JSON round-trip instead of the original.
    /// Detaches values that share interior state with the caller.
    pub serialize: bool,
}
