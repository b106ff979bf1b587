//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use chrono::{DateTime, Duration, Utc};

// == Cache Entry ==
/// A stored value stamped with its insertion time and time-to-live.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value, exactly as handed to `set`
    pub value: V,
    /// When the entry was written
    pub stored_at: DateTime<Utc>,
    /// How long the entry stays fresh after `stored_at`
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stored at `now`.
    pub fn new(value: V, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: now,
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is stale at `now`.
    ///
    /// Boundary condition: an entry aged exactly `ttl` is still fresh; it
    /// expires once its age strictly exceeds `ttl`. A zero or negative `ttl`
    /// is expired from the moment it is written.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        if self.ttl <= Duration::zero() {
            return true;
        }
        now - self.stored_at > self.ttl
    }
}
