//! Cache Module
//!
//! Provides an unbounded in-memory store with per-entry TTL expiration.

mod clock;
mod entry;
mod keys;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use keys::{CacheKey, CacheKeyBuilder};
pub use stats::{CacheStats, ReadOutcome};
pub use store::CacheStore;

/// Store shared between the query facade and the maintenance task.
pub type SharedStore = std::sync::Arc<tokio::sync::RwLock<CacheStore<serde_json::Value>>>;
