//! Cache Statistics Module
//!
//! Counters describing how reads were answered and why entries left the store.

use serde::Serialize;

/// Outcome of a single store read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A fresh entry was served
    Hit,
    /// No entry under the key
    Miss,
    /// An entry existed but had outlived its TTL and was dropped
    Expired,
}

// == Cache Stats ==
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads served from a fresh entry
    pub hits: u64,
    /// Reads that found nothing usable, stale reads included
    pub misses: u64,
    /// Entries dropped after their TTL, on read or by cleanup
    pub expirations: u64,
    /// Entries dropped by clear or prefix invalidation
    pub invalidated: u64,
    /// Backend failures answered with an empty result
    pub fallbacks: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// hits / (hits + misses), or 0.0 before the first read.
    pub fn hit_rate(&self) -> f64 {
        let reads = self.hits + self.misses;
        if reads == 0 {
            0.0
        } else {
            self.hits as f64 / reads as f64
        }
    }

    pub fn record_read(&mut self, outcome: ReadOutcome) {
        match outcome {
            ReadOutcome::Hit => self.hits += 1,
            ReadOutcome::Miss => self.misses += 1,
            ReadOutcome::Expired => {
                self.misses += 1;
                self.expirations += 1;
            }
        }
    }

    /// Adds `count` entries swept by periodic cleanup.
    pub fn record_swept(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn record_invalidated(&mut self, count: usize) {
        self.invalidated += count as u64;
    }

    pub fn record_fallback(&mut self) {
        self.fallbacks += 1;
    }
}
