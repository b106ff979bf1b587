//! Response DTOs for the directory API
//!
//! Defines the structure of outgoing HTTP response bodies that are not plain
//! records or listings.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries dropped after their TTL elapsed
    pub expirations: u64,
    /// Number of entries dropped by clear or prefix invalidation
    pub invalidated: u64,
    /// Number of backend failures answered with an empty result
    pub fallbacks: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            invalidated: stats.invalidated,
            fallbacks: stats.fallbacks,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for cache invalidation (DELETE /cache, DELETE /cache/:prefix)
#[derive(Debug, Clone, Serialize)]
pub struct InvalidationResponse {
    pub message: String,
    /// Number of entries removed
    pub removed: usize,
}

impl InvalidationResponse {
    pub fn cleared(removed: usize) -> Self {
        Self {
            message: "Cache cleared".to_string(),
            removed,
        }
    }

    pub fn prefix(prefix: &str, removed: usize) -> Self {
        Self {
            message: format!("Invalidated keys starting with '{}'", prefix),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            expirations: 5,
            fallbacks: 2,
            total_entries: 100,
            ..CacheStats::default()
        };
        let resp = StatsResponse::from(stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.expirations, 5);
        assert_eq!(resp.fallbacks, 2);
    }

    #[test]
    fn test_invalidation_response_serialize() {
        let resp = InvalidationResponse::prefix("tools:", 3);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("tools:"));
        assert!(json.contains("\"removed\":3"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
