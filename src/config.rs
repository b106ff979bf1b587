//! Configuration Module
//!
//! Loads service configuration from environment variables. Backend
//! credentials are mandatory; everything else has a default.

use std::env;
use std::time::Duration;

use crate::error::{DirectoryError, Result};

/// Service configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the PostgREST backend (without `/rest/v1`)
    pub supabase_url: String,
    /// Public API key sent with every backend request
    pub supabase_anon_key: String,
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds for cached listing queries
    pub listing_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Rows requested per batch when reading a whole table
    pub fetch_batch_size: usize,
    /// Page size used when a listing request does not name one
    pub default_page_size: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SUPABASE_URL` - Backend endpoint (required)
    /// - `SUPABASE_ANON_KEY` - Backend public key (required)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `LISTING_TTL` - Listing TTL in seconds (default: 3600)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 600)
    /// - `FETCH_BATCH_SIZE` - Rows per backend batch (default: 1000)
    /// - `DEFAULT_PAGE_SIZE` - Listing page size (default: 15)
    ///
    /// Fails when either credential is missing or blank, or when `LISTING_TTL`
    /// or `CLEANUP_INTERVAL` is zero or too large to represent. Other values
    /// that do not parse fall back to their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| DirectoryError::Config(format!("{} must be set", name)))
        };
        let defaults = Self::with_credentials(String::new(), String::new());

        let listing_ttl = parse_or(&lookup, "LISTING_TTL", defaults.listing_ttl);
        if listing_ttl == 0 || ttl_from_secs(listing_ttl).is_none() {
            return Err(DirectoryError::Config(format!(
                "LISTING_TTL must be between 1 and {} seconds, got {}",
                MAX_LISTING_TTL_SECS, listing_ttl
            )));
        }

        let cleanup_interval = parse_or(&lookup, "CLEANUP_INTERVAL", defaults.cleanup_interval);
        if cleanup_interval == 0 {
            return Err(DirectoryError::Config(
                "CLEANUP_INTERVAL must be at least 1 second".to_string(),
            ));
        }

        Ok(Self {
            supabase_url: required("SUPABASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            supabase_anon_key: required("SUPABASE_ANON_KEY")?,
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port),
            listing_ttl,
            cleanup_interval,
            fetch_batch_size: parse_or(&lookup, "FETCH_BATCH_SIZE", defaults.fetch_batch_size)
                .max(1),
            default_page_size: parse_or(&lookup, "DEFAULT_PAGE_SIZE", defaults.default_page_size)
                .max(1),
        })
    }

    /// Config with the given credentials and default tuning.
    pub fn with_credentials(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            supabase_url: url.into(),
            supabase_anon_key: anon_key.into(),
            server_port: 3000,
            listing_ttl: 3600,
            cleanup_interval: 600,
            fetch_batch_size: 1000,
            default_page_size: 15,
        }
    }

    /// Listing TTL as a cache duration. Saturates for values `from_lookup`
    /// would have rejected.
    pub fn listing_ttl(&self) -> chrono::Duration {
        ttl_from_secs(self.listing_ttl).unwrap_or(chrono::Duration::MAX)
    }

    /// Cleanup period, never shorter than one second.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval.max(1))
    }
}

/// Longest accepted `LISTING_TTL`: one year.
const MAX_LISTING_TTL_SECS: u64 = 365 * 24 * 60 * 60;

fn ttl_from_secs(secs: u64) -> Option<chrono::Duration> {
    if secs > MAX_LISTING_TTL_SECS {
        return None;
    }
    i64::try_from(secs).ok().and_then(chrono::Duration::try_seconds)
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
