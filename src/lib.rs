//! Directory Cache - query memoization for an AI-tools and blog directory
//!
//! Wraps listing reads against a PostgREST row store with an in-memory,
//! TTL-expiring cache and serves them over a small JSON API.

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod listing;
pub mod models;
pub mod queries;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{DirectoryError, Result};
pub use queries::{Lookup, QueryCache};
pub use tasks::spawn_cleanup_task;
