//! Backend Module
//!
//! The authoritative row store the cache memoizes reads from. Queries are
//! described with a small builder and executed by a [`RowSource`].

mod memory;
mod postgrest;
mod query;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use memory::MemorySource;
pub use postgrest::PostgrestClient;
pub use query::{compare_values, Direction, Filter, Ordering, Query};

// == Backend Error ==
/// Failure while reading from the row store.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected shape
    #[error("could not decode response: {0}")]
    Decode(String),

    /// The store is switched off (in-memory source only)
    #[error("backend unavailable")]
    Unavailable,
}

// == Query Response ==
/// Rows returned by a query, plus the exact match count when requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResponse {
    pub rows: Vec<Value>,
    pub count: Option<u64>,
}

// == Row Source ==
/// Executes [`Query`] values against a row store.
#[async_trait]
pub trait RowSource: Send + Sync {
    async fn fetch(&self, query: &Query) -> Result<QueryResponse, BackendError>;
}
