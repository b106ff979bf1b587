//! Data models
//!
//! Directory records, the pagination envelope, and the DTOs used by the HTTP
//! surface.

pub mod records;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use records::{category_names, total_pages, Blog, CategoryField, PaginatedResult, Tool};
pub use requests::{LatestParams, ListingParams};
pub use responses::{HealthResponse, InvalidationResponse, StatsResponse};
