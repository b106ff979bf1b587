//! API Module
//!
//! HTTP handlers and routing for the directory cache service.
//!
//! # Endpoints
//! - `GET /tools` - All tools, newest first
//! - `GET /tools/latest?limit=N` - Most recent tools
//! - `GET /tools/search?...` - Filtered, paginated tools (live query)
//! - `GET /tools/browse?...` - Filtered, paginated tools (from cached listing)
//! - `GET /tools/:slug` - One tool
//! - `GET /blogs`, `GET /blogs/latest`, `GET /blogs/:slug` - Blog posts
//! - `GET /categories` - Unique tool categories
//! - `GET /stats` - Cache statistics
//! - `DELETE /cache` - Drop every cached query
//! - `DELETE /cache/:prefix` - Drop cached queries by key prefix
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
