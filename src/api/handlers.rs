//! API Handlers
//!
//! HTTP request handlers over the query cache. Listing handlers always answer
//! 200: when the backend is down they return the empty shape, as the render
//! layer expects.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::config::Config;
use crate::error::{DirectoryError, Result};
use crate::listing::DEFAULT_PAGE_SIZE;
use crate::models::{
    Blog, HealthResponse, InvalidationResponse, LatestParams, ListingParams, PaginatedResult,
    StatsResponse, Tool,
};
use crate::queries::QueryCache;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache-aside facade over the backend
    pub queries: QueryCache,
    /// Page size for listing requests that do not name one
    pub default_page_size: usize,
}

impl AppState {
    pub fn new(queries: QueryCache) -> Self {
        Self {
            queries,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn from_config(queries: QueryCache, config: &Config) -> Self {
        Self {
            queries,
            default_page_size: config.default_page_size,
        }
    }
}

/// Handler for GET /tools
pub async fn list_tools_handler(State(state): State<AppState>) -> Json<Vec<Tool>> {
    Json(state.queries.all_tools().await.into_inner())
}

/// Handler for GET /tools/latest?limit=N
pub async fn latest_tools_handler(
    State(state): State<AppState>,
    Query(params): Query<LatestParams>,
) -> Json<Vec<Tool>> {
    Json(state.queries.latest_tools(params.limit()).await.into_inner())
}

/// Handler for GET /tools/search
///
/// Live, per-parameter cached query against the backend.
pub async fn search_tools_handler(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<PaginatedResult<Tool>>> {
    let filter = params
        .into_filter(state.default_page_size)
        .map_err(DirectoryError::InvalidRequest)?;
    Ok(Json(state.queries.filtered_tools(&filter).await.into_inner()))
}

/// Handler for GET /tools/browse
///
/// Same envelope as `/tools/search`, computed from the cached full listing.
pub async fn browse_tools_handler(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> Result<Json<PaginatedResult<Tool>>> {
    let filter = params
        .into_filter(state.default_page_size)
        .map_err(DirectoryError::InvalidRequest)?;
    Ok(Json(state.queries.browse_tools(&filter).await.into_inner()))
}

/// Handler for GET /tools/:slug
pub async fn tool_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Tool>> {
    state
        .queries
        .tool_by_slug(&slug)
        .await
        .into_inner()
        .map(Json)
        .ok_or_else(|| DirectoryError::NotFound(format!("tool '{}'", slug)))
}

/// Handler for GET /blogs
pub async fn list_blogs_handler(State(state): State<AppState>) -> Json<Vec<Blog>> {
    Json(state.queries.all_blogs().await.into_inner())
}

/// Handler for GET /blogs/latest?limit=N
pub async fn latest_blogs_handler(
    State(state): State<AppState>,
    Query(params): Query<LatestParams>,
) -> Json<Vec<Blog>> {
    Json(state.queries.latest_blogs(params.limit()).await.into_inner())
}

/// Handler for GET /blogs/:slug
pub async fn blog_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Blog>> {
    state
        .queries
        .blog_by_slug(&slug)
        .await
        .into_inner()
        .map(Json)
        .ok_or_else(|| DirectoryError::NotFound(format!("blog '{}'", slug)))
}

/// Handler for GET /categories
pub async fn categories_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.queries.unique_categories().await.into_inner())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.queries.stats().await.into())
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<InvalidationResponse> {
    let removed = state.queries.clear().await;
    Json(InvalidationResponse::cleared(removed))
}

/// Handler for DELETE /cache/:prefix
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> Result<Json<InvalidationResponse>> {
    if prefix.trim().is_empty() {
        return Err(DirectoryError::InvalidRequest(
            "Prefix cannot be empty".to_string(),
        ));
    }
    let removed = state.queries.invalidate(&prefix).await;
    Ok(Json(InvalidationResponse::prefix(&prefix, removed)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
