//! API Routes
//!
//! Configures the Axum router with all directory endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    blog_handler, browse_tools_handler, categories_handler, clear_cache_handler, health_handler,
    invalidate_handler, latest_blogs_handler, latest_tools_handler, list_blogs_handler,
    list_tools_handler, search_tools_handler, stats_handler, tool_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /tools`, `/tools/latest`, `/tools/search`, `/tools/browse`, `/tools/:slug`
/// - `GET /blogs`, `/blogs/latest`, `/blogs/:slug`
/// - `GET /categories`
/// - `GET /stats`, `DELETE /cache`, `DELETE /cache/:prefix`
/// - `GET /health`
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/tools", get(list_tools_handler))
        .route("/tools/latest", get(latest_tools_handler))
        .route("/tools/search", get(search_tools_handler))
        .route("/tools/browse", get(browse_tools_handler))
        .route("/tools/:slug", get(tool_handler))
        .route("/blogs", get(list_blogs_handler))
        .route("/blogs/latest", get(latest_blogs_handler))
        .route("/blogs/:slug", get(blog_handler))
        .route("/categories", get(categories_handler))
        .route("/stats", get(stats_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/:prefix", delete(invalidate_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
