//! Request DTOs for the directory API
//!
//! Query-string parameters accepted by the listing endpoints.

use serde::Deserialize;

use crate::listing::{SortMode, ToolFilter};

/// Default number of rows for `latest` endpoints.
pub const DEFAULT_LATEST_LIMIT: usize = 10;

/// Largest `limit` accepted by `latest` endpoints.
pub const MAX_LATEST_LIMIT: usize = 100;

/// Query parameters for filtered tool listings
/// (`GET /tools/search`, `GET /tools/browse`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl ListingParams {
    /// Converts raw parameters into a normalized filter.
    ///
    /// Returns an error message for an unknown sort mode.
    pub fn into_filter(self, default_page_size: usize) -> Result<ToolFilter, String> {
        let sort = match self.sort.as_deref() {
            Some(raw) => raw.parse::<SortMode>()?,
            None => SortMode::default(),
        };

        Ok(ToolFilter::new()
            .search(self.search.unwrap_or_default())
            .category(self.category.unwrap_or_default())
            .price(self.price.unwrap_or_default())
            .sort(sort)
            .page(self.page.unwrap_or(1))
            .page_size(self.page_size.unwrap_or(default_page_size)))
    }
}

/// Query parameters for `latest` endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LatestParams {
    #[serde(default)]
    pub limit: Option<usize>,
}

impl LatestParams {
    /// Requested limit, defaulted and clamped to `1..=MAX_LATEST_LIMIT`.
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_LATEST_LIMIT)
            .clamp(1, MAX_LATEST_LIMIT)
    }
}
