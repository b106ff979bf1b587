//! Query Cache Module
//!
//! Named, parameterized directory reads memoized in the shared store.
//!
//! Every operation follows the same cache-aside contract: build a key from its
//! normalized parameters, serve a fresh entry if there is one, otherwise query
//! the backend and store the result. A backend failure yields the operation's
//! empty shape and leaves the cache untouched, so the next call retries.

mod lookup;

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use chrono::Duration;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::{Direction, Query, RowSource};
use crate::cache::{CacheKey, CacheStats, SharedStore};
use crate::config::Config;
use crate::error::{DirectoryError, Result};
use crate::listing::ToolFilter;
use crate::models::{category_names, Blog, PaginatedResult, Tool};

pub use lookup::Lookup;

pub const TOOLS_TABLE: &str = "tools";
pub const BLOGS_TABLE: &str = "blogs";

/// Default TTL for listing queries.
pub const DEFAULT_LISTING_TTL_MINUTES: i64 = 60;

/// Rows per request when reading a whole table; the backend caps responses at
/// this many rows.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

// == Key Names ==
pub const KEY_ALL_TOOLS: &str = "tools:all";
pub const KEY_LATEST_TOOLS: &str = "tools:latest";
pub const KEY_FILTERED_TOOLS: &str = "tools:filtered";
pub const KEY_TOOL_BY_SLUG: &str = "tools:slug";
pub const KEY_ALL_BLOGS: &str = "blogs:all";
pub const KEY_LATEST_BLOGS: &str = "blogs:latest";
pub const KEY_BLOG_BY_SLUG: &str = "blogs:slug";
pub const KEY_CATEGORIES: &str = "categories:unique";

// == Query Cache ==
/// Cache-aside facade over the directory backend.
#[derive(Clone)]
pub struct QueryCache {
    store: SharedStore,
    source: Arc<dyn RowSource>,
    ttl: Duration,
    batch_size: usize,
}

impl QueryCache {
    /// Creates a facade with the default TTL and batch size.
    pub fn new(store: SharedStore, source: Arc<dyn RowSource>) -> Self {
        Self {
            store,
            source,
            ttl: Duration::minutes(DEFAULT_LISTING_TTL_MINUTES),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Creates a facade tuned from configuration.
    pub fn from_config(store: SharedStore, source: Arc<dyn RowSource>, config: &Config) -> Self {
        Self::new(store, source)
            .with_ttl(config.listing_ttl())
            .with_batch_size(config.fetch_batch_size)
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    // == Tools ==

    /// Every tool, newest first.
    pub async fn all_tools(&self) -> Lookup<Vec<Tool>> {
        let key = CacheKey::named(KEY_ALL_TOOLS);
        self.cached(
            key,
            move || async move {
                let query = Query::table(TOOLS_TABLE)
                    .order("created_at", Direction::Descending)
                    .order("id", Direction::Ascending);
                let rows = self.fetch_all(query).await?;
                Ok::<_, DirectoryError>(decode_rows(TOOLS_TABLE, rows))
            },
            Vec::new,
        )
        .await
    }

    /// The `limit` most recently added tools.
    pub async fn latest_tools(&self, limit: usize) -> Lookup<Vec<Tool>> {
        let key = CacheKey::builder(KEY_LATEST_TOOLS).param("limit", limit).build();
        self.cached(key, move || self.fetch_latest(TOOLS_TABLE, limit), Vec::new)
            .await
    }

    /// One page of tools matching `filter`, queried live on a miss.
    ///
    /// `total` is the backend's exact count under the same filters, so
    /// `total_pages` is right even for a short last page.
    pub async fn filtered_tools(&self, filter: &ToolFilter) -> Lookup<PaginatedResult<Tool>> {
        let key = filter.cache_key(KEY_FILTERED_TOOLS);
        let (page, page_size) = (filter.current_page(), filter.current_page_size());

        self.cached(
            key,
            move || async move {
                let response = self.source.fetch(&filter.to_query(TOOLS_TABLE)).await?;
                let returned = response.rows.len() as u64;
                let total = response
                    .count
                    .unwrap_or((filter.offset() as u64).saturating_add(returned));
                let records = decode_rows(TOOLS_TABLE, response.rows);
                Ok::<_, DirectoryError>(PaginatedResult::new(records, total, page, page_size))
            },
            || PaginatedResult::empty(page, page_size),
        )
        .await
    }

    /// One page of tools matching `filter`, computed in memory from the cached
    /// full listing. Issues no parameter-specific backend query.
    pub async fn browse_tools(&self, filter: &ToolFilter) -> Lookup<PaginatedResult<Tool>> {
        self.all_tools().await.map(|tools| filter.apply(&tools))
    }

    /// The tool with the given slug, if any.
    pub async fn tool_by_slug(&self, slug: &str) -> Lookup<Option<Tool>> {
        let key = CacheKey::builder(KEY_TOOL_BY_SLUG).param("slug", slug).build();
        self.cached(key, move || self.fetch_by_slug(TOOLS_TABLE, slug), || None)
            .await
    }

    /// Sorted, deduplicated category names across all tools.
    pub async fn unique_categories(&self) -> Lookup<Vec<String>> {
        let key = CacheKey::named(KEY_CATEGORIES);
        self.cached(
            key,
            move || async move {
                let query = Query::table(TOOLS_TABLE)
                    .select(&["id", "category"])
                    .not_null("category")
                    .order("id", Direction::Ascending);
                let rows = self.fetch_all(query).await?;

                let unique: BTreeSet<String> = rows
                    .iter()
                    .flat_map(|row| category_names(&row["category"]))
                    .collect();
                Ok::<_, DirectoryError>(unique.into_iter().collect())
            },
            Vec::new,
        )
        .await
    }

    // == Blogs ==

    /// Every blog post, newest first.
    pub async fn all_blogs(&self) -> Lookup<Vec<Blog>> {
        let key = CacheKey::named(KEY_ALL_BLOGS);
        self.cached(
            key,
            move || async move {
                let query = Query::table(BLOGS_TABLE)
                    .order("created_at", Direction::Descending)
                    .order("id", Direction::Ascending);
                let rows = self.fetch_all(query).await?;
                Ok::<_, DirectoryError>(decode_rows(BLOGS_TABLE, rows))
            },
            Vec::new,
        )
        .await
    }

    pub async fn latest_blogs(&self, limit: usize) -> Lookup<Vec<Blog>> {
        let key = CacheKey::builder(KEY_LATEST_BLOGS).param("limit", limit).build();
        self.cached(key, move || self.fetch_latest(BLOGS_TABLE, limit), Vec::new)
            .await
    }

    pub async fn blog_by_slug(&self, slug: &str) -> Lookup<Option<Blog>> {
        let key = CacheKey::builder(KEY_BLOG_BY_SLUG).param("slug", slug).build();
        self.cached(key, move || self.fetch_by_slug(BLOGS_TABLE, slug), || None)
            .await
    }

    // == Invalidation ==

    /// Drops every cached query. Returns the number of entries removed.
    pub async fn clear(&self) -> usize {
        let removed = self.store.write().await.clear();
        debug!("Cache cleared: {} entries removed", removed);
        removed
    }

    /// Drops cached queries whose key starts with `prefix`, e.g. `"tools:"`.
    pub async fn invalidate(&self, prefix: &str) -> usize {
        let removed = self.store.write().await.invalidate_prefix(prefix);
        debug!("Invalidated {} entries with prefix '{}'", removed, prefix);
        removed
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Cache-Aside Core ==

    async fn cached<T, F, Fut>(
        &self,
        key: CacheKey,
        fetch: F,
        fallback: impl FnOnce() -> T,
    ) -> Lookup<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        // Lock scope ends with the statement; never held across the fetch
        let hit = self.store.write().await.get(key.as_str());
        if let Some(value) = hit {
            match serde_json::from_value::<T>(value) {
                Ok(value) => {
                    debug!("Cache hit: {}", key);
                    return Lookup::cached(value);
                }
                Err(e) => warn!("Discarding undecodable cache entry {}: {}", key, e),
            }
        } else {
            debug!("Cache miss: {}", key);
        }

        match fetch().await {
            Ok(value) => {
                match serde_json::to_value(&value) {
                    Ok(encoded) => {
                        self.store.write().await.set(key.as_str(), encoded, self.ttl);
                        debug!("Cached {} for {}s", key, self.ttl.num_seconds());
                    }
                    Err(e) => warn!("Not caching {}: {}", key, e),
                }
                Lookup::fresh(value)
            }
            Err(e) => {
                warn!("Backend query for {} failed, serving empty result: {}", key, e);
                self.store.write().await.record_fallback();
                Lookup::fallback(fallback(), e)
            }
        }
    }

    // == Backend Reads ==

    /// Reads every row matching `query` in `batch_size` chunks until a short
    /// chunk comes back.
    async fn fetch_all(&self, query: Query) -> Result<Vec<Value>> {
        let mut rows = Vec::new();
        let mut offset = 0;

        loop {
            let batch = query.clone().range(offset, self.batch_size);
            let response = self.source.fetch(&batch).await?;
            let received = response.rows.len();
            rows.extend(response.rows);

            if received < self.batch_size {
                break;
            }
            offset += received;
        }

        debug!("Fetched {} rows from {}", rows.len(), query.table);
        Ok(rows)
    }

    async fn fetch_latest<T: DeserializeOwned>(&self, table: &str, limit: usize) -> Result<Vec<T>> {
        let query = Query::table(table)
            .order("created_at", Direction::Descending)
            .order("id", Direction::Ascending)
            .range(0, limit);
        let response = self.source.fetch(&query).await?;
        Ok(decode_rows(table, response.rows))
    }

    async fn fetch_by_slug<T: DeserializeOwned>(&self, table: &str, slug: &str) -> Result<Option<T>> {
        let query = Query::table(table).eq("slug", slug).range(0, 1);
        let response = self.source.fetch(&query).await?;
        Ok(decode_rows(table, response.rows).into_iter().next())
    }
}

/// Decodes rows, skipping (and logging) any that do not fit the record type.
fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed {} row: {}", table, e);
                None
            }
        })
        .collect()
}
