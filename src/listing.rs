//! Listing Module
//!
//! Normalized listing parameters and the single implementation of
//! filter/sort/paginate. The live backend query and the in-memory pass over a
//! cached listing are both derived from the same [`ToolFilter`], so they agree
//! on what a filter means.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::backend::{compare_values, Direction, Query};
use crate::cache::CacheKey;
use crate::models::{PaginatedResult, Tool};

/// Page size used when a caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Columns matched by free-text search.
pub const SEARCH_COLUMNS: [&str; 2] = ["name", "description"];

/// Filter value meaning "no filter".
const ALL: &str = "all";

// == Sort Mode ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Most recently added first
    #[default]
    Newest,
    Oldest,
    /// Alphabetical by name
    Name,
    NameDesc,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
            SortMode::Name => "name",
            SortMode::NameDesc => "name_desc",
        }
    }

    /// Backend column and direction for this mode.
    pub fn ordering(&self) -> (&'static str, Direction) {
        match self {
            SortMode::Newest => ("created_at", Direction::Descending),
            SortMode::Oldest => ("created_at", Direction::Ascending),
            SortMode::Name => ("name", Direction::Ascending),
            SortMode::NameDesc => ("name", Direction::Descending),
        }
    }

    /// The order the row store returns for [`SortMode::ordering`] then `id`
    /// ascending: names in byte order, undated rows last when ascending and
    /// first when descending.
    fn compare(&self, a: &Tool, b: &Tool) -> Ordering {
        let (_, direction) = self.ordering();
        let ascending = match self {
            SortMode::Newest | SortMode::Oldest => match (&a.created_at, &b.created_at) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortMode::Name | SortMode::NameDesc => a.name.cmp(&b.name),
        };
        direction
            .apply(ascending)
            .then_with(|| compare_values(&a.id, &b.id))
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "newest" | "latest" => Ok(SortMode::Newest),
            "oldest" => Ok(SortMode::Oldest),
            "name" | "name_asc" => Ok(SortMode::Name),
            "name_desc" => Ok(SortMode::NameDesc),
            other => Err(format!("unknown sort mode '{}'", other)),
        }
    }
}

// == Tool Filter ==
/// Normalized parameters of a filtered, paginated tool listing.
///
/// Setters normalize their input: blank text and `"all"` clear a filter, the
/// page is at least 1, and the page size is clamped to `1..=MAX_PAGE_SIZE`.
/// Two filters built from equivalent input compare equal and produce the same
/// cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ToolFilter {
    search: Option<String>,
    category: Option<String>,
    price: Option<String>,
    sort: SortMode,
    page: usize,
    page_size: usize,
}

impl Default for ToolFilter {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            price: None,
            sort: SortMode::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ToolFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl AsRef<str>) -> Self {
        self.search = non_blank(text.as_ref());
        self
    }

    pub fn category(mut self, category: impl AsRef<str>) -> Self {
        self.category = non_blank(category.as_ref()).filter(|c| !c.eq_ignore_ascii_case(ALL));
        self
    }

    pub fn price(mut self, price: impl AsRef<str>) -> Self {
        self.price = non_blank(price.as_ref()).filter(|p| !p.eq_ignore_ascii_case(ALL));
        self
    }

    pub fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn current_page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the first record on the requested page. Saturates for pages
    /// no listing can reach, which then come back empty.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Cache key for this parameterization of the query `name`.
    pub fn cache_key(&self, name: &'static str) -> CacheKey {
        CacheKey::builder(name)
            .param("search", &self.search)
            .param("category", &self.category)
            .param("price", &self.price)
            .param("sort", self.sort.as_str())
            .param("page", self.page)
            .param("page_size", self.page_size)
            .build()
    }

    /// Backend query for the requested page, with an exact total count.
    pub fn to_query(&self, table: &str) -> Query {
        let mut query = Query::table(table);
        if let Some(term) = &self.search {
            query = query.search(&SEARCH_COLUMNS, term.clone());
        }
        if let Some(category) = &self.category {
            query = query.contains("category", category.clone());
        }
        if let Some(price) = &self.price {
            query = query.eq("pricing", price.clone());
        }
        let (column, direction) = self.sort.ordering();
        query
            .order(column, direction)
            .order("id", Direction::Ascending)
            .range(self.offset(), self.page_size)
            .count_exact()
    }

    /// Whether `tool` passes the search, category and price filters.
    pub fn matches(&self, tool: &Tool) -> bool {
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let in_name = tool.name.to_lowercase().contains(&term);
            let in_description = tool
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&term))
                .unwrap_or(false);
            if !in_name && !in_description {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !tool.category.as_ref().is_some_and(|c| c.includes(category)) {
                return false;
            }
        }
        if let Some(price) = &self.price {
            if tool.pricing.as_deref() != Some(price.as_str()) {
                return false;
            }
        }
        true
    }

    /// Filters, sorts and paginates an already loaded listing.
    pub fn apply(&self, tools: &[Tool]) -> PaginatedResult<Tool> {
        let mut matched: Vec<&Tool> = tools.iter().filter(|t| self.matches(t)).collect();
        matched.sort_by(|a, b| self.sort.compare(a, b));

        let total = matched.len() as u64;
        let records = matched
            .into_iter()
            .skip(self.offset())
            .take(self.page_size)
            .cloned()
            .collect();

        PaginatedResult::new(records, total, self.page, self.page_size)
    }
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
