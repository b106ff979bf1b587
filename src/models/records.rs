//! Directory records as stored in the backend.
//!
//! Columns the cache does not interpret are kept in `extra` so records pass
//! through verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `category` column value: legacy rows hold a single string, newer rows a
/// list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryField {
    One(String),
    Many(Vec<String>),
}

impl CategoryField {
    /// Row store containment: a list holds `wanted` as an item, a single
    /// string equals it. No trimming or case folding.
    pub fn includes(&self, wanted: &str) -> bool {
        match self {
            CategoryField::One(name) => name == wanted,
            CategoryField::Many(names) => names.iter().any(|name| name == wanted),
        }
    }
}

/// Extracts category names from a raw `category` cell.
///
/// Tolerates anything the column may hold: a string, a list (non-string items
/// are skipped), null, or an unexpected type.
pub fn category_names(cell: &Value) -> Vec<String> {
    let raw: Vec<&str> = match cell {
        Value::String(name) => vec![name.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };
    raw.into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

// == Tool ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryField>,
    /// Price tier, e.g. `free`, `freemium`, `paid`
    #[serde(default)]
    pub pricing: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}


// == Blog ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub category: Option<CategoryField>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// == Pagination Envelope ==
/// One page of a filtered listing plus totals for the whole result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub records: Vec<T>,
    pub total: u64,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: u64,
}

impl<T> PaginatedResult<T> {
    /// Builds an envelope; `total_pages` is `ceil(total / page_size)`.
    pub fn new(records: Vec<T>, total: u64, page: usize, page_size: usize) -> Self {
        Self {
            records,
            total,
            page,
            page_size,
            total_pages: total_pages(total, page_size),
        }
    }

    /// The envelope returned when nothing could be loaded.
    pub fn empty(page: usize, page_size: usize) -> Self {
        Self::new(Vec::new(), 0, page, page_size)
    }
}

pub fn total_pages(total: u64, page_size: usize) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_accepts_single_and_list_categories() {
        let single: Tool = serde_json::from_value(json!({
            "id": 1, "name": "A", "category": "Chat"
        }))
        .unwrap();
        assert_eq!(single.category, Some(CategoryField::One("Chat".to_string())));

        let list: Tool = serde_json::from_value(json!({
            "id": "uuid-2", "name": "B", "category": ["Chat", "", "Image"]
        }))
        .unwrap();
        let category = list.category.unwrap();
        assert!(category.includes("Image"));
        assert!(!category.includes("Writing"));

        let none: Tool = serde_json::from_value(json!({"id": 3, "name": "C", "category": null})).unwrap();
        assert!(none.category.is_none());
    }

    #[test]
    fn test_includes_is_exact() {
        let padded = CategoryField::Many(vec![" Chat ".to_string()]);
        assert!(padded.includes(" Chat "));
        assert!(!padded.includes("Chat"));
        assert!(!CategoryField::One("chat".to_string()).includes("Chat"));
    }

    #[test]
    fn test_tool_keeps_unknown_columns() {
        let raw = json!({
            "id": 1,
            "name": "A",
            "website": "https://a.example",
            "created_at": "2024-05-01T10:00:00+00:00"
        });
        let tool: Tool = serde_json::from_value(raw).unwrap();
        assert_eq!(tool.extra["website"], "https://a.example");
        assert!(tool.created_at.is_some());
    }

    #[test]
    fn test_category_names_from_raw_cells() {
        assert_eq!(category_names(&json!("  Audio ")), vec!["Audio"]);
        assert_eq!(category_names(&json!(["A", 3, " ", "B"])), vec!["A", "B"]);
        assert!(category_names(&json!(null)).is_empty());
        assert!(category_names(&json!("")).is_empty());
        assert!(category_names(&json!(42)).is_empty());
    }

    #[test]
    fn test_envelope_serializes_camel_case() {
        let page: PaginatedResult<u8> = PaginatedResult::new(vec![1], 16, 2, 15);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pageSize"], 15);
        assert_eq!(json["totalPages"], 2);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 15), 0);
        assert_eq!(total_pages(15, 15), 1);
        assert_eq!(total_pages(16, 15), 2);
        assert_eq!(total_pages(5, 0), 0);
    }
}
