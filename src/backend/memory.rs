//! In-memory row source
//!
//! Holds rows per table and evaluates queries with the same semantics as the
//! PostgREST client. Counts fetches and can be switched off to simulate an
//! outage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{compare_values, BackendError, Filter, Query, QueryResponse, RowSource};

/// Row store kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemorySource {
    tables: RwLock<HashMap<String, Vec<Value>>>,
    fetches: AtomicUsize,
    failing: AtomicBool,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the rows of `table`.
    pub fn with_table(self, table: &str, rows: Vec<Value>) -> Self {
        self.insert_table(table, rows);
        self
    }

    pub fn insert_table(&self, table: &str, rows: Vec<Value>) {
        let mut tables = self.tables.write().unwrap_or_else(|p| p.into_inner());
        tables.insert(table.to_string(), rows);
    }

    /// Number of queries executed so far, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Makes every subsequent fetch fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl RowSource for MemorySource {
    async fn fetch(&self, query: &Query) -> Result<QueryResponse, BackendError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable);
        }

        let tables = self.tables.read().unwrap_or_else(|p| p.into_inner());
        let rows = tables.get(&query.table).cloned().unwrap_or_default();
        drop(tables);

        let mut matched: Vec<Value> = rows
            .into_iter()
            .filter(|row| query.filters.iter().all(|f| matches_filter(row, f)))
            .collect();

        if !query.order.is_empty() {
            matched.sort_by(|a, b| {
                query
                    .order
                    .iter()
                    .map(|o| o.direction.apply(compare_values(&a[&o.column], &b[&o.column])))
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        let total = matched.len() as u64;
        let page: Vec<Value> = match query.range {
            Some((offset, limit)) => matched.into_iter().skip(offset).take(limit).collect(),
            None => matched,
        };

        let rows = page
            .into_iter()
            .map(|row| project(row, &query.columns))
            .collect();

        Ok(QueryResponse {
            rows,
            count: query.count_exact.then_some(total),
        })
    }
}

fn matches_filter(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(column, expected) => match (&row[column], expected) {
            (Value::String(a), Value::String(b)) => a == b,
            (actual, expected) => actual == expected,
        },
        Filter::Contains(column, needle) => match &row[column] {
            Value::Array(items) => items.iter().any(|item| item.as_str() == Some(needle)),
            Value::String(s) => s == needle,
            _ => false,
        },
        Filter::NotNull(column) => !row[column].is_null(),
        Filter::Search { columns, term } => {
            let term = term.to_lowercase();
            columns.iter().any(|column| {
                row[column]
                    .as_str()
                    .map(|text| text.to_lowercase().contains(&term))
                    .unwrap_or(false)
            })
        }
    }
}

fn project(row: Value, columns: &[String]) -> Value {
    if columns.is_empty() {
        return row;
    }
    let mut selected = Map::new();
    for column in columns {
        selected.insert(column.clone(), row.get(column).cloned().unwrap_or(Value::Null));
    }
    Value::Object(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Direction;
    use serde_json::json;

    fn source() -> MemorySource {
        MemorySource::new().with_table(
            "tools",
            vec![
                json!({"id": 1, "name": "ChatBot", "category": ["Chat", "Writing"], "pricing": "free", "created_at": "2024-01-01T00:00:00Z"}),
                json!({"id": 2, "name": "Painter", "category": "Image", "pricing": "paid", "created_at": "2024-03-01T00:00:00Z"}),
                json!({"id": 3, "name": "Scribe", "category": null, "pricing": "free", "created_at": "2024-02-01T00:00:00Z"}),
            ],
        )
    }

    #[tokio::test]
    async fn test_filters_order_and_count() {
        let source = source();
        let query = Query::table("tools")
            .eq("pricing", "free")
            .order("created_at", Direction::Descending)
            .count_exact();

        let response = source.fetch(&query).await.unwrap();
        let ids: Vec<i64> = response.rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(response.count, Some(2));
    }

    #[tokio::test]
    async fn test_secondary_order_breaks_ties() {
        let source = MemorySource::new().with_table(
            "tools",
            vec![
                json!({"id": 3, "created_at": "2024-01-01T00:00:00Z"}),
                json!({"id": 1, "created_at": "2024-01-01T00:00:00Z"}),
                json!({"id": 2, "created_at": "2024-02-01T00:00:00Z"}),
            ],
        );
        let query = Query::table("tools")
            .order("created_at", Direction::Descending)
            .order("id", Direction::Ascending);

        let response = source.fetch(&query).await.unwrap();
        let ids: Vec<i64> = response.rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[tokio::test]
    async fn test_contains_matches_arrays_and_scalars() {
        let source = source();

        let chat = source.fetch(&Query::table("tools").contains("category", "Chat")).await.unwrap();
        assert_eq!(chat.rows.len(), 1);

        let image = source.fetch(&Query::table("tools").contains("category", "Image")).await.unwrap();
        assert_eq!(image.rows.len(), 1);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let source = source();
        let response = source
            .fetch(&Query::table("tools").search(&["name"], "SCRI"))
            .await
            .unwrap();
        assert_eq!(response.rows.len(), 1);
        assert_eq!(response.rows[0]["name"], "Scribe");
    }

    #[tokio::test]
    async fn test_range_past_end_is_empty_with_count() {
        let source = source();
        let response = source
            .fetch(&Query::table("tools").range(10, 5).count_exact())
            .await
            .unwrap();
        assert!(response.rows.is_empty());
        assert_eq!(response.count, Some(3));
    }

    #[tokio::test]
    async fn test_select_projects_columns() {
        let source = source();
        let response = source
            .fetch(&Query::table("tools").select(&["category"]).not_null("category"))
            .await
            .unwrap();
        assert_eq!(response.rows.len(), 2);
        assert!(response.rows.iter().all(|r| r.get("name").is_none()));
    }

    #[tokio::test]
    async fn test_failing_mode() {
        let source = source();
        source.set_failing(true);

        let result = source.fetch(&Query::table("tools")).await;
        assert!(matches!(result, Err(BackendError::Unavailable)));
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_table_is_empty() {
        let response = source().fetch(&Query::table("nope")).await.unwrap();
        assert!(response.rows.is_empty());
    }
}
