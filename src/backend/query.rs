//! Query builder for row store reads.

use std::cmp::Ordering as CmpOrdering;

use serde_json::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Turns an ascending comparison into one for this direction.
    pub fn apply(self, ascending: CmpOrdering) -> CmpOrdering {
        match self {
            Direction::Ascending => ascending,
            Direction::Descending => ascending.reverse(),
        }
    }
}

/// Ascending order over JSON scalars as the row store sorts them: numbers
/// numerically, text by byte order (`C` collation), nulls after everything.
/// Under [`Direction::Descending`] nulls therefore come first.
pub fn compare_values(a: &Value, b: &Value) -> CmpOrdering {
    match (a, b) {
        (Value::Null, Value::Null) => CmpOrdering::Equal,
        (Value::Null, _) => CmpOrdering::Greater,
        (_, Value::Null) => CmpOrdering::Less,
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(CmpOrdering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (x, y) => x.to_string().cmp(&y.to_string()),
    }
}

/// Row filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Column equals the value
    Eq(String, Value),
    /// Array column contains the value; scalar columns match on equality
    Contains(String, String),
    /// Column is not null
    NotNull(String),
    /// Case-insensitive substring match on any of the columns
    Search { columns: Vec<String>, term: String },
}

/// Ordering on a single column.
#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    pub column: String,
    pub direction: Direction,
}

// == Query ==
/// A read against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    /// Selected columns; empty means every column
    pub columns: Vec<String>,
    pub filters: Vec<Filter>,
    /// Sort keys, most significant first
    pub order: Vec<Ordering>,
    /// `(offset, limit)`
    pub range: Option<(usize, usize)>,
    /// Ask the store for the exact number of matching rows
    pub count_exact: bool,
}

impl Query {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            order: Vec::new(),
            range: None,
            count_exact: false,
        }
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::Eq(column.to_string(), value.into()))
    }

    pub fn contains(self, column: &str, value: impl Into<String>) -> Self {
        self.filter(Filter::Contains(column.to_string(), value.into()))
    }

    pub fn not_null(self, column: &str) -> Self {
        self.filter(Filter::NotNull(column.to_string()))
    }

    pub fn search(self, columns: &[&str], term: impl Into<String>) -> Self {
        self.filter(Filter::Search {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            term: term.into(),
        })
    }

    /// Adds a sort key. Later keys break ties left by earlier ones.
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order.push(Ordering {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn range(mut self, offset: usize, limit: usize) -> Self {
        self.range = Some((offset, limit));
        self
    }

    pub fn count_exact(mut self) -> Self {
        self.count_exact = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_collects_parts() {
        let query = Query::table("tools")
            .select(&["id", "name"])
            .eq("pricing", "free")
            .order("created_at", Direction::Descending)
            .range(15, 15)
            .count_exact();

        assert_eq!(query.table, "tools");
        assert_eq!(query.columns, vec!["id", "name"]);
        assert_eq!(
            query.filters,
            vec![Filter::Eq("pricing".to_string(), Value::from("free"))]
        );
        assert_eq!(query.range, Some((15, 15)));
        assert!(query.count_exact);
    }

    #[test]
    fn test_order_keys_accumulate() {
        let query = Query::table("tools")
            .order("created_at", Direction::Descending)
            .order("id", Direction::Ascending);

        let columns: Vec<&str> = query.order.iter().map(|o| o.column.as_str()).collect();
        assert_eq!(columns, vec!["created_at", "id"]);
    }

    #[test]
    fn test_compare_values_matches_row_store_order() {
        // Byte order puts upper case before lower case
        assert_eq!(compare_values(&json!("Banana"), &json!("apple")), CmpOrdering::Less);
        assert_eq!(compare_values(&json!(2), &json!(10)), CmpOrdering::Less);
        assert_eq!(compare_values(&Value::Null, &json!("a")), CmpOrdering::Greater);
        assert_eq!(
            Direction::Descending.apply(compare_values(&Value::Null, &json!("a"))),
            CmpOrdering::Less
        );
    }
}
