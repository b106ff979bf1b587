//! Cache key construction.
//!
//! A key is the query name followed by its parameters rendered as a JSON
//! object, e.g. `tools:latest{"limit":10}`. JSON escaping keeps parameter text
//! from bleeding into neighbouring fields, so distinct parameterizations never
//! collide.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

// == Cache Key ==
/// Deterministic key for one parameterization of a named query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Starts a key for the query `name`.
    pub fn builder(name: &'static str) -> CacheKeyBuilder {
        CacheKeyBuilder {
            name,
            params: BTreeMap::new(),
        }
    }

    /// Key for a query without parameters.
    pub fn named(name: &'static str) -> Self {
        Self::builder(name).build()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// == Builder ==
/// Accumulates parameters for a [`CacheKey`].
///
/// Parameters are stored in a sorted map, so the order of `param` calls does
/// not affect the resulting key.
#[derive(Debug)]
pub struct CacheKeyBuilder {
    name: &'static str,
    params: BTreeMap<String, Value>,
}

impl CacheKeyBuilder {
    /// Adds a parameter. `None` values are recorded as `null` so that an
    /// absent filter and a filter on the literal string "null" stay distinct.
    pub fn param<T: Serialize>(mut self, name: &str, value: T) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.params.insert(name.to_string(), value);
        self
    }

    pub fn build(self) -> CacheKey {
        let params = serde_json::to_string(&self.params).unwrap_or_default();
        CacheKey(format!("{}{}", self.name, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_key() {
        assert_eq!(CacheKey::named("tools:all").as_str(), "tools:all{}");
    }

    #[test]
    fn test_param_order_does_not_matter() {
        let a = CacheKey::builder("tools:filtered")
            .param("page", 2)
            .param("search", "chat")
            .build();
        let b = CacheKey::builder("tools:filtered")
            .param("search", "chat")
            .param("page", 2)
            .build();
        assert_eq!(a, b);
    }

    #[test]
    fn test_separator_text_does_not_collide() {
        let a = CacheKey::builder("tools:filtered")
            .param("search", "a\",\"category\":\"b")
            .param("category", Option::<String>::None)
            .build();
        let b = CacheKey::builder("tools:filtered")
            .param("search", "a")
            .param("category", "b")
            .build();
        assert_ne!(a, b);
    }

    #[test]
    fn test_none_differs_from_null_string() {
        let none = CacheKey::builder("q").param("category", Option::<&str>::None).build();
        let text = CacheKey::builder("q").param("category", "null").build();
        assert_ne!(none, text);
    }

    #[test]
    fn test_different_names_differ() {
        let a = CacheKey::builder("tools:latest").param("limit", 5).build();
        let b = CacheKey::builder("blogs:latest").param("limit", 5).build();
        assert_ne!(a, b);
    }
}
