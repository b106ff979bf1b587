//! Query results tagged with where they came from.

use crate::error::{DirectoryError, Result};

/// Where a [`Lookup`] value came from.
#[derive(Debug)]
enum Origin {
    /// Served from a fresh cache entry
    Cache,
    /// Loaded from the backend and stored
    Backend,
    /// The backend failed; the value is the operation's empty shape
    Fallback(DirectoryError),
}

/// Result of a facade read.
///
/// `into_inner` gives the value regardless of origin, which keeps backend
/// outages invisible to callers that render "no results". `into_result`
/// surfaces the outage instead.
#[derive(Debug)]
pub struct Lookup<T> {
    value: T,
    origin: Origin,
}

impl<T> Lookup<T> {
    pub fn cached(value: T) -> Self {
        Self {
            value,
            origin: Origin::Cache,
        }
    }

    pub fn fresh(value: T) -> Self {
        Self {
            value,
            origin: Origin::Backend,
        }
    }

    pub fn fallback(value: T, error: DirectoryError) -> Self {
        Self {
            value,
            origin: Origin::Fallback(error),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn is_cached(&self) -> bool {
        matches!(self.origin, Origin::Cache)
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, Origin::Fallback(_))
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    /// Returns the value, or the backend error for a fallback.
    pub fn into_result(self) -> Result<T> {
        match self.origin {
            Origin::Fallback(error) => Err(error),
            _ => Ok(self.value),
        }
    }

    /// Transforms the value, keeping the origin.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        Lookup {
            value: f(self.value),
            origin: self.origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;

    #[test]
    fn test_fallback_into_result_is_error() {
        let lookup = Lookup::fallback(Vec::<u8>::new(), BackendError::Unavailable.into());
        assert!(lookup.is_fallback());
        assert!(matches!(lookup.into_result(), Err(DirectoryError::Backend(_))));
    }

    #[test]
    fn test_map_keeps_origin() {
        let lookup = Lookup::cached(vec![1, 2, 3]).map(|v| v.len());
        assert!(lookup.is_cached());
        assert_eq!(lookup.into_inner(), 3);
    }

    #[test]
    fn test_fresh_into_result_is_ok() {
        let lookup = Lookup::fresh("value");
        assert!(!lookup.is_cached());
        assert_eq!(lookup.into_result().unwrap(), "value");
    }
}
