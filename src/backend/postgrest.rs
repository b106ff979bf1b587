//! PostgREST client
//!
//! Translates [`Query`] values into PostgREST HTTP reads
//! (`GET {url}/rest/v1/{table}?...`).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::{BackendError, Direction, Filter, Query, QueryResponse, RowSource};

/// Row store client speaking the PostgREST dialect.
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    client: Client,
    base_url: String,
}

impl PostgrestClient {
    /// Creates a client for the project at `url` authenticated with `anon_key`.
    pub fn new(url: &str, anon_key: &str) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(anon_key)
            .map_err(|e| BackendError::Decode(format!("invalid API key header: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", anon_key))
            .map_err(|e| BackendError::Decode(format!("invalid API key header: {}", e)))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: format!("{}/rest/v1", url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl RowSource for PostgrestClient {
    async fn fetch(&self, query: &Query) -> Result<QueryResponse, BackendError> {
        let url = format!("{}/{}", self.base_url, query.table);
        let params = query_params(query);
        debug!("GET {} {:?}", url, params);

        let mut request = self.client.get(&url).query(&params);
        if query.count_exact {
            request = request.header("Prefer", "count=exact");
        }

        let response = request.send().await?;
        let status = response.status();
        let count = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total);

        // Offset past the last row: PostgREST answers 416 with the total
        if status == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok(QueryResponse {
                rows: Vec::new(),
                count: count.or(Some(0)),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response.json().await?;
        let rows = match body {
            Value::Array(rows) => rows,
            other => {
                return Err(BackendError::Decode(format!(
                    "expected a JSON array, got {}",
                    other
                )))
            }
        };

        Ok(QueryResponse {
            rows,
            count: if query.count_exact { count } else { None },
        })
    }
}

// == Query Encoding ==
/// Renders a query as PostgREST URL parameters.
pub(crate) fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = Vec::new();

    let select = if query.columns.is_empty() {
        "*".to_string()
    } else {
        query.columns.join(",")
    };
    params.push(("select".to_string(), select));

    for filter in &query.filters {
        match filter {
            Filter::Eq(column, value) => {
                params.push((column.clone(), format!("eq.{}", scalar_text(value))));
            }
            Filter::Contains(column, value) => {
                params.push((column.clone(), format!("cs.{{{}}}", quote_array_item(value))));
            }
            Filter::NotNull(column) => {
                params.push((column.clone(), "not.is.null".to_string()));
            }
            Filter::Search { columns, term } => {
                let term = sanitize_search_term(term);
                let clauses: Vec<String> = columns
                    .iter()
                    .map(|column| format!("{}.ilike.*{}*", column, term))
                    .collect();
                params.push(("or".to_string(), format!("({})", clauses.join(","))));
            }
        }
    }

    if !query.order.is_empty() {
        let keys: Vec<String> = query
            .order
            .iter()
            .map(|order| {
                let direction = match order.direction {
                    Direction::Ascending => "asc",
                    Direction::Descending => "desc",
                };
                format!("{}.{}", order.column, direction)
            })
            .collect();
        params.push(("order".to_string(), keys.join(",")));
    }

    if let Some((offset, limit)) = query.range {
        params.push(("offset".to_string(), offset.to_string()));
        params.push(("limit".to_string(), limit.to_string()));
    }

    params
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Quotes one element of a PostgREST array literal.
fn quote_array_item(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Strips characters that would break the `or=(...)` grammar.
fn sanitize_search_term(term: &str) -> String {
    term.chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '*'))
        .collect()
}

/// Extracts the total from a `Content-Range` header such as `0-14/16` or `*/0`.
pub(crate) fn parse_content_range_total(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(String, String)], name: &str) -> Vec<&'a str> {
        params
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[test]
    fn test_select_defaults_to_star() {
        let params = query_params(&Query::table("tools"));
        assert_eq!(param(&params, "select"), vec!["*"]);
    }

    #[test]
    fn test_filters_and_paging_encoding() {
        let query = Query::table("tools")
            .select(&["id", "name", "category"])
            .eq("pricing", "freemium")
            .contains("category", "AI Writing")
            .not_null("category")
            .order("created_at", Direction::Descending)
            .order("id", Direction::Ascending)
            .range(30, 15);
        let params = query_params(&query);

        assert_eq!(param(&params, "select"), vec!["id,name,category"]);
        assert_eq!(param(&params, "pricing"), vec!["eq.freemium"]);
        assert_eq!(
            param(&params, "category"),
            vec!["cs.{\"AI Writing\"}", "not.is.null"]
        );
        assert_eq!(param(&params, "order"), vec!["created_at.desc,id.asc"]);
        assert_eq!(param(&params, "offset"), vec!["30"]);
        assert_eq!(param(&params, "limit"), vec!["15"]);
    }

    #[test]
    fn test_search_encoding_strips_grammar_characters() {
        let query = Query::table("tools").search(&["name", "description"], "chat (gpt), *");
        let params = query_params(&query);
        assert_eq!(
            param(&params, "or"),
            vec!["(name.ilike.*chat gpt *,description.ilike.*chat gpt *)"]
        );
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range_total("0-14/16"), Some(16));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-14/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[test]
    fn test_client_rejects_unprintable_key() {
        let result = PostgrestClient::new("https://example.supabase.co", "bad\nkey");
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }
}
