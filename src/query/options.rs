//! List query parameters and the pagination envelope
//!
//! All parameters have the defaults fixed by the wire contract:
//! `page=1`, `limit=20`, `sort=created_at`, `order=desc`.
//!
//! ```text
//! GET /api/products?page=2&limit=10
//! GET /api/products?filter={"status":"active"}&sort=price&order=asc
//! GET /api/products?q=hub&relations=category
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameters accepted by every List endpoint.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ListOptions {
    /// Page number (starts at 1)
    #[serde(default = "default_page")]
    pub page: u64,

    /// Number of items per page
    #[serde(default = "default_limit")]
    pub limit: u64,

    /// Sort column (must be allow-listed for the record type)
    pub sort: Option<String>,

    /// Sort direction: `asc` or `desc`
    pub order: Option<String>,

    /// Filter payload as a JSON object string
    pub filter: Option<String>,

    /// Comma-separated relation names to eager-load
    pub relations: Option<String>,

    /// Free-text search across the record's searchable fields
    pub q: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    20
}

impl ListOptions {
    /// Page number, ensuring a minimum of 1
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// Limit clamped to `[1, max]`
    pub fn limit(&self, max: u64) -> u64 {
        self.limit.clamp(1, max.max(1))
    }

    /// Sort column, defaulting to `created_at`
    pub fn sort_column(&self) -> &str {
        self.sort
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("created_at")
    }

    /// Relation names in request order, trimmed, duplicates removed
    pub fn relation_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        if let Some(raw) = self.relations.as_deref() {
            for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

/// The pagination envelope returned by List endpoints.
///
/// `total` counts every record matching the filter predicate, before
/// offset/limit are applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T = Value> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ListOptions::default();
        assert_eq!(options.page(), 1);
        assert_eq!(options.limit(100), 20);
        assert_eq!(options.sort_column(), "created_at");
        assert!(options.relation_names().is_empty());
    }

    #[test]
    fn test_page_floor_and_limit_clamp() {
        let options = ListOptions {
            page: 0,
            limit: 5000,
            ..Default::default()
        };
        assert_eq!(options.page(), 1);
        assert_eq!(options.limit(100), 100);
    }

    #[test]
    fn test_relation_names_split_trim_dedup() {
        let options = ListOptions {
            relations: Some(" category, category , ,stock".to_string()),
            ..Default::default()
        };
        assert_eq!(options.relation_names(), vec!["category", "stock"]);
    }

    #[test]
    fn test_query_string_deserialization() {
        let options: ListOptions =
            serde_urlencoded_like("page=3&limit=10&sort=price&order=asc&q=hub");
        assert_eq!(options.page, 3);
        assert_eq!(options.limit, 10);
        assert_eq!(options.sort_column(), "price");
        assert_eq!(options.order.as_deref(), Some("asc"));
        assert_eq!(options.q.as_deref(), Some("hub"));
    }

    // Minimal query-string decoding for tests, mirroring what axum's
    // Query extractor produces.
    fn serde_urlencoded_like(qs: &str) -> ListOptions {
        let map: serde_json::Map<String, Value> = qs
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .map(|(k, v)| {
                let value = v
                    .parse::<u64>()
                    .map(|n| Value::from(n))
                    .unwrap_or_else(|_| Value::from(v));
                (k.to_string(), value)
            })
            .collect();
        serde_json::from_value(Value::Object(map)).unwrap()
    }
}
