//! Query Composer: filter clauses + list options → one composed query
//!
//! [`compose`] is pure: the same clauses and options always produce an
//! identical [`SelectQuery`] value (it derives `PartialEq` so tests can
//! assert exactly that). Validation of the sort column, sort direction,
//! and every relation name happens here; the executing store receives
//! only allow-listed identifiers.

use crate::config::QueryConfig;
use crate::core::record::{Record, Relation};
use crate::error::ApiError;
use crate::query::filter::FilterClause;
use crate::query::options::ListOptions;

/// Sort direction, `desc` by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    fn parse(s: &str) -> Result<Self, ApiError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ApiError::Validation(format!(
                "invalid sort direction '{}'",
                other
            ))),
        }
    }
}

/// Ordering specification for a composed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub direction: SortDirection,
}

/// A fully composed, validated read query.
///
/// Execution contract: the store filters out soft-deleted records unless
/// `include_deleted` is set, applies the clauses as one AND conjunction in
/// order, sorts, computes the total on the filtered set, then applies
/// `offset()` and `limit`. Executing a `SelectQuery` never mutates state.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    /// Storage table key: the record type's plural resource name.
    pub resource: &'static str,
    pub clauses: Vec<FilterClause>,
    /// Relations to eager-load into the result documents, in request order.
    pub expand: Vec<&'static Relation>,
    pub sort: Sort,
    pub page: u64,
    pub limit: u64,
    pub include_deleted: bool,
}

impl SelectQuery {
    /// A bare query over a record type: no clauses, default sort, first page.
    pub fn for_record<T: Record>() -> Self {
        Self {
            resource: T::resource_name(),
            clauses: Vec::new(),
            expand: Vec::new(),
            sort: Sort {
                column: "created_at",
                direction: SortDirection::Desc,
            },
            page: 1,
            limit: 20,
            include_deleted: false,
        }
    }

    pub fn with_clause(mut self, clause: FilterClause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Rows skipped before the current page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Resolve relation names against the record's allow-list.
///
/// Used both for List/Show expansion and anywhere else a caller-supplied
/// relation name enters the engine. Unknown names fail the request.
pub fn resolve_relations<T: Record>(names: &[&str]) -> Result<Vec<&'static Relation>, ApiError> {
    names
        .iter()
        .map(|name| {
            T::relation(name)
                .ok_or_else(|| ApiError::Validation(format!("unknown relation '{}'", name)))
        })
        .collect()
}

/// Compose parsed clauses and list options into a [`SelectQuery`] for `T`.
pub fn compose<T: Record>(
    clauses: Vec<FilterClause>,
    options: &ListOptions,
    config: &QueryConfig,
) -> Result<SelectQuery, ApiError> {
    let expand = resolve_relations::<T>(&options.relation_names())?;

    let column = T::column(options.sort_column()).ok_or_else(|| {
        ApiError::Validation(format!("invalid sort column '{}'", options.sort_column()))
    })?;
    let direction = match options.order.as_deref() {
        Some(order) => SortDirection::parse(order)?,
        None => SortDirection::Desc,
    };

    Ok(SelectQuery {
        resource: T::resource_name(),
        clauses,
        expand,
        sort: Sort { column, direction },
        page: options.page(),
        limit: options.limit(config.max_limit),
        include_deleted: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterMode;
    use crate::core::record::RelationKind;
    use crate::query::filter::{self, Operator};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use uuid::Uuid;

    #[derive(Clone, Serialize, Deserialize)]
    struct Item {
        id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
        name: String,
        price: f64,
    }

    impl Record for Item {
        fn resource_name() -> &'static str {
            "items"
        }
        fn resource_name_singular() -> &'static str {
            "item"
        }

        const COLUMNS: &'static [&'static str] = &["id", "name", "price", "created_at"];
        const RELATIONS: &'static [Relation] = &[Relation {
            name: "category",
            target: "categories",
            kind: RelationKind::BelongsTo {
                local_key: "category_id",
            },
            columns: &["id", "name"],
        }];

        fn id(&self) -> Uuid {
            self.id
        }
        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }
        fn updated_at(&self) -> DateTime<Utc> {
            self.updated_at
        }
        fn deleted_at(&self) -> Option<DateTime<Utc>> {
            self.deleted_at
        }
        fn set_id(&mut self, id: Uuid) {
            self.id = id;
        }
        fn set_created_at(&mut self, at: DateTime<Utc>) {
            self.created_at = at;
        }
        fn set_updated_at(&mut self, at: DateTime<Utc>) {
            self.updated_at = at;
        }
        fn set_deleted_at(&mut self, at: Option<DateTime<Utc>>) {
            self.deleted_at = at;
        }
    }

    fn options(qs_sort: Option<&str>, qs_order: Option<&str>) -> ListOptions {
        ListOptions {
            sort: qs_sort.map(String::from),
            order: qs_order.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_compose_defaults() {
        let query =
            compose::<Item>(Vec::new(), &ListOptions::default(), &QueryConfig::default()).unwrap();
        assert_eq!(query.resource, "items");
        assert_eq!(query.sort.column, "created_at");
        assert_eq!(query.sort.direction, SortDirection::Desc);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset(), 0);
        assert!(!query.include_deleted);
    }

    #[test]
    fn test_compose_is_pure() {
        let clauses = filter::parse::<Item>(
            Some(r#"{"price":{"operator":">","value":10},"name":"hub"}"#),
            Some("usb"),
            FilterMode::Lenient,
        )
        .unwrap();
        let opts = options(Some("price"), Some("asc"));
        let config = QueryConfig::default();

        let first = compose::<Item>(clauses.clone(), &opts, &config).unwrap();
        let second = compose::<Item>(clauses, &opts, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_clause_order_is_preserved() {
        let clauses = vec![
            FilterClause::Compare {
                field: "name",
                op: Operator::Eq,
                value: json!("a"),
            },
            FilterClause::Compare {
                field: "price",
                op: Operator::Gt,
                value: json!(1),
            },
        ];
        let query = compose::<Item>(
            clauses.clone(),
            &ListOptions::default(),
            &QueryConfig::default(),
        )
        .unwrap();
        assert_eq!(query.clauses, clauses);
    }

    #[test]
    fn test_unknown_sort_column_is_rejected() {
        let result = compose::<Item>(
            Vec::new(),
            &options(Some("password_hash"), None),
            &QueryConfig::default(),
        );
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_invalid_sort_direction_is_rejected() {
        let result = compose::<Item>(
            Vec::new(),
            &options(Some("price"), Some("sideways")),
            &QueryConfig::default(),
        );
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_unknown_relation_expansion_is_rejected() {
        let opts = ListOptions {
            relations: Some("category,supplier".to_string()),
            ..Default::default()
        };
        let result = compose::<Item>(Vec::new(), &opts, &QueryConfig::default());
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_relation_expansion_preserves_order() {
        let opts = ListOptions {
            relations: Some("category".to_string()),
            ..Default::default()
        };
        let query = compose::<Item>(Vec::new(), &opts, &QueryConfig::default()).unwrap();
        assert_eq!(query.expand.len(), 1);
        assert_eq!(query.expand[0].name, "category");
    }

    #[test]
    fn test_offset_math() {
        let opts = ListOptions {
            page: 3,
            limit: 25,
            ..Default::default()
        };
        let query = compose::<Item>(Vec::new(), &opts, &QueryConfig::default()).unwrap();
        assert_eq!(query.offset(), 50);
        assert_eq!(query.limit, 25);
    }

    #[test]
    fn test_limit_clamped_to_config_max() {
        let opts = ListOptions {
            limit: 10_000,
            ..Default::default()
        };
        let query = compose::<Item>(Vec::new(), &opts, &QueryConfig::default()).unwrap();
        assert_eq!(query.limit, 100);
    }

    #[test]
    fn test_builder_for_internal_lookups() {
        let query = SelectQuery::for_record::<Item>()
            .with_clause(FilterClause::Compare {
                field: "name",
                op: Operator::Eq,
                value: json!("hub"),
            })
            .with_limit(1);
        assert_eq!(query.resource, "items");
        assert_eq!(query.limit, 1);
        assert_eq!(query.clauses.len(), 1);
    }
}
