//! In-memory storage backend
//!
//! The reference implementation of [`RecordStore`]. All record types share
//! one set of tables keyed by resource name, each table an insertion-ordered
//! map from id to the serialized document. Insertion order plus a stable
//! sort gives deterministic pagination, and storing documents (rather than
//! typed records) lets relation eager-loads embed related documents without
//! widening the record type.
//!
//! Uses `RwLock` for thread-safe access; the lock is never held across an
//! await point.

use indexmap::IndexMap;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::field::{FieldValue, parse_date};
use crate::core::record::{Record, Relation, RelationKind};
use crate::query::compose::{SelectQuery, Sort, SortDirection};
use crate::query::filter::{FilterClause, Operator, scalar_to_string};
use crate::store::{QueryResult, RecordStore, StorageError};

type Table = IndexMap<Uuid, Value>;
type Tables = HashMap<&'static str, Table>;

/// Shared in-memory store for every record type in the application.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<T: Record> RecordStore<T> for MemoryStore {
    async fn select(&self, query: &SelectQuery) -> Result<QueryResult, StorageError> {
        let tables = self.tables.read().map_err(|_| StorageError::LockPoisoned)?;
        let Some(table) = tables.get(query.resource) else {
            return Ok(QueryResult {
                records: Vec::new(),
                total: 0,
            });
        };

        let mut matched: Vec<&Value> = table
            .values()
            .filter(|doc| query.include_deleted || !doc_deleted(doc))
            .filter(|doc| {
                query
                    .clauses
                    .iter()
                    .all(|clause| clause_matches(clause, doc, &tables))
            })
            .collect();

        sort_documents(&mut matched, &query.sort);

        let total = matched.len() as u64;
        let records = matched
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .map(|doc| expand_document(doc, &query.expand, &tables))
            .collect();

        Ok(QueryResult { records, total })
    }

    async fn find(
        &self,
        id: Uuid,
        expand: &[&'static Relation],
    ) -> Result<Option<Value>, StorageError> {
        let tables = self.tables.read().map_err(|_| StorageError::LockPoisoned)?;
        let doc = tables
            .get(T::resource_name())
            .and_then(|table| table.get(&id))
            .filter(|doc| !doc_deleted(doc));
        Ok(doc.map(|doc| expand_document(doc, expand, &tables)))
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>, StorageError> {
        let tables = self.tables.read().map_err(|_| StorageError::LockPoisoned)?;
        tables
            .get(T::resource_name())
            .and_then(|table| table.get(&id))
            .filter(|doc| !doc_deleted(doc))
            .map(|doc| decode::<T>(doc))
            .transpose()
    }

    async fn insert(&self, mut record: T) -> Result<T, StorageError> {
        let now = Utc::now();
        record.set_id(Uuid::new_v4());
        record.set_created_at(now);
        record.set_updated_at(now);
        record.set_deleted_at(None);

        let doc = encode(&record)?;
        let mut tables = self.tables.write().map_err(|_| StorageError::LockPoisoned)?;
        tables
            .entry(T::resource_name())
            .or_default()
            .insert(record.id(), doc);
        Ok(record)
    }

    async fn save(&self, mut record: T) -> Result<T, StorageError> {
        record.set_updated_at(Utc::now());

        let doc = encode(&record)?;
        let mut tables = self.tables.write().map_err(|_| StorageError::LockPoisoned)?;
        // IndexMap keeps the original position on key overwrite, so
        // updates do not reshuffle insertion order.
        tables
            .entry(T::resource_name())
            .or_default()
            .insert(record.id(), doc);
        Ok(record)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), StorageError> {
        let mut tables = self.tables.write().map_err(|_| StorageError::LockPoisoned)?;
        if let Some(doc) = tables
            .get_mut(T::resource_name())
            .and_then(|table| table.get_mut(&id))
            && let Some(obj) = doc.as_object_mut()
        {
            // First deletion wins; repeating the call leaves the original
            // deletion timestamp in place.
            if obj.get("deleted_at").is_none_or(Value::is_null) {
                obj.insert("deleted_at".to_string(), serde_json::json!(Utc::now()));
            }
        }
        Ok(())
    }
}

fn encode<T: Record>(record: &T) -> Result<Value, StorageError> {
    serde_json::to_value(record).map_err(|e| StorageError::Encode(e.to_string()))
}

fn decode<T: Record>(doc: &Value) -> Result<T, StorageError> {
    serde_json::from_value(doc.clone()).map_err(|e| StorageError::Decode(e.to_string()))
}

fn doc_deleted(doc: &Value) -> bool {
    doc.get("deleted_at").is_some_and(|v| !v.is_null())
}

fn field_value(doc: &Value, field: &str) -> FieldValue {
    FieldValue::from_json(doc.get(field).unwrap_or(&Value::Null))
}

/// Evaluate one clause against a document. Join clauses consult the
/// relation's target table.
fn clause_matches(clause: &FilterClause, doc: &Value, tables: &Tables) -> bool {
    match clause {
        FilterClause::Compare { field, op, value } => {
            compare_matches(&field_value(doc, field), *op, value)
        }

        FilterClause::Date { field, op, value } => {
            let (Some(have), Some(want)) = (field_value(doc, field).date_part(), parse_date(value))
            else {
                return false;
            };
            // LIKE makes no sense on calendar dates; treat it as equality.
            let op = if *op == Operator::Like {
                Operator::Eq
            } else {
                *op
            };
            ordering_matches(op, have.cmp(&want))
        }

        FilterClause::In { field, values } => {
            let have = field_value(doc, field);
            values.iter().any(|v| have.equals(&FieldValue::from_text(v)))
        }

        FilterClause::Between { field, low, high } => {
            let have = field_value(doc, field);
            let low = FieldValue::from_text(low);
            let high = FieldValue::from_text(high);
            matches!(
                have.compare(&low),
                Some(Ordering::Greater | Ordering::Equal)
            ) && matches!(have.compare(&high), Some(Ordering::Less | Ordering::Equal))
        }

        FilterClause::Like { field, needle } => {
            field_value(doc, field).like(&format!("%{}%", needle))
        }

        FilterClause::Join {
            relation,
            column,
            value,
        } => {
            let want = FieldValue::from_json(value);
            related_documents(doc, relation, tables)
                .iter()
                .any(|related| field_value(related, column).equals(&want))
        }

        FilterClause::Search { fields, needle } => {
            let pattern = format!("%{}%", needle);
            fields
                .iter()
                .any(|field| field_value(doc, field).like(&pattern))
        }
    }
}

fn compare_matches(have: &FieldValue, op: Operator, value: &Value) -> bool {
    if op == Operator::Like {
        return have.like(&scalar_to_string(value));
    }
    let want = FieldValue::from_json(value);
    match op {
        Operator::Eq => have.equals(&want),
        // SQL semantics: NULL never satisfies <>
        Operator::Ne => !have.is_null() && !want.is_null() && !have.equals(&want),
        _ => match have.compare(&want) {
            Some(ordering) => ordering_matches(op, ordering),
            None => false,
        },
    }
}

fn ordering_matches(op: Operator, ordering: Ordering) -> bool {
    match op {
        Operator::Eq => ordering == Ordering::Equal,
        Operator::Ne => ordering != Ordering::Equal,
        Operator::Gt => ordering == Ordering::Greater,
        Operator::Ge => ordering != Ordering::Less,
        Operator::Lt => ordering == Ordering::Less,
        Operator::Le => ordering != Ordering::Greater,
        Operator::Like => ordering == Ordering::Equal,
    }
}

/// Live documents related to `doc` through `relation`.
fn related_documents<'a>(doc: &Value, relation: &Relation, tables: &'a Tables) -> Vec<&'a Value> {
    let Some(target) = tables.get(relation.target) else {
        return Vec::new();
    };
    match relation.kind {
        RelationKind::HasMany { foreign_key } => {
            let id = field_value(doc, "id");
            target
                .values()
                .filter(|d| !doc_deleted(d))
                .filter(|d| field_value(d, foreign_key).equals(&id))
                .collect()
        }
        RelationKind::BelongsTo { local_key } => {
            let key = field_value(doc, local_key);
            if key.is_null() {
                return Vec::new();
            }
            target
                .values()
                .filter(|d| !doc_deleted(d))
                .filter(|d| field_value(d, "id").equals(&key))
                .collect()
        }
    }
}

/// Clone a document and embed its eager-loaded relations: an array for
/// has-many, a single document (or null) for belongs-to.
fn expand_document(doc: &Value, expand: &[&'static Relation], tables: &Tables) -> Value {
    let mut out = doc.clone();
    if expand.is_empty() {
        return out;
    }
    if let Some(obj) = out.as_object_mut() {
        for relation in expand {
            let related: Vec<Value> = related_documents(doc, relation, tables)
                .into_iter()
                .cloned()
                .collect();
            let value = match relation.kind {
                RelationKind::HasMany { .. } => Value::Array(related),
                RelationKind::BelongsTo { .. } => {
                    related.into_iter().next().unwrap_or(Value::Null)
                }
            };
            obj.insert(relation.name.to_string(), value);
        }
    }
    out
}

/// Stable sort: ties keep insertion order, so pagination slices stay
/// disjoint and contiguous across requests.
fn sort_documents(docs: &mut [&Value], sort: &Sort) {
    docs.sort_by(|a, b| {
        let ordering = field_value(a, sort.column)
            .compare(&field_value(b, sort.column))
            .unwrap_or(Ordering::Equal);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FilterMode, QueryConfig};
    use crate::query::filter::parse;
    use crate::query::options::ListOptions;
    use crate::query::compose::compose;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Product {
        #[serde(default)]
        id: Uuid,
        #[serde(default = "epoch")]
        created_at: DateTime<Utc>,
        #[serde(default = "epoch")]
        updated_at: DateTime<Utc>,
        #[serde(default)]
        deleted_at: Option<DateTime<Utc>>,
        name: String,
        price: f64,
        status: String,
        #[serde(default)]
        category_id: Option<Uuid>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Category {
        #[serde(default)]
        id: Uuid,
        #[serde(default = "epoch")]
        created_at: DateTime<Utc>,
        #[serde(default = "epoch")]
        updated_at: DateTime<Utc>,
        #[serde(default)]
        deleted_at: Option<DateTime<Utc>>,
        name: String,
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    macro_rules! impl_test_record {
        ($type:ident, $plural:expr, $singular:expr, $columns:expr, $searchable:expr, $relations:expr) => {
            impl Record for $type {
                fn resource_name() -> &'static str {
                    $plural
                }
                fn resource_name_singular() -> &'static str {
                    $singular
                }

                const COLUMNS: &'static [&'static str] = $columns;
                const SEARCHABLE: &'static [&'static str] = $searchable;
                const RELATIONS: &'static [Relation] = $relations;

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
        };
    }

    impl_test_record!(
        Product,
        "products",
        "product",
        &["id", "name", "price", "status", "category_id", "created_at"],
        &["name", "status"],
        &[Relation {
            name: "category",
            target: "categories",
            kind: RelationKind::BelongsTo {
                local_key: "category_id",
            },
            columns: &["id", "name"],
        }]
    );

    impl_test_record!(
        Category,
        "categories",
        "category",
        &["id", "name", "created_at"],
        &["name"],
        &[Relation {
            name: "products",
            target: "products",
            kind: RelationKind::HasMany {
                foreign_key: "category_id",
            },
            columns: &["id", "name", "price", "status"],
        }]
    );

    fn product(name: &str, price: f64, status: &str) -> Product {
        Product {
            id: Uuid::nil(),
            created_at: epoch(),
            updated_at: epoch(),
            deleted_at: None,
            name: name.to_string(),
            price,
            status: status.to_string(),
            category_id: None,
        }
    }

    async fn seeded() -> (MemoryStore, Product, Product) {
        let store = MemoryStore::new();
        let laptop = store
            .insert(product("Laptop Pro", 1500.0, "active"))
            .await
            .unwrap();
        let hub = store
            .insert(product("USB-C Hub", 45.0, "inactive"))
            .await
            .unwrap();
        (store, laptop, hub)
    }

    fn list_query<T: Record>(filter: &str) -> SelectQuery {
        let clauses = parse::<T>(Some(filter), None, FilterMode::Lenient).unwrap();
        compose::<T>(clauses, &ListOptions::default(), &QueryConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_identity_and_timestamps() {
        let store = MemoryStore::new();
        let created = store
            .insert(product("Laptop Pro", 1500.0, "active"))
            .await
            .unwrap();
        assert_ne!(created.id, Uuid::nil());
        assert!(created.created_at > epoch());
        assert_eq!(created.created_at, created.updated_at);
        assert!(created.deleted_at.is_none());
    }

    #[tokio::test]
    async fn test_equality_filter() {
        let (store, laptop, _) = seeded().await;
        let result = RecordStore::<Product>::select(&store, &list_query::<Product>(r#"{"status":"active"}"#))
            .await
            .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.records[0]["id"], json!(laptop.id));
    }

    #[tokio::test]
    async fn test_numeric_operator_filter() {
        let (store, laptop, _) = seeded().await;
        let result = RecordStore::<Product>::select(
            &store,
            &list_query::<Product>(r#"{"price":{"operator":">","value":100}}"#),
        )
        .await
        .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.records[0]["name"], json!(laptop.name));
    }

    #[tokio::test]
    async fn test_clauses_combine_with_and() {
        let (store, _, _) = seeded().await;
        let result = RecordStore::<Product>::select(
            &store,
            &list_query::<Product>(r#"{"status":"active","price":{"operator":"<","value":100}}"#),
        )
        .await
        .unwrap();
        assert_eq!(result.total, 0);
        assert!(result.records.is_empty());
    }

    #[tokio::test]
    async fn test_like_operator_and_function() {
        let (store, _, hub) = seeded().await;
        for filter in [
            r#"{"name":{"operator":"LIKE","value":"%hub%"}}"#,
            r#"{"name":{"function":"like","value":"hub"}}"#,
        ] {
            let result =
                RecordStore::<Product>::select(&store, &list_query::<Product>(filter))
                    .await
                    .unwrap();
            assert_eq!(result.total, 1, "filter {filter}");
            assert_eq!(result.records[0]["id"], json!(hub.id));
        }
    }

    #[tokio::test]
    async fn test_in_filter() {
        let (store, _, _) = seeded().await;
        let result = RecordStore::<Product>::select(
            &store,
            &list_query::<Product>(r#"{"status":{"function":"in","value":"active,inactive"}}"#),
        )
        .await
        .unwrap();
        assert_eq!(result.total, 2);
    }

    #[tokio::test]
    async fn test_between_filter() {
        let (store, _, hub) = seeded().await;
        let result = RecordStore::<Product>::select(
            &store,
            &list_query::<Product>(r#"{"price":{"function":"between","value":"10,100"}}"#),
        )
        .await
        .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.records[0]["id"], json!(hub.id));
    }

    #[tokio::test]
    async fn test_malformed_between_equals_unfiltered() {
        let (store, _, _) = seeded().await;
        let filtered = RecordStore::<Product>::select(
            &store,
            &list_query::<Product>(r#"{"price":{"function":"between","value":"10"}}"#),
        )
        .await
        .unwrap();
        let unfiltered =
            RecordStore::<Product>::select(&store, &list_query::<Product>("{}"))
                .await
                .unwrap();
        assert_eq!(filtered.total, unfiltered.total);
    }

    #[tokio::test]
    async fn test_date_function_filter() {
        let (store, _, _) = seeded().await;
        let today = Utc::now().date_naive().to_string();
        let filter = format!(
            r#"{{"created_at":{{"function":"date","value":"{}"}}}}"#,
            today
        );
        let result =
            RecordStore::<Product>::select(&store, &list_query::<Product>(&filter))
                .await
                .unwrap();
        assert_eq!(result.total, 2);
    }

    #[tokio::test]
    async fn test_free_text_search() {
        let (store, _, hub) = seeded().await;
        let clauses = parse::<Product>(None, Some("Hub"), FilterMode::Lenient).unwrap();
        let query =
            compose::<Product>(clauses, &ListOptions::default(), &QueryConfig::default()).unwrap();
        let result = RecordStore::<Product>::select(&store, &query).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.records[0]["id"], json!(hub.id));
    }

    #[tokio::test]
    async fn test_search_matches_any_searchable_field() {
        let (store, laptop, _) = seeded().await;
        // "active" appears in Laptop Pro's status but also as a substring
        // of "inactive".
        let clauses = parse::<Product>(None, Some("active"), FilterMode::Lenient).unwrap();
        let query =
            compose::<Product>(clauses, &ListOptions::default(), &QueryConfig::default()).unwrap();
        let result = RecordStore::<Product>::select(&store, &query).await.unwrap();
        assert_eq!(result.total, 2);

        let clauses = parse::<Product>(None, Some("Laptop"), FilterMode::Lenient).unwrap();
        let query =
            compose::<Product>(clauses, &ListOptions::default(), &QueryConfig::default()).unwrap();
        let result = RecordStore::<Product>::select(&store, &query).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.records[0]["id"], json!(laptop.id));
    }

    #[tokio::test]
    async fn test_sort_and_pagination_are_stable_and_disjoint() {
        let store = MemoryStore::new();
        for (name, price) in [("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0), ("e", 5.0)] {
            store
                .insert(product(name, price, "active"))
                .await
                .unwrap();
        }

        let mut seen = Vec::new();
        for page in 1..=3u64 {
            let options = ListOptions {
                page,
                limit: 2,
                sort: Some("price".to_string()),
                order: Some("asc".to_string()),
                ..Default::default()
            };
            let query =
                compose::<Product>(Vec::new(), &options, &QueryConfig::default()).unwrap();
            let result = RecordStore::<Product>::select(&store, &query).await.unwrap();
            assert_eq!(result.total, 5);
            for doc in &result.records {
                seen.push(doc["name"].as_str().unwrap().to_string());
            }
        }
        assert_eq!(seen, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_total_counts_past_page_boundary() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .insert(product(&format!("p{i}"), i as f64, "active"))
                .await
                .unwrap();
        }
        let options = ListOptions {
            limit: 2,
            ..Default::default()
        };
        let query = compose::<Product>(Vec::new(), &options, &QueryConfig::default()).unwrap();
        let result = RecordStore::<Product>::select(&store, &query).await.unwrap();
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.total, 5);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_record_everywhere() {
        let (store, laptop, _) = seeded().await;
        RecordStore::<Product>::soft_delete(&store, laptop.id)
            .await
            .unwrap();

        let all = RecordStore::<Product>::select(&store, &list_query::<Product>("{}"))
            .await
            .unwrap();
        assert_eq!(all.total, 1);

        let found = RecordStore::<Product>::find(&store, laptop.id, &[])
            .await
            .unwrap();
        assert!(found.is_none());

        let got: Option<Product> = store.get(laptop.id).await.unwrap();
        assert!(got.is_none());

        // Search does not resurrect it either
        let clauses = parse::<Product>(None, Some("Laptop"), FilterMode::Lenient).unwrap();
        let query =
            compose::<Product>(clauses, &ListOptions::default(), &QueryConfig::default()).unwrap();
        let result = RecordStore::<Product>::select(&store, &query).await.unwrap();
        assert_eq!(result.total, 0);
    }

    #[tokio::test]
    async fn test_soft_delete_is_idempotent_and_keeps_first_timestamp() {
        let (store, laptop, _) = seeded().await;
        RecordStore::<Product>::soft_delete(&store, laptop.id)
            .await
            .unwrap();

        let tables = store.tables.read().unwrap();
        let first = tables["products"][&laptop.id]["deleted_at"].clone();
        drop(tables);

        RecordStore::<Product>::soft_delete(&store, laptop.id)
            .await
            .unwrap();
        // Unknown id is also fine
        RecordStore::<Product>::soft_delete(&store, Uuid::new_v4())
            .await
            .unwrap();

        let tables = store.tables.read().unwrap();
        assert_eq!(tables["products"][&laptop.id]["deleted_at"], first);
    }

    #[tokio::test]
    async fn test_save_preserves_insertion_order() {
        let (store, laptop, hub) = seeded().await;
        let mut renamed = laptop.clone();
        renamed.name = "Laptop Pro Max".to_string();
        store.save(renamed).await.unwrap();

        let options = ListOptions {
            sort: Some("created_at".to_string()),
            order: Some("asc".to_string()),
            ..Default::default()
        };
        let query = compose::<Product>(Vec::new(), &options, &QueryConfig::default()).unwrap();
        let result = RecordStore::<Product>::select(&store, &query).await.unwrap();
        // The laptop was inserted first and keeps its slot after the save.
        assert_eq!(result.records[0]["name"], json!("Laptop Pro Max"));
        assert_eq!(result.records[1]["id"], json!(hub.id));
    }

    #[tokio::test]
    async fn test_relation_join_filter_and_expansion() {
        let store = MemoryStore::new();
        let electronics = store
            .insert(Category {
                id: Uuid::nil(),
                created_at: epoch(),
                updated_at: epoch(),
                deleted_at: None,
                name: "electronics".to_string(),
            })
            .await
            .unwrap();

        let mut laptop = product("Laptop Pro", 1500.0, "active");
        laptop.category_id = Some(electronics.id);
        let laptop = store.insert(laptop).await.unwrap();
        store
            .insert(product("USB-C Hub", 45.0, "inactive"))
            .await
            .unwrap();

        // Join filter through belongs-to
        let result = RecordStore::<Product>::select(
            &store,
            &list_query::<Product>(r#"{"category.name":"electronics"}"#),
        )
        .await
        .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.records[0]["id"], json!(laptop.id));

        // Belongs-to expansion embeds one document (or null)
        let options = ListOptions {
            relations: Some("category".to_string()),
            ..Default::default()
        };
        let query = compose::<Product>(Vec::new(), &options, &QueryConfig::default()).unwrap();
        let result = RecordStore::<Product>::select(&store, &query).await.unwrap();
        for doc in &result.records {
            if doc["id"] == json!(laptop.id) {
                assert_eq!(doc["category"]["name"], json!("electronics"));
            } else {
                assert!(doc["category"].is_null());
            }
        }

        // Has-many expansion embeds an array
        let found = RecordStore::<Category>::find(
            &store,
            electronics.id,
            &[Category::relation("products").unwrap()],
        )
        .await
        .unwrap()
        .unwrap();
        let related = found["products"].as_array().unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0]["id"], json!(laptop.id));
    }

    #[tokio::test]
    async fn test_join_ignores_soft_deleted_related_records() {
        let store = MemoryStore::new();
        let cat = store
            .insert(Category {
                id: Uuid::nil(),
                created_at: epoch(),
                updated_at: epoch(),
                deleted_at: None,
                name: "electronics".to_string(),
            })
            .await
            .unwrap();
        let mut laptop = product("Laptop Pro", 1500.0, "active");
        laptop.category_id = Some(cat.id);
        store.insert(laptop).await.unwrap();

        RecordStore::<Category>::soft_delete(&store, cat.id)
            .await
            .unwrap();

        let result = RecordStore::<Product>::select(
            &store,
            &list_query::<Product>(r#"{"category.name":"electronics"}"#),
        )
        .await
        .unwrap();
        assert_eq!(result.total, 0);
    }
}
