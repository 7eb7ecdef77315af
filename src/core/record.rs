//! Record capability trait defining the core abstraction for stored types
//!
//! Every resource exposed by the API implements [`Record`]. The trait
//! carries three kinds of information:
//!
//! - identity and lifecycle: id, timestamps, soft-delete marker;
//! - the query surface: which columns callers may filter and sort on,
//!   which fields free-text search matches, and which named relations
//!   exist — these are the allow-lists the query engine validates every
//!   caller-supplied identifier against;
//! - serde bounds so records can move between HTTP bodies and storage.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// How a relation connects two record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// The target collection holds a foreign key pointing back at this
    /// record (e.g. `products.category_id` for `Category::products`).
    HasMany { foreign_key: &'static str },

    /// This record holds a local key pointing at one target record
    /// (e.g. `Product::category` via `category_id`).
    BelongsTo { local_key: &'static str },
}

/// A named, one-level relation to another record collection.
///
/// Relations drive both eager-load expansion (`?relations=category`) and
/// dotted filter keys (`{"category.name": "electronics"}`). The `columns`
/// list is the target collection's filterable-column allow-list; a dotted
/// filter naming any other column is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub name: &'static str,
    /// Target collection, identified by its plural resource name.
    pub target: &'static str,
    pub kind: RelationKind,
    /// Allow-listed columns of the target collection.
    pub columns: &'static [&'static str],
}

/// Capability trait for any record type served by the generic controller.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The plural resource name used in URLs and as the storage table key
    /// (e.g. "products").
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g. "product"), used in error messages.
    fn resource_name_singular() -> &'static str;

    /// Columns callers may reference in filters and sorts.
    const COLUMNS: &'static [&'static str];

    /// Fields matched by free-text search (`?q=`). Empty disables search.
    const SEARCHABLE: &'static [&'static str] = &[];

    /// Named relations available for expansion and dotted filter keys.
    const RELATIONS: &'static [Relation] = &[];

    // === Identity and lifecycle ===

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn set_id(&mut self, id: Uuid);
    fn set_created_at(&mut self, at: DateTime<Utc>);
    fn set_updated_at(&mut self, at: DateTime<Utc>);
    fn set_deleted_at(&mut self, at: Option<DateTime<Utc>>);

    /// Check if the record has been soft-deleted
    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// Carry fields the API never accepts from a request body over from
    /// the stored record during an update (e.g. a password hash).
    fn preserve_on_update(&mut self, _existing: &Self) {}

    /// Strip fields that must never leave the API from an outgoing
    /// document (e.g. a password hash).
    fn redact_document(_doc: &mut serde_json::Value) {}

    /// Look up a relation by name against the allow-list.
    fn relation(name: &str) -> Option<&'static Relation> {
        Self::RELATIONS.iter().find(|r| r.name == name)
    }

    /// Check a column name against the allow-list.
    fn has_column(column: &str) -> bool {
        Self::COLUMNS.contains(&column)
    }

    /// Resolve a column name to its allow-listed `'static` form.
    fn column(column: &str) -> Option<&'static str> {
        Self::COLUMNS.iter().find(|c| **c == column).copied()
    }
}

/// Serde defaults for fields the server assigns at persist time.
///
/// Request bodies omit id and timestamps; deserialization fills these
/// placeholders and the storage layer stamps real values.
pub mod defaults {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    pub fn id() -> Uuid {
        Uuid::nil()
    }

    pub fn timestamp() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }
}
