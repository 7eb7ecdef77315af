//! Product categories

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::record::{Record, Relation, RelationKind, defaults};
use crate::models::product::Product;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(default = "defaults::id")]
    pub id: Uuid,
    #[serde(default = "defaults::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "defaults::timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,

    pub name: String,
    #[serde(default)]
    pub status: String,
}

impl Category {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: defaults::id(),
            created_at: defaults::timestamp(),
            updated_at: defaults::timestamp(),
            deleted_at: None,
            name: name.into(),
            status: status.into(),
        }
    }
}

impl Record for Category {
    fn resource_name() -> &'static str {
        "categories"
    }

    fn resource_name_singular() -> &'static str {
        "category"
    }

    const COLUMNS: &'static [&'static str] =
        &["id", "name", "status", "created_at", "updated_at"];

    const SEARCHABLE: &'static [&'static str] = &["name"];

    const RELATIONS: &'static [Relation] = &[Relation {
        name: "products",
        target: "products",
        kind: RelationKind::HasMany {
            foreign_key: "category_id",
        },
        columns: Product::COLUMNS,
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
