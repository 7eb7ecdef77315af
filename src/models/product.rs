//! Products held in the warehouse

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::record::{Record, Relation, RelationKind, defaults};
use crate::models::category::Category;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
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
    pub price: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        price: f64,
        status: impl Into<String>,
        category_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: defaults::id(),
            created_at: defaults::timestamp(),
            updated_at: defaults::timestamp(),
            deleted_at: None,
            name: name.into(),
            price,
            status: status.into(),
            category_id,
        }
    }
}

impl Record for Product {
    fn resource_name() -> &'static str {
        "products"
    }

    fn resource_name_singular() -> &'static str {
        "product"
    }

    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "price",
        "status",
        "category_id",
        "created_at",
        "updated_at",
    ];

    const SEARCHABLE: &'static [&'static str] = &["name", "status"];

    const RELATIONS: &'static [Relation] = &[Relation {
        name: "category",
        target: "categories",
        kind: RelationKind::BelongsTo {
            local_key: "category_id",
        },
        columns: Category::COLUMNS,
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
