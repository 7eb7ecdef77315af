//! User accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::record::{Record, defaults};

/// A user account. The password hash is stored but stripped from every
/// outgoing document, and updates through the generic controller can
/// never change it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default = "defaults::id")]
    pub id: Uuid,
    #[serde(default = "defaults::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "defaults::timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,

    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password_hash: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "user".to_string()
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id: defaults::id(),
            created_at: defaults::timestamp(),
            updated_at: defaults::timestamp(),
            deleted_at: None,
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role: role.into(),
        }
    }
}

impl Record for User {
    fn resource_name() -> &'static str {
        "users"
    }

    fn resource_name_singular() -> &'static str {
        "user"
    }

    const COLUMNS: &'static [&'static str] =
        &["id", "name", "email", "role", "created_at", "updated_at"];

    const SEARCHABLE: &'static [&'static str] = &["name", "email", "role"];

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

    fn preserve_on_update(&mut self, existing: &Self) {
        // Password changes do not go through the generic controller.
        self.password_hash = existing.password_hash.clone();
    }

    fn redact_document(doc: &mut serde_json::Value) {
        if let Some(obj) = doc.as_object_mut() {
            obj.remove("password_hash");
        }
    }
}
