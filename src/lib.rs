//! # Depot
//!
//! A warehouse inventory REST API built around a generic CRUD core: one
//! parameterized controller serves any record type with dynamic filtering,
//! sorting, pagination, relation expansion, and role-gated JWT auth.
//!
//! ## Features
//!
//! - **Generic Resource Controller**: five CRUD endpoints per record type,
//!   bound at compile time through the [`core::Record`] capability trait
//! - **Dynamic filters**: JSON filter payloads with operators, `date`/`in`/
//!   `between`/`like` functions, and one-level relation filters — every
//!   identifier validated against per-type allow-lists, values carried as
//!   data, never spliced into query text
//! - **Free-text search**: `?q=` OR-combined across declared searchable fields
//! - **Relation expansion**: `?relations=` eager-loads related records
//! - **Soft delete**: deleted records never surface without an explicit flag
//! - **Role-gated auth**: JWT bearer tokens checked against per-operation
//!   policies (admin-only user management, self-or-admin updates)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use depot::config::AppConfig;
//! use depot::models::seed;
//! use depot::server::build_router;
//! use depot::store::MemoryStore;
//!
//! let config = AppConfig::default();
//! let store = MemoryStore::new();
//! seed::seed_demo(&store).await?;
//! let app = build_router(&config, store);
//!
//! // GET /api/products?filter={"price":{"operator":">","value":100}}&sort=price&order=asc
//! // GET /api/products?q=hub&relations=category
//! ```

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod query;
pub mod server;
pub mod store;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::auth::{AuthContext, AuthPolicy, JwtAuth};
    pub use crate::config::{AppConfig, FilterMode, QueryConfig};
    pub use crate::core::{FieldValue, Record, Relation, RelationKind};
    pub use crate::error::ApiError;
    pub use crate::query::{
        FilterClause, ListOptions, Operator, Page, SelectQuery, compose, resolve_relations,
    };
    pub use crate::server::{ResourcePolicies, ResourceState, build_router};
    pub use crate::store::{MemoryStore, QueryResult, RecordStore, StorageError};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
