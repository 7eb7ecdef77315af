//! Generic CRUD resource controller
//!
//! One handler set serves every record type: bind the type parameter,
//! supply a storage handle and per-operation policies, and
//! [`routes`] produces the five REST endpoints. The controller holds no
//! cross-request state; each request runs parse → compose → execute to
//! completion.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::MethodRouter,
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::jwt::JwtAuth;
use crate::auth::policy::{AuthContext, AuthPolicy};
use crate::config::QueryConfig;
use crate::core::record::Record;
use crate::error::ApiError;
use crate::query::compose::{compose, resolve_relations};
use crate::query::filter;
use crate::query::options::{ListOptions, Page};
use crate::store::RecordStore;

/// Which operations a resource exposes, and the policy gating each.
/// `None` leaves the route unmounted.
#[derive(Clone, Copy)]
pub struct ResourcePolicies {
    pub list: Option<AuthPolicy>,
    pub show: Option<AuthPolicy>,
    pub create: Option<AuthPolicy>,
    pub update: Option<AuthPolicy>,
    pub destroy: Option<AuthPolicy>,
}

impl ResourcePolicies {
    /// The same policy on all five operations.
    pub fn all(policy: AuthPolicy) -> Self {
        Self {
            list: Some(policy),
            show: Some(policy),
            create: Some(policy),
            update: Some(policy),
            destroy: Some(policy),
        }
    }
}

/// Per-resource state shared across the controller's handlers
pub struct ResourceState<T: Record> {
    pub store: Arc<dyn RecordStore<T>>,
    pub jwt: Arc<JwtAuth>,
    pub query: QueryConfig,
    pub policies: ResourcePolicies,
}

impl<T: Record> Clone for ResourceState<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            jwt: self.jwt.clone(),
            query: self.query.clone(),
            policies: self.policies,
        }
    }
}

/// Build the CRUD routes for a record type:
///
/// - `GET    /{plural}` — list
/// - `POST   /{plural}` — create
/// - `GET    /{plural}/{id}` — show
/// - `PUT    /{plural}/{id}` — update
/// - `DELETE /{plural}/{id}` — destroy
pub fn routes<T: Record>(state: ResourceState<T>) -> Router {
    let collection_path = format!("/{}", T::resource_name());
    let member_path = format!("/{}/{{id}}", T::resource_name());

    let mut collection: MethodRouter<ResourceState<T>> = MethodRouter::new();
    if state.policies.list.is_some() {
        collection = collection.get(list::<T>);
    }
    if state.policies.create.is_some() {
        collection = collection.post(create::<T>);
    }

    let mut member: MethodRouter<ResourceState<T>> = MethodRouter::new();
    if state.policies.show.is_some() {
        member = member.get(show::<T>);
    }
    if state.policies.update.is_some() {
        member = member.put(update::<T>);
    }
    if state.policies.destroy.is_some() {
        member = member.delete(destroy::<T>);
    }

    Router::new()
        .route(&collection_path, collection)
        .route(&member_path, member)
        .with_state(state)
}

/// List — GET /{plural}
///
/// Never errors on an empty result: returns `{data: [], total: 0}`.
pub async fn list<T: Record>(
    State(state): State<ResourceState<T>>,
    headers: HeaderMap,
    Query(options): Query<ListOptions>,
) -> Result<Json<Page>, ApiError> {
    let ctx = state.jwt.context(&headers)?;
    gate(state.policies.list, &ctx, None)?;

    let clauses = filter::parse::<T>(
        options.filter.as_deref(),
        options.q.as_deref(),
        state.query.filter_mode,
    )?;
    let query = compose::<T>(clauses, &options, &state.query)?;
    let mut result = state.store.select(&query).await?;
    for doc in &mut result.records {
        T::redact_document(doc);
    }

    Ok(Json(Page {
        data: result.records,
        total: result.total,
        page: query.page,
        limit: query.limit,
    }))
}

/// Show — GET /{plural}/{id}
pub async fn show<T: Record>(
    State(state): State<ResourceState<T>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(options): Query<ListOptions>,
) -> Result<Json<Value>, ApiError> {
    let ctx = state.jwt.context(&headers)?;
    gate(state.policies.show, &ctx, Some(id))?;

    let expand = resolve_relations::<T>(&options.relation_names())?;
    let mut doc = state
        .store
        .find(id, &expand)
        .await?
        .ok_or_else(|| ApiError::not_found(T::resource_name_singular(), id))?;
    T::redact_document(&mut doc);
    Ok(Json(doc))
}

/// Create — POST /{plural}
pub async fn create<T: Record>(
    State(state): State<ResourceState<T>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let ctx = state.jwt.context(&headers)?;
    gate(state.policies.create, &ctx, None)?;

    let record: T = serde_json::from_value(body).map_err(|e| {
        ApiError::Validation(format!(
            "invalid {} payload: {}",
            T::resource_name_singular(),
            e
        ))
    })?;
    let created = state.store.insert(record).await?;
    Ok((StatusCode::CREATED, Json(to_document(&created)?)))
}

/// Update — PUT /{plural}/{id}
///
/// Full-replace semantics: omitted fields revert to their
/// deserialization defaults. Identity, timestamps, and any fields the
/// record protects always come from the stored version.
pub async fn update<T: Record>(
    State(state): State<ResourceState<T>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let ctx = state.jwt.context(&headers)?;
    gate(state.policies.update, &ctx, Some(id))?;

    let existing = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(T::resource_name_singular(), id))?;

    let mut record: T = serde_json::from_value(body).map_err(|e| {
        ApiError::Validation(format!(
            "invalid {} payload: {}",
            T::resource_name_singular(),
            e
        ))
    })?;
    record.set_id(existing.id());
    record.set_created_at(existing.created_at());
    record.set_deleted_at(existing.deleted_at());
    record.preserve_on_update(&existing);

    let updated = state.store.save(record).await?;
    Ok(Json(to_document(&updated)?))
}

/// Destroy — DELETE /{plural}/{id}
///
/// Soft-deletes; succeeds whether or not the id existed.
pub async fn destroy<T: Record>(
    State(state): State<ResourceState<T>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let ctx = state.jwt.context(&headers)?;
    gate(state.policies.destroy, &ctx, Some(id))?;

    state.store.soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn gate(
    policy: Option<AuthPolicy>,
    ctx: &AuthContext,
    resource_id: Option<Uuid>,
) -> Result<(), ApiError> {
    match policy {
        Some(policy) => policy.authorize(ctx, resource_id),
        // Unreachable through the router: the route is not mounted.
        None => Err(ApiError::Forbidden("operation not available".to_string())),
    }
}

fn to_document<T: Record>(record: &T) -> Result<Value, ApiError> {
    let mut doc = serde_json::to_value(record)
        .map_err(|e| ApiError::Internal(format!("failed to encode record: {}", e)))?;
    T::redact_document(&mut doc);
    Ok(doc)
}
