//! Application router
//!
//! Wires the auth endpoints and the three resources under `/api`:
//!
//! - `/api/auth/{register,login,me}` — public except `me`
//! - `/api/products`, `/api/categories` — any authenticated user
//! - `/api/users` — list/show/destroy require the `admin` role; update is
//!   allowed for the addressed user or an admin; registration is the only
//!   way to create users, so no POST route is mounted.

use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::handlers::{self, AuthState};
use crate::auth::jwt::JwtAuth;
use crate::auth::policy::AuthPolicy;
use crate::config::AppConfig;
use crate::models::{Category, Product, User};
use crate::server::middleware::action_log;
use crate::server::resource::{self, ResourcePolicies, ResourceState};
use crate::store::MemoryStore;

/// Build the full application router.
pub fn build_router(config: &AppConfig, store: MemoryStore) -> Router {
    let jwt = Arc::new(JwtAuth::new(&config.auth));

    let auth_routes = handlers::routes(AuthState {
        store: Arc::new(store.clone()),
        jwt: jwt.clone(),
    });

    let products = resource::routes::<Product>(ResourceState {
        store: Arc::new(store.clone()),
        jwt: jwt.clone(),
        query: config.query.clone(),
        policies: ResourcePolicies::all(AuthPolicy::Authenticated),
    });

    let categories = resource::routes::<Category>(ResourceState {
        store: Arc::new(store.clone()),
        jwt: jwt.clone(),
        query: config.query.clone(),
        policies: ResourcePolicies::all(AuthPolicy::Authenticated),
    });

    let users = resource::routes::<User>(ResourceState {
        store: Arc::new(store.clone()),
        jwt: jwt.clone(),
        query: config.query.clone(),
        policies: ResourcePolicies {
            list: Some(AuthPolicy::HasRole("admin")),
            show: Some(AuthPolicy::HasRole("admin")),
            create: None,
            update: Some(AuthPolicy::SelfOrRole("admin")),
            destroy: Some(AuthPolicy::HasRole("admin")),
        },
    });

    let api = Router::new()
        .merge(auth_routes)
        .merge(products)
        .merge(categories)
        .merge(users);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(middleware::from_fn(action_log))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "depot"
    }))
}
