//! Authentication endpoints: register, login, me
//!
//! Registration hashes the password explicitly before handing the user to
//! the storage handle, and looks up duplicate emails through the same
//! query engine the resource controller uses.

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use validator::Validate;

use crate::auth::jwt::JwtAuth;
use crate::auth::password;
use crate::auth::policy::AuthPolicy;
use crate::error::ApiError;
use crate::models::User;
use crate::query::filter::{FilterClause, Operator};
use crate::query::SelectQuery;
use crate::store::RecordStore;

/// State shared by the auth endpoints
#[derive(Clone)]
pub struct AuthState {
    pub store: Arc<dyn RecordStore<User>>,
    pub jwt: Arc<JwtAuth>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Build the auth routes
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .with_state(state)
}

async fn register(
    State(state): State<AuthState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let input: RegisterRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::Validation(format!("invalid request body: {}", e)))?;
    input
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    if find_by_email(state.store.as_ref(), &input.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("email already registered".to_string()));
    }

    let role = input
        .role
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "user".to_string());
    let password_hash = password::hash(&input.password)?;

    let user = state
        .store
        .insert(User::new(input.name, input.email, password_hash, role))
        .await?;
    let token = state.jwt.issue(user.id, &user.email, &user.role)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "user registered successfully",
            "user": public_user(&user),
            "token": token,
        })),
    ))
}

async fn login(
    State(state): State<AuthState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let input: LoginRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::Validation(format!("invalid request body: {}", e)))?;

    // Same error for unknown email and wrong password.
    let user = find_by_email(state.store.as_ref(), &input.email)
        .await?
        .ok_or_else(|| ApiError::Auth("invalid credentials".to_string()))?;
    if !password::verify(&input.password, &user.password_hash) {
        return Err(ApiError::Auth("invalid credentials".to_string()));
    }

    let token = state.jwt.issue(user.id, &user.email, &user.role)?;
    Ok(Json(json!({
        "message": "login successful",
        "user": public_user(&user),
        "token": token,
    })))
}

async fn me(State(state): State<AuthState>, headers: HeaderMap) -> Result<Json<Value>, ApiError> {
    let ctx = state.jwt.context(&headers)?;
    AuthPolicy::Authenticated.authorize(&ctx, None)?;

    let user_id = ctx
        .user_id()
        .ok_or_else(|| ApiError::Auth("authentication required".to_string()))?;
    let user = state
        .store
        .get(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user", user_id))?;
    Ok(Json(json!({ "user": public_user(&user) })))
}

async fn find_by_email(
    store: &dyn RecordStore<User>,
    email: &str,
) -> Result<Option<User>, ApiError> {
    let query = SelectQuery::for_record::<User>()
        .with_clause(FilterClause::Compare {
            field: "email",
            op: Operator::Eq,
            value: Value::String(email.to_string()),
        })
        .with_limit(1);
    let result = store.select(&query).await?;
    result
        .records
        .into_iter()
        .next()
        .map(|doc| {
            serde_json::from_value(doc)
                .map_err(|e| ApiError::Internal(format!("failed to decode user: {}", e)))
        })
        .transpose()
}

fn public_user(user: &User) -> Value {
    json!({
        "id": user.id,
        "name": user.name,
        "email": user.email,
        "role": user.role,
    })
}
