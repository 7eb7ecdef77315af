//! Typed error handling for the depot API
//!
//! Every failure that can cross the HTTP boundary is an [`ApiError`].
//! The mapping to status codes is fixed:
//!
//! - [`ApiError::Validation`] → 400
//! - [`ApiError::Auth`] → 401
//! - [`ApiError::Forbidden`] → 403
//! - [`ApiError::NotFound`] → 404
//! - [`ApiError::Conflict`] → 409
//! - [`ApiError::Storage`] / [`ApiError::Internal`] → 500
//!
//! Response bodies are `{"error": message}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;
use uuid::Uuid;

use crate::store::StorageError;

/// The error type returned by handlers and the query engine.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed body, disallowed field/sort identifier, malformed range
    Validation(String),

    /// Missing, invalid, or expired credentials
    Auth(String),

    /// Authenticated but insufficient role
    Forbidden(String),

    /// No live record matches the id
    NotFound { resource: &'static str, id: Uuid },

    /// Resource state conflict (e.g. duplicate email at registration)
    Conflict(String),

    /// Data-store failure
    Storage(StorageError),

    /// Unexpected internal failure
    Internal(String),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Shorthand for a 404 on a given resource.
    pub fn not_found(resource: &'static str, id: Uuid) -> Self {
        ApiError::NotFound { resource, id }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "{}", msg),
            ApiError::Auth(msg) => write!(f, "{}", msg),
            ApiError::Forbidden(msg) => write!(f, "{}", msg),
            ApiError::NotFound { resource, id } => {
                write!(f, "{} with id '{}' not found", resource, id)
            }
            ApiError::Conflict(msg) => write!(f, "{}", msg),
            ApiError::Storage(e) => write!(f, "storage error: {}", e),
            ApiError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Storage(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Auth("no token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("admin only".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::not_found("product", Uuid::new_v4()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("email taken".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_not_found_message_names_resource_and_id() {
        let id = Uuid::new_v4();
        let err = ApiError::not_found("product", id);
        let msg = err.to_string();
        assert!(msg.contains("product"));
        assert!(msg.contains(&id.to_string()));
    }
}
