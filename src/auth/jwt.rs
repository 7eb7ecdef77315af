//! JWT issuance and verification (HS256)
//!
//! Tokens carry the principal's id, email, and role. Verification failures
//! all surface as [`ApiError::Auth`] so the transport returns 401 without
//! leaking which check failed, except expiry which gets its own message.

use axum::http::{HeaderMap, header};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::policy::AuthContext;
use crate::config::AuthConfig;
use crate::error::ApiError;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Token issuer/verifier, built once from config and shared across requests.
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
}

impl JwtAuth {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            expiry: Duration::hours(config.token_expiry_hours),
        }
    }

    /// Sign a token for the given principal.
    pub fn issue(&self, user_id: Uuid, email: &str, role: &str) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("failed to sign token: {}", e)))
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::Auth("token expired".to_string())
                }
                _ => ApiError::Auth("invalid token".to_string()),
            })
    }

    /// Extract the auth context from request headers.
    ///
    /// A missing Authorization header is `Anonymous`; a present but
    /// malformed or unverifiable one is an error.
    pub fn context(&self, headers: &HeaderMap) -> Result<AuthContext, ApiError> {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Ok(AuthContext::Anonymous);
        };
        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Auth("invalid authorization header".to_string()))?;
        let claims = self.verify(token)?;
        Ok(AuthContext::User {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> JwtAuth {
        JwtAuth::new(&AuthConfig {
            secret: "test-secret".to_string(),
            token_expiry_hours: 1,
        })
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let auth = jwt();
        let user_id = Uuid::new_v4();
        let token = auth.issue(user_id, "a@b.com", "admin").unwrap();
        let claims = auth.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = jwt().issue(Uuid::new_v4(), "a@b.com", "user").unwrap();
        let other = JwtAuth::new(&AuthConfig {
            secret: "different-secret".to_string(),
            token_expiry_hours: 1,
        });
        assert!(matches!(other.verify(&token), Err(ApiError::Auth(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = JwtAuth::new(&AuthConfig {
            secret: "test-secret".to_string(),
            token_expiry_hours: -2,
        });
        let token = auth.issue(Uuid::new_v4(), "a@b.com", "user").unwrap();
        let err = jwt().verify(&token).unwrap_err();
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(matches!(
            jwt().verify("not.a.token"),
            Err(ApiError::Auth(_))
        ));
    }

    #[test]
    fn test_context_without_header_is_anonymous() {
        let headers = HeaderMap::new();
        let ctx = jwt().context(&headers).unwrap();
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_context_with_valid_bearer() {
        let auth = jwt();
        let user_id = Uuid::new_v4();
        let token = auth.issue(user_id, "a@b.com", "user").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );
        let ctx = auth.context(&headers).unwrap();
        assert_eq!(ctx.user_id(), Some(user_id));
    }

    #[test]
    fn test_context_with_malformed_header_is_auth_error() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Token abc".parse().unwrap());
        assert!(matches!(
            jwt().context(&headers),
            Err(ApiError::Auth(_))
        ));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer garbage".parse().unwrap());
        assert!(matches!(
            jwt().context(&headers),
            Err(ApiError::Auth(_))
        ));
    }
}
