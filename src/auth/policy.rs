//! Authorization context and declarative operation policies
//!
//! Every controller operation is gated by an [`AuthPolicy`] checked
//! against the [`AuthContext`] extracted from the request. Failing the
//! gate distinguishes "not authenticated" (401) from "authenticated but
//! not allowed" (403).

use uuid::Uuid;

use crate::error::ApiError;

/// Authorization context extracted from a request
#[derive(Debug, Clone)]
pub enum AuthContext {
    /// Authenticated user
    User {
        user_id: Uuid,
        email: String,
        role: String,
    },

    /// No credentials presented
    Anonymous,
}

impl AuthContext {
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AuthContext::Anonymous)
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            AuthContext::User { user_id, .. } => Some(*user_id),
            AuthContext::Anonymous => None,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        match self {
            AuthContext::User { role: r, .. } => r == role,
            AuthContext::Anonymous => false,
        }
    }
}

/// Authorization policy for an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// No credentials required
    Public,

    /// Any authenticated user
    Authenticated,

    /// User must hold the role
    HasRole(&'static str),

    /// User addresses their own record, or holds the role
    SelfOrRole(&'static str),
}

impl AuthPolicy {
    /// Check whether the context satisfies this policy for the addressed
    /// resource (if any).
    pub fn check(&self, context: &AuthContext, resource_id: Option<Uuid>) -> bool {
        match self {
            AuthPolicy::Public => true,
            AuthPolicy::Authenticated => context.is_authenticated(),
            AuthPolicy::HasRole(role) => context.has_role(role),
            AuthPolicy::SelfOrRole(role) => {
                context.has_role(role)
                    || (context.user_id().is_some() && context.user_id() == resource_id)
            }
        }
    }

    /// Enforce the policy, mapping failure to the right error class.
    pub fn authorize(&self, context: &AuthContext, resource_id: Option<Uuid>) -> Result<(), ApiError> {
        if matches!(self, AuthPolicy::Public) {
            return Ok(());
        }
        if !context.is_authenticated() {
            return Err(ApiError::Auth("authentication required".to_string()));
        }
        if self.check(context, resource_id) {
            Ok(())
        } else {
            Err(ApiError::Forbidden("insufficient permissions".to_string()))
        }
    }
}
