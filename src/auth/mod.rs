//! Authentication and authorization
//!
//! The access-policy collaborator: JWT verification produces an
//! [`policy::AuthContext`], declarative [`policy::AuthPolicy`] values gate
//! controller operations, and [`password`] provides the explicit hashing
//! step invoked before a user is persisted.

pub mod handlers;
pub mod jwt;
pub mod password;
pub mod policy;

pub use handlers::AuthState;
pub use jwt::{Claims, JwtAuth};
pub use policy::{AuthContext, AuthPolicy};
