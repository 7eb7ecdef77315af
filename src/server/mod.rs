//! HTTP server: the generic resource controller, router assembly, and
//! request middleware

pub mod middleware;
pub mod resource;
pub mod router;

pub use resource::{ResourcePolicies, ResourceState};
pub use router::build_router;
