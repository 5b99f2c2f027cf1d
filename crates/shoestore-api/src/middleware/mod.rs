//! Request pipeline: CORS, authentication, role gate and transport audit

pub mod audit;
pub mod auth;
pub mod cors;

pub use audit::audit_mutations;
pub use auth::{authenticate, is_public, require_role};
pub use cors::cors_layer;
