//! Authentication and authorization errors

use thiserror::Error;

use crate::role::Role;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing token")]
    Missing,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token expired")]
    Expired,

    #[error("Access denied: {actor} cannot access {required} routes")]
    Denied { actor: Role, required: Role },

    #[error("Token creation failed: {0}")]
    Creation(String),
}
