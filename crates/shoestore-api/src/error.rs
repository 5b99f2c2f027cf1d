//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use shoestore_core::DomainError;
use shoestore_security::AuthError;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }

    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Missing => ApiError::Unauthorized("Authorization header required".into()),
            AuthError::Invalid(_) => ApiError::Unauthorized("Invalid token".into()),
            AuthError::Expired => ApiError::Unauthorized("Token expired".into()),
            AuthError::Denied { .. } => ApiError::Forbidden("Insufficient permissions".into()),
            AuthError::Creation(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(what) => ApiError::not_found(what),
            DomainError::InvalidCredentials => ApiError::Unauthorized(e.to_string()),
            DomainError::EmailAlreadyExists(_) | DomainError::DuplicateReview => ApiError::Conflict(e.to_string()),
            DomainError::PasswordTooShort(_)
            | DomainError::ValidationError(_)
            | DomainError::InvalidBackupName(_) => ApiError::BadRequest(e.to_string()),
            // Never says which check failed
            DomainError::ResetCodeInvalid => ApiError::NotFound("Invalid or expired code".into()),
            DomainError::ProductNotPurchased => ApiError::Forbidden(e.to_string()),
            DomainError::MailDeliveryFailed => ApiError::InternalError(e.to_string()),
            DomainError::BackupFailed(_) | DomainError::RestoreFailed(_) => ApiError::InternalError(e.to_string()),
            DomainError::PasswordHashError(_)
            | DomainError::TokenGenerationError(_)
            | DomainError::DatabaseError(_)
            | DomainError::CacheError(_)
            | DomainError::StorageError(_)
            | DomainError::RenderError(_)
            | DomainError::InternalError(_) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let message = match &self {
            ApiError::InternalError(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg) => {
                tracing::warn!("{} {}: {}", status.as_u16(), code, msg);
                msg.clone()
            }
        };

        (status, ApiResponse::error(code, &message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoestore_security::Role;

    #[test]
    fn test_auth_status_mapping() {
        let cases = [
            (AuthError::Missing, StatusCode::UNAUTHORIZED),
            (AuthError::Invalid("bad".into()), StatusCode::UNAUTHORIZED),
            (AuthError::Expired, StatusCode::UNAUTHORIZED),
            (AuthError::Denied { actor: Role::User, required: Role::Admin }, StatusCode::FORBIDDEN),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).parts().0, status);
        }
    }

    #[test]
    fn test_domain_status_mapping() {
        let cases = [
            (DomainError::ResetCodeInvalid, StatusCode::NOT_FOUND),
            (DomainError::NotFound("Order"), StatusCode::NOT_FOUND),
            (DomainError::PasswordTooShort(8), StatusCode::BAD_REQUEST),
            (DomainError::DuplicateReview, StatusCode::CONFLICT),
            (DomainError::EmailAlreadyExists("a@b.com".into()), StatusCode::CONFLICT),
            (DomainError::ProductNotPurchased, StatusCode::FORBIDDEN),
            (DomainError::DatabaseError("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).parts().0, status);
        }
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let response = ApiError::InternalError("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
