//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Invalid or expired code")]
    ResetCodeInvalid,

    #[error("Reviews are limited to purchased products")]
    ProductNotPurchased,

    #[error("Review already exists for this product")]
    DuplicateReview,

    #[error("Failed to send email")]
    MailDeliveryFailed,

    #[error("Invalid backup file name: {0}")]
    InvalidBackupName(String),

    #[error("Backup failed: {0}")]
    BackupFailed(String),

    #[error("Restore failed: {0}")]
    RestoreFailed(String),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(error: std::io::Error) -> Self {
        DomainError::StorageError(error.to_string())
    }
}
