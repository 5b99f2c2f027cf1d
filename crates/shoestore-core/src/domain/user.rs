//! User domain entity

use serde::{Deserialize, Serialize};
use shoestore_security::Role;
use shoestore_shared::constants::MIN_PASSWORD_LENGTH;
use validator::Validate;

use crate::error::DomainError;

/// Stored account. The password hash never leaves the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    #[serde(rename = "fullname")]
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role_id: i32,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from_role_id(self.role_id)
    }
}

/// Registration or admin-create payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[serde(rename = "fullname")]
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    pub password: String,

    #[serde(default)]
    pub role_id: Option<i32>,
}

impl NewUser {
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()?;
        check_password_length(&self.password)
    }
}

/// Admin update payload. A present password is re-hashed.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserChanges {
    #[serde(rename = "fullname")]
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    #[serde(default)]
    pub password: Option<String>,

    pub role_id: i32,
}

impl UserChanges {
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()?;
        match self.password.as_deref() {
            Some(p) if !p.is_empty() => check_password_length(p),
            _ => Ok(()),
        }
    }
}

pub fn check_password_length(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User {
            id: 7,
            full_name: "Ann".into(),
            email: "ann@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role_id: 3,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"fullname\":\"Ann\""));
        assert_eq!(user.role(), Role::User);
    }

    #[test]
    fn test_new_user_rejects_short_password() {
        let input = NewUser {
            full_name: "Ann".into(),
            email: "ann@example.com".into(),
            password: "short".into(),
            role_id: None,
        };
        assert!(matches!(input.check(), Err(DomainError::PasswordTooShort(8))));
    }

    #[test]
    fn test_changes_without_password_are_valid() {
        let changes = UserChanges {
            full_name: "Ann".into(),
            email: "ann@example.com".into(),
            password: Some(String::new()),
            role_id: 2,
        };
        assert!(changes.check().is_ok());
    }
}
