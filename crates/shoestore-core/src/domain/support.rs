//! Support request submitted from the storefront

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::DomainError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("static email pattern")
});

#[derive(Debug, Clone, Deserialize)]
pub struct SupportMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl SupportMessage {
    /// Returns the message with surrounding whitespace removed.
    pub fn check(&self) -> Result<String, DomainError> {
        let name_len = self.name.trim().chars().count();
        if !(2..=100).contains(&name_len) {
            return Err(DomainError::ValidationError(
                "Name must be between 2 and 100 characters".into(),
            ));
        }

        if !EMAIL_PATTERN.is_match(self.email.trim()) {
            return Err(DomainError::ValidationError("Invalid email address".into()));
        }

        let message = self.message.trim();
        let message_len = message.chars().count();
        if !(15..=2000).contains(&message_len) {
            return Err(DomainError::ValidationError(
                "Message must be between 15 and 2000 characters".into(),
            ));
        }
        if !message.chars().any(char::is_alphanumeric) {
            return Err(DomainError::ValidationError(
                "Message must contain letters or digits".into(),
            ));
        }

        Ok(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(name: &str, email: &str, body: &str) -> SupportMessage {
        SupportMessage { name: name.into(), email: email.into(), message: body.into() }
    }

    #[test]
    fn test_valid_message_is_trimmed() {
        let msg = message("Ann", "ann@example.com", "   My order never arrived.   ");
        assert_eq!(msg.check().unwrap(), "My order never arrived.");
    }

    #[test]
    fn test_rejections() {
        assert!(message("A", "ann@example.com", "My order never arrived.").check().is_err());
        assert!(message("Ann", "ann@example", "My order never arrived.").check().is_err());
        assert!(message("Ann", "ann@example.com", "too short").check().is_err());
        assert!(message("Ann", "ann@example.com", "!!!!!!!!!!!!!!!!!!!!").check().is_err());
        assert!(message("Ann", "ann@example.com", &"x".repeat(2001)).check().is_err());
    }
}
