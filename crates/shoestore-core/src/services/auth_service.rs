//! Authentication service: login and self-registration

use std::sync::Arc;

use serde::Serialize;
use shoestore_security::{PasswordService, Role, TokenService};
use shoestore_shared::utils::mask_email;
use tracing::{info, warn};

use crate::domain::{NewUser, User};
use crate::error::DomainError;
use crate::repositories::UserRepository;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
}

/// Result of successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub user: User,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Unknown e-mail and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, DomainError> {
        let user = self.users.find_by_email(email).await?.ok_or_else(|| {
            warn!("Login failed: email not found: {}", mask_email(email));
            DomainError::InvalidCredentials
        })?;

        let valid = PasswordService::verify(password, &user.password_hash).map_err(|e| {
            warn!("Login failed: unusable password hash for user {}: {}", user.id, e);
            DomainError::InvalidCredentials
        })?;
        if !valid {
            warn!("Login failed: invalid password for: {}", mask_email(email));
            return Err(DomainError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(user.id, user.role())
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        info!("Login successful for user {}", user.id);
        Ok(LoginResult { token, user })
    }

    /// Self-registration always yields a plain `user` account.
    pub async fn register(&self, input: NewUser) -> Result<User, DomainError> {
        input.check()?;

        if self.users.find_by_email(&input.email).await?.is_some() {
            warn!("Registration failed: email already exists: {}", mask_email(&input.email));
            return Err(DomainError::EmailAlreadyExists(input.email));
        }

        let password_hash = PasswordService::hash(&input.password)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;

        let created = self
            .users
            .create(&User {
                id: 0,
                full_name: input.full_name,
                email: input.email,
                password_hash,
                role_id: Role::User.role_id(),
            })
            .await?;

        info!("Registration successful for user {}", created.id);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockUserRepository;
    use shoestore_shared::ManualClock;

    fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new("test-secret", 24, Arc::new(ManualClock::default())))
    }

    fn stored_user(password: &str, role_id: i32) -> User {
        User {
            id: 5,
            full_name: "Ann".into(),
            email: "ann@example.com".into(),
            password_hash: PasswordService::hash(password).unwrap(),
            role_id,
        }
    }

    #[tokio::test]
    async fn test_login_issues_token_with_role() {
        let mut repo = MockUserRepository::new();
        let user = stored_user("correct-horse", 2);
        repo.expect_find_by_email()
            .withf(|email| email == "ann@example.com")
            .returning(move |_| Ok(Some(user.clone())));

        let tokens = tokens();
        let service = AuthService::new(Arc::new(repo), tokens.clone());
        let result = service.login("ann@example.com", "correct-horse").await.unwrap();

        let identity = tokens.validate(&result.token).unwrap();
        assert_eq!(identity.user_id, 5);
        assert_eq!(identity.role, Role::Manager);
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let mut repo = MockUserRepository::new();
        let user = stored_user("correct-horse", 3);
        repo.expect_find_by_email()
            .returning(move |email| Ok((email == "ann@example.com").then(|| user.clone())));

        let service = AuthService::new(Arc::new(repo), tokens());

        let wrong_password = service.login("ann@example.com", "nope").await.unwrap_err();
        let unknown_email = service.login("bob@example.com", "correct-horse").await.unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_login_rejects_plaintext_hash() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| {
            Ok(Some(User {
                id: 1,
                full_name: "Old".into(),
                email: "old@example.com".into(),
                password_hash: "password123".into(),
                role_id: 3,
            }))
        });

        let service = AuthService::new(Arc::new(repo), tokens());
        let err = service.login("old@example.com", "password123").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_register_forces_user_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|u| u.role_id == 3 && u.password_hash.starts_with("$argon2"))
            .returning(|u| Ok(User { id: 11, ..u.clone() }));

        let service = AuthService::new(Arc::new(repo), tokens());
        let created = service
            .register(NewUser {
                full_name: "Eve".into(),
                email: "eve@example.com".into(),
                password: "long-enough".into(),
                role_id: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 11);
        assert_eq!(created.role(), Role::User);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repo = MockUserRepository::new();
        let user = stored_user("whatever1", 3);
        repo.expect_find_by_email().returning(move |_| Ok(Some(user.clone())));
        repo.expect_create().never();

        let service = AuthService::new(Arc::new(repo), tokens());
        let err = service
            .register(NewUser {
                full_name: "Ann".into(),
                email: "ann@example.com".into(),
                password: "long-enough".into(),
                role_id: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EmailAlreadyExists(_)));
    }
}
