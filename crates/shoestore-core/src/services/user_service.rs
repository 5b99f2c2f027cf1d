//! Account administration

use std::sync::Arc;

use shoestore_security::{PasswordService, Role};
use shoestore_shared::utils::mask_email;
use tracing::info;

use crate::domain::{NewUser, User, UserChanges};
use crate::error::DomainError;
use crate::repositories::UserRepository;

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Admin create. The role defaults to `user`.
    pub async fn create(&self, input: NewUser) -> Result<User, DomainError> {
        input.check()?;
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(DomainError::EmailAlreadyExists(input.email));
        }

        let password_hash = hash(&input.password)?;
        let role_id = input
            .role_id
            .map(Role::from_role_id)
            .unwrap_or_default()
            .role_id();

        let created = self
            .users
            .create(&User {
                id: 0,
                full_name: input.full_name,
                email: input.email,
                password_hash,
                role_id,
            })
            .await?;

        info!("User {} created ({})", created.id, mask_email(&created.email));
        Ok(created)
    }

    /// Updates profile and role. The stored hash is kept unless a new password is given.
    pub async fn update(&self, id: i32, changes: UserChanges) -> Result<User, DomainError> {
        changes.check()?;

        let current = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound("User"))?;

        if current.email != changes.email {
            if let Some(other) = self.users.find_by_email(&changes.email).await? {
                if other.id != id {
                    return Err(DomainError::EmailAlreadyExists(changes.email));
                }
            }
        }

        let password_hash = match changes.password.as_deref() {
            Some(p) if !p.is_empty() => hash(p)?,
            _ => current.password_hash,
        };

        let updated = User {
            id,
            full_name: changes.full_name,
            email: changes.email,
            password_hash,
            role_id: Role::from_role_id(changes.role_id).role_id(),
        };

        if !self.users.update(&updated).await? {
            return Err(DomainError::NotFound("User"));
        }
        info!("User {} updated", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        if !self.users.delete(id).await? {
            return Err(DomainError::NotFound("User"));
        }
        info!("User {} deleted", id);
        Ok(())
    }
}

fn hash(password: &str) -> Result<String, DomainError> {
    PasswordService::hash(password).map_err(|e| DomainError::PasswordHashError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockUserRepository;

    fn existing() -> User {
        User {
            id: 3,
            full_name: "Ann".into(),
            email: "ann@example.com".into(),
            password_hash: "$argon2id$old".into(),
            role_id: 3,
        }
    }

    #[tokio::test]
    async fn test_update_keeps_hash_without_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(Some(existing())));
        repo.expect_update()
            .withf(|u| u.password_hash == "$argon2id$old" && u.role_id == 2)
            .returning(|_| Ok(true));

        let service = UserService::new(Arc::new(repo));
        let updated = service
            .update(
                3,
                UserChanges {
                    full_name: "Ann B".into(),
                    email: "ann@example.com".into(),
                    password: None,
                    role_id: 2,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.full_name, "Ann B");
    }

    #[tokio::test]
    async fn test_update_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repo));
        let err = service
            .update(
                99,
                UserChanges {
                    full_name: "X".into(),
                    email: "x@example.com".into(),
                    password: None,
                    role_id: 3,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound("User")));
    }

    #[tokio::test]
    async fn test_create_defaults_to_user_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|u| u.role_id == 3)
            .returning(|u| Ok(User { id: 8, ..u.clone() }));

        let service = UserService::new(Arc::new(repo));
        let created = service
            .create(NewUser {
                full_name: "Bob".into(),
                email: "bob@example.com".into(),
                password: "long-enough".into(),
                role_id: None,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 8);
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().returning(|_| Ok(false));
        let service = UserService::new(Arc::new(repo));
        assert!(matches!(service.delete(4).await, Err(DomainError::NotFound("User"))));
    }
}
