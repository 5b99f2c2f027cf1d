// ============================================================================
// Shoe Store Infrastructure - PostgreSQL User Repository
// File: crates/shoestore-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::info;

use shoestore_core::domain::User;
use shoestore_core::error::DomainError;
use shoestore_core::repositories::UserRepository;
use shoestore_shared::Pagination;

use super::db_error;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: i32,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            password_hash: row.password_hash,
            role_id: row.role_id,
        }
    }
}

const SELECT_USER: &str = r#"
    SELECT
        iduser AS id,
        fullname AS full_name,
        email,
        COALESCE(passwordhash, '') AS password_hash,
        roleid AS role_id
    FROM users
"#;

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE iduser = $1", SELECT_USER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding user by id", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE email = $1", SELECT_USER))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding user by email", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self, page: Pagination) -> Result<(Vec<User>, i64), DomainError> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("{} ORDER BY iduser LIMIT $1 OFFSET $2", SELECT_USER))
                .bind(page.limit)
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("listing users", e))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting users", e))?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO users (fullname, email, passwordhash, roleid)
            VALUES ($1, $2, $3, $4)
            RETURNING iduser
            "#,
        )
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::EmailAlreadyExists(user.email.clone())
            }
            _ => db_error("creating user", e),
        })?;

        info!("Created user {}", id);
        Ok(User { id, ..user.clone() })
    }

    async fn update(&self, user: &User) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET fullname = $1, email = $2, passwordhash = $3, roleid = $4
            WHERE iduser = $5
            "#,
        )
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role_id)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::EmailAlreadyExists(user.email.clone())
            }
            _ => db_error("updating user", e),
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE users SET passwordhash = $1 WHERE iduser = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("updating password", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_password_by_email(&self, email: &str, password_hash: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE users SET passwordhash = $1 WHERE email = $2")
            .bind(password_hash)
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("updating password by email", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM users WHERE iduser = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting user", e))?;

        Ok(result.rows_affected() > 0)
    }
}
