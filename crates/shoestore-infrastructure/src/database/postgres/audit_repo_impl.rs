//! Audit log storage (`logs` table)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use shoestore_core::domain::{AuditEntry, NewAuditEntry};
use shoestore_core::error::DomainError;
use shoestore_core::repositories::AuditRepository;
use shoestore_shared::Pagination;

use super::db_error;

pub struct PgAuditRepository {
    pool: PgPool,
}

impl PgAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditEntryRow {
    pub id: i32,
    pub user_id: i32,
    pub action: String,
    pub entity: Option<String>,
    pub entity_id: Option<i32>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditEntryRow> for AuditEntry {
    fn from(row: AuditEntryRow) -> Self {
        AuditEntry {
            id: row.id,
            user_id: row.user_id,
            action: row.action,
            entity: row.entity,
            entity_id: row.entity_id,
            details: row.details,
            created_at: row.created_at,
        }
    }
}

const SELECT_LOG: &str = r#"
    SELECT
        idlog AS id,
        iduser AS user_id,
        action,
        entity,
        entityid AS entity_id,
        details,
        createdat::timestamptz AS created_at
    FROM logs
"#;

#[async_trait]
impl AuditRepository for PgAuditRepository {
    async fn insert_batch(&self, entries: &[NewAuditEntry]) -> Result<u64, DomainError> {
        if entries.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO logs (iduser, action, entity, entityid, details, createdat) ");
        builder.push_values(entries, |mut b, entry| {
            b.push_bind(entry.user_id)
                .push_bind(&entry.action)
                .push_bind(&entry.entity)
                .push_bind(entry.entity_id)
                .push_bind(&entry.details)
                .push_bind(entry.created_at);
        });

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("writing audit batch", e))?;

        Ok(result.rows_affected())
    }

    async fn list(&self, page: Pagination) -> Result<(Vec<AuditEntry>, i64), DomainError> {
        let rows: Vec<AuditEntryRow> =
            sqlx::query_as(&format!("{} ORDER BY createdat DESC, idlog DESC LIMIT $1 OFFSET $2", SELECT_LOG))
                .bind(page.limit)
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("listing audit log", e))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting audit log", e))?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn find(&self, id: i32) -> Result<Option<AuditEntry>, DomainError> {
        let row: Option<AuditEntryRow> = sqlx::query_as(&format!("{} WHERE idlog = $1", SELECT_LOG))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding audit entry", e))?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM logs WHERE idlog = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting audit entry", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, action: &str, entity: &str, entity_id: i32) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM logs WHERE action = $1 AND entity = $2 AND entityid = $3)",
        )
        .bind(action)
        .bind(entity)
        .bind(entity_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("checking audit entry", e))
    }
}
