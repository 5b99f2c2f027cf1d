//! Product reviews

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use shoestore_core::domain::{Review, ReviewInput};
use shoestore_core::error::DomainError;
use shoestore_core::repositories::ReviewRepository;
use shoestore_shared::Pagination;

use super::db_error;

pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn page_where(
        &self,
        filter: &str,
        value: Option<i32>,
        page: Pagination,
    ) -> Result<(Vec<Review>, i64), DomainError> {
        let (rows_sql, count_sql) = match value {
            Some(_) => (
                format!("{} WHERE {} = $1 ORDER BY reviewdate DESC, idreview DESC LIMIT $2 OFFSET $3", SELECT_REVIEW, filter),
                format!("SELECT COUNT(*) FROM reviews WHERE {} = $1", filter),
            ),
            None => (
                format!("{} ORDER BY reviewdate DESC, idreview DESC LIMIT $1 OFFSET $2", SELECT_REVIEW),
                "SELECT COUNT(*) FROM reviews".to_string(),
            ),
        };

        let mut rows_query = sqlx::query_as::<_, ReviewRow>(&rows_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(v) = value {
            rows_query = rows_query.bind(v);
            count_query = count_query.bind(v);
        }

        let rows = rows_query
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("listing reviews", e))?;

        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting reviews", e))?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}

#[derive(Debug, FromRow)]
struct ReviewRow {
    pub id: i32,
    pub product_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: String,
    pub date: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            product_id: row.product_id,
            user_id: row.user_id,
            rating: row.rating,
            comment: row.comment,
            date: row.date,
        }
    }
}

const SELECT_REVIEW: &str = r#"
    SELECT
        idreview AS id,
        idproduct AS product_id,
        iduser AS user_id,
        rating,
        COALESCE(comment, '') AS comment,
        reviewdate::timestamptz AS date
    FROM reviews
"#;

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn list(&self, page: Pagination) -> Result<(Vec<Review>, i64), DomainError> {
        self.page_where("", None, page).await
    }

    async fn for_product(&self, product_id: i32, page: Pagination) -> Result<(Vec<Review>, i64), DomainError> {
        self.page_where("idproduct", Some(product_id), page).await
    }

    async fn for_user(&self, user_id: i32, page: Pagination) -> Result<(Vec<Review>, i64), DomainError> {
        self.page_where("iduser", Some(user_id), page).await
    }

    async fn find(&self, id: i32) -> Result<Option<Review>, DomainError> {
        let row: Option<ReviewRow> = sqlx::query_as(&format!("{} WHERE idreview = $1", SELECT_REVIEW))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding review", e))?;

        Ok(row.map(Into::into))
    }

    async fn has_purchased(&self, user_id: i32, product_id: i32) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM orders o
                JOIN orderproducts op ON o.idorder = op.idorder
                JOIN productsizes ps ON op.idproductsize = ps.idproductsize
                WHERE o.iduser = $1 AND ps.idproduct = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("checking purchase", e))
    }

    async fn exists_for(&self, product_id: i32, user_id: i32) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM reviews WHERE idproduct = $1 AND iduser = $2)")
            .bind(product_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("checking existing review", e))
    }

    async fn create(
        &self,
        product_id: i32,
        user_id: i32,
        input: &ReviewInput,
        date: DateTime<Utc>,
    ) -> Result<Review, DomainError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO reviews (idproduct, iduser, rating, comment, reviewdate)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING idreview
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .bind(input.rating)
        .bind(&input.comment)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("creating review", e))?;

        Ok(Review {
            id,
            product_id,
            user_id,
            rating: input.rating,
            comment: input.comment.clone(),
            date,
        })
    }

    async fn update(&self, id: i32, input: &ReviewInput) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE reviews SET rating = $1, comment = $2 WHERE idreview = $3")
            .bind(input.rating)
            .bind(&input.comment)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("updating review", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM reviews WHERE idreview = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting review", e))?;

        Ok(result.rows_affected() > 0)
    }
}
