//! Orders and order lines

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;

use shoestore_core::domain::{Order, OrderLine, OrderProduct};
use shoestore_core::error::DomainError;
use shoestore_core::repositories::OrderRepository;
use shoestore_shared::Pagination;

use super::db_error;

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    pub id: i32,
    pub user_id: i32,
    pub order_date: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order { id: row.id, user_id: row.user_id, order_date: row.order_date }
    }
}

#[derive(Debug, FromRow)]
struct OrderProductRow {
    pub id: i32,
    pub order_id: i32,
    pub product_size_id: i32,
    pub quantity: i32,
}

impl From<OrderProductRow> for OrderProduct {
    fn from(row: OrderProductRow) -> Self {
        OrderProduct {
            id: row.id,
            order_id: row.order_id,
            product_size_id: row.product_size_id,
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderLineRow {
    pub id: i32,
    pub order_id: i32,
    pub product_size_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub size: i32,
    pub quantity: i32,
    pub price: f64,
    pub image_url: String,
}

impl From<OrderLineRow> for OrderLine {
    fn from(row: OrderLineRow) -> Self {
        OrderLine {
            id: row.id,
            order_id: row.order_id,
            product_size_id: row.product_size_id,
            product_id: row.product_id,
            product_name: row.product_name,
            size: row.size,
            quantity: row.quantity,
            price: row.price,
            image_url: row.image_url,
        }
    }
}

const SELECT_ORDER: &str = r#"
    SELECT idorder AS id, iduser AS user_id, orderdate::timestamptz AS order_date
    FROM orders
"#;

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn list(&self, page: Pagination) -> Result<(Vec<Order>, i64), DomainError> {
        let rows: Vec<OrderRow> =
            sqlx::query_as(&format!("{} ORDER BY orderdate DESC, idorder DESC LIMIT $1 OFFSET $2", SELECT_ORDER))
                .bind(page.limit)
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("listing orders", e))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting orders", e))?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn list_for_user(&self, user_id: i32, page: Pagination) -> Result<(Vec<Order>, i64), DomainError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "{} WHERE iduser = $1 ORDER BY orderdate DESC, idorder DESC LIMIT $2 OFFSET $3",
            SELECT_ORDER
        ))
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing user orders", e))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE iduser = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting user orders", e))?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn find(&self, id: i32) -> Result<Option<Order>, DomainError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!("{} WHERE idorder = $1", SELECT_ORDER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding order", e))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, user_id: i32, order_date: DateTime<Utc>) -> Result<Order, DomainError> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO orders (iduser, orderdate) VALUES ($1, $2) RETURNING idorder",
        )
        .bind(user_id)
        .bind(order_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("creating order", e))?;

        info!("Created order {} for user {}", id, user_id);
        Ok(Order { id, user_id, order_date })
    }

    async fn add_line(&self, order_id: i32, product_size_id: i32, quantity: i32) -> Result<OrderProduct, DomainError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO orderproducts (idorder, idproductsize, quantity)
            VALUES ($1, $2, $3)
            RETURNING idorderproduct
            "#,
        )
        .bind(order_id)
        .bind(product_size_id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("adding order line", e))?;

        Ok(OrderProduct { id, order_id, product_size_id, quantity })
    }

    async fn list_lines(&self) -> Result<Vec<OrderProduct>, DomainError> {
        let rows: Vec<OrderProductRow> = sqlx::query_as(
            r#"
            SELECT idorderproduct AS id, idorder AS order_id, idproductsize AS product_size_id, quantity
            FROM orderproducts
            ORDER BY idorderproduct
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing order lines", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn lines_for_order(&self, order_id: i32) -> Result<Vec<OrderLine>, DomainError> {
        let rows: Vec<OrderLineRow> = sqlx::query_as(
            r#"
            SELECT
                op.idorderproduct AS id,
                op.idorder AS order_id,
                op.idproductsize AS product_size_id,
                p.idproduct AS product_id,
                p.name AS product_name,
                ps.size,
                op.quantity,
                p.price::float8 AS price,
                COALESCE(p.imageurl, '') AS image_url
            FROM orderproducts op
            JOIN productsizes ps ON op.idproductsize = ps.idproductsize
            JOIN products p ON ps.idproduct = p.idproduct
            WHERE op.idorder = $1
            ORDER BY op.idorderproduct
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("loading order lines", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_line_quantity(&self, id: i32, quantity: i32) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE orderproducts SET quantity = $1 WHERE idorderproduct = $2")
            .bind(quantity)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("updating order line", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_lines(&self, order_id: i32) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM orderproducts WHERE idorder = $1")
            .bind(order_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting order lines", e))
    }

    async fn recipient_email(&self, order_id: i32) -> Result<Option<String>, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT u.email
            FROM orders o
            JOIN users u ON o.iduser = u.iduser
            WHERE o.idorder = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding order recipient", e))
    }
}
