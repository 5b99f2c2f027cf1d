//! Saved reports and the aggregates behind generated reports

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;

use shoestore_core::domain::{
    CategorySales, LowStockProduct, NewReport, ProductSales, SalesSummary, SavedReport, TopCustomer,
};
use shoestore_core::error::DomainError;
use shoestore_core::repositories::ReportRepository;

use super::db_error;

/// Role id of regular customers in the users table
const CUSTOMER_ROLE_ID: i32 = 3;

pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SavedReportRow {
    pub id: i32,
    pub report_name: String,
    pub report_type: String,
    pub report_data: String,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<SavedReportRow> for SavedReport {
    fn from(row: SavedReportRow) -> Self {
        SavedReport {
            id: row.id,
            report_name: row.report_name,
            report_type: row.report_type,
            report_data: row.report_data,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SalesSummaryRow {
    pub total_sales: f64,
    pub total_orders: i64,
}

#[derive(Debug, FromRow)]
struct ProductSalesRow {
    pub product_id: i32,
    pub product_name: String,
    pub total_sold: i64,
    pub total_revenue: f64,
}

#[derive(Debug, FromRow)]
struct CategorySalesRow {
    pub category_id: i32,
    pub category_name: String,
    pub total_sold: i64,
    pub total_revenue: f64,
}

#[derive(Debug, FromRow)]
struct LowStockRow {
    pub product_id: i32,
    pub product_name: String,
    pub current_stock: i32,
}

#[derive(Debug, FromRow)]
struct TopCustomerRow {
    pub user_id: i32,
    pub user_name: String,
    pub total_orders: i64,
    pub total_spent: f64,
}

const SELECT_REPORT: &str = r#"
    SELECT
        idreport AS id,
        reportname AS report_name,
        reporttype AS report_type,
        COALESCE(reportdata, '') AS report_data,
        iduser AS user_id,
        createdat::timestamptz AS created_at
    FROM reports
"#;

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn create(&self, report: &NewReport, user_id: i32) -> Result<SavedReport, DomainError> {
        let row: SavedReportRow = sqlx::query_as(
            r#"
            INSERT INTO reports (reportname, reporttype, reportdata, iduser)
            VALUES ($1, $2, $3, $4)
            RETURNING
                idreport AS id,
                reportname AS report_name,
                reporttype AS report_type,
                COALESCE(reportdata, '') AS report_data,
                iduser AS user_id,
                createdat::timestamptz AS created_at
            "#,
        )
        .bind(&report.report_name)
        .bind(&report.report_type)
        .bind(&report.report_data)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("saving report", e))?;

        info!("Saved report {} ({})", row.id, row.report_type);
        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<SavedReport>, DomainError> {
        let rows: Vec<SavedReportRow> = sqlx::query_as(&format!("{} ORDER BY idreport", SELECT_REPORT))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("listing reports", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find(&self, id: i32) -> Result<Option<SavedReport>, DomainError> {
        let row: Option<SavedReportRow> = sqlx::query_as(&format!("{} WHERE idreport = $1", SELECT_REPORT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding report", e))?;

        Ok(row.map(Into::into))
    }

    async fn sales_summary(&self, since: DateTime<Utc>) -> Result<SalesSummary, DomainError> {
        let row: SalesSummaryRow = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(op.quantity * p.price), 0)::float8 AS total_sales,
                COUNT(DISTINCT o.idorder) AS total_orders
            FROM orders o
            JOIN orderproducts op ON o.idorder = op.idorder
            JOIN productsizes ps ON op.idproductsize = ps.idproductsize
            JOIN products p ON ps.idproduct = p.idproduct
            WHERE o.orderdate >= $1
            "#,
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("summarizing sales", e))?;

        Ok(SalesSummary { total_sales: row.total_sales, total_orders: row.total_orders })
    }

    async fn top_products(&self, since: DateTime<Utc>, limit: i64) -> Result<Vec<ProductSales>, DomainError> {
        let rows: Vec<ProductSalesRow> = sqlx::query_as(
            r#"
            SELECT
                p.idproduct AS product_id,
                p.name AS product_name,
                SUM(op.quantity)::int8 AS total_sold,
                SUM(op.quantity * p.price)::float8 AS total_revenue
            FROM orderproducts op
            JOIN orders o ON op.idorder = o.idorder
            JOIN productsizes ps ON op.idproductsize = ps.idproductsize
            JOIN products p ON ps.idproduct = p.idproduct
            WHERE o.orderdate >= $1
            GROUP BY p.idproduct, p.name
            ORDER BY total_revenue DESC
            LIMIT $2
            "#,
        )
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("ranking products", e))?;

        Ok(rows
            .into_iter()
            .map(|r| ProductSales {
                product_id: r.product_id,
                product_name: r.product_name,
                total_sold: r.total_sold,
                total_revenue: r.total_revenue,
            })
            .collect())
    }

    async fn category_sales(&self, since: DateTime<Utc>) -> Result<Vec<CategorySales>, DomainError> {
        let rows: Vec<CategorySalesRow> = sqlx::query_as(
            r#"
            SELECT
                c.idcategory AS category_id,
                c.categoryname AS category_name,
                SUM(op.quantity)::int8 AS total_sold,
                SUM(op.quantity * p.price)::float8 AS total_revenue
            FROM orderproducts op
            JOIN orders o ON op.idorder = o.idorder
            JOIN productsizes ps ON op.idproductsize = ps.idproductsize
            JOIN products p ON ps.idproduct = p.idproduct
            JOIN categories c ON p.idcategory = c.idcategory
            WHERE o.orderdate >= $1
            GROUP BY c.idcategory, c.categoryname
            ORDER BY total_revenue DESC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("summarizing categories", e))?;

        Ok(rows
            .into_iter()
            .map(|r| CategorySales {
                category_id: r.category_id,
                category_name: r.category_name,
                total_sold: r.total_sold,
                total_revenue: r.total_revenue,
            })
            .collect())
    }

    async fn product_count(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting products", e))
    }

    async fn low_stock(&self, threshold: i32) -> Result<Vec<LowStockProduct>, DomainError> {
        // One row per product, reporting its scarcest size
        let rows: Vec<LowStockRow> = sqlx::query_as(
            r#"
            SELECT
                p.idproduct AS product_id,
                p.name AS product_name,
                MIN(ps.quantity) AS current_stock
            FROM products p
            JOIN productsizes ps ON p.idproduct = ps.idproduct
            WHERE ps.quantity <= $1
            GROUP BY p.idproduct, p.name
            ORDER BY current_stock ASC
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("finding low stock", e))?;

        Ok(rows
            .into_iter()
            .map(|r| LowStockProduct {
                product_id: r.product_id,
                product_name: r.product_name,
                current_stock: r.current_stock,
            })
            .collect())
    }

    async fn customer_count(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE roleid = $1")
            .bind(CUSTOMER_ROLE_ID)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting customers", e))
    }

    async fn top_customers(&self, limit: i64) -> Result<Vec<TopCustomer>, DomainError> {
        let rows: Vec<TopCustomerRow> = sqlx::query_as(
            r#"
            SELECT
                u.iduser AS user_id,
                u.fullname AS user_name,
                COUNT(o.idorder) AS total_orders,
                COALESCE((
                    SELECT SUM(op.quantity * p.price)
                    FROM orders o2
                    JOIN orderproducts op ON o2.idorder = op.idorder
                    JOIN productsizes ps ON op.idproductsize = ps.idproductsize
                    JOIN products p ON ps.idproduct = p.idproduct
                    WHERE o2.iduser = u.iduser
                ), 0)::float8 AS total_spent
            FROM users u
            LEFT JOIN orders o ON u.iduser = o.iduser
            WHERE u.roleid = $1
            GROUP BY u.iduser, u.fullname
            ORDER BY total_spent DESC
            LIMIT $2
            "#,
        )
        .bind(CUSTOMER_ROLE_ID)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("ranking customers", e))?;

        Ok(rows
            .into_iter()
            .map(|r| TopCustomer {
                user_id: r.user_id,
                user_name: r.user_name,
                total_orders: r.total_orders,
                total_spent: r.total_spent,
            })
            .collect())
    }
}
