//! Brands, categories, products and product sizes

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::info;

use shoestore_core::domain::{Product, ProductInput, ProductSize, Taxon, TaxonomyKind};
use shoestore_core::error::DomainError;
use shoestore_core::repositories::{ProductRepository, TaxonomyRepository};
use shoestore_shared::Pagination;

use super::db_error;

pub struct PgTaxonomyRepository {
    pool: PgPool,
}

impl PgTaxonomyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TaxonRow {
    pub id: i32,
    pub name: String,
}

impl From<TaxonRow> for Taxon {
    fn from(row: TaxonRow) -> Self {
        Taxon { id: row.id, name: row.name }
    }
}

fn select_taxa(kind: TaxonomyKind) -> String {
    format!(
        "SELECT {id} AS id, {name} AS name FROM {table}",
        id = kind.id_column(),
        name = kind.name_column(),
        table = kind.table()
    )
}

#[async_trait]
impl TaxonomyRepository for PgTaxonomyRepository {
    async fn list(&self, kind: TaxonomyKind) -> Result<Vec<Taxon>, DomainError> {
        let sql = format!("{} ORDER BY {}", select_taxa(kind), kind.id_column());
        let rows: Vec<TaxonRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("listing taxa", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find(&self, kind: TaxonomyKind, id: i32) -> Result<Option<Taxon>, DomainError> {
        let sql = format!("{} WHERE {} = $1", select_taxa(kind), kind.id_column());
        let row: Option<TaxonRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding taxon", e))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, kind: TaxonomyKind, name: &str) -> Result<Taxon, DomainError> {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ($1) RETURNING {}",
            kind.table(),
            kind.name_column(),
            kind.id_column()
        );
        let id: i32 = sqlx::query_scalar(&sql)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("creating taxon", e))?;

        info!("Created {} {}", kind.as_str(), id);
        Ok(Taxon { id, name: name.to_string() })
    }

    async fn update(&self, kind: TaxonomyKind, id: i32, name: &str) -> Result<bool, DomainError> {
        let sql = format!(
            "UPDATE {} SET {} = $1 WHERE {} = $2",
            kind.table(),
            kind.name_column(),
            kind.id_column()
        );
        let result = sqlx::query(&sql)
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("updating taxon", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, kind: TaxonomyKind, id: i32) -> Result<bool, DomainError> {
        let sql = format!("DELETE FROM {} WHERE {} = $1", kind.table(), kind.id_column());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting taxon", e))?;

        Ok(result.rows_affected() > 0)
    }
}

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    pub id: i32,
    pub name: String,
    pub image_url: String,
    pub price: f64,
    pub brand_id: i32,
    pub category_id: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            image_url: row.image_url,
            price: row.price,
            brand_id: row.brand_id,
            category_id: row.category_id,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProductSizeRow {
    pub id: i32,
    pub product_id: i32,
    pub size: i32,
    pub quantity: i32,
}

impl From<ProductSizeRow> for ProductSize {
    fn from(row: ProductSizeRow) -> Self {
        ProductSize {
            id: row.id,
            product_id: row.product_id,
            size: row.size,
            quantity: row.quantity,
        }
    }
}

const SELECT_PRODUCT: &str = r#"
    SELECT
        idproduct AS id,
        name,
        COALESCE(imageurl, '') AS image_url,
        price::float8 AS price,
        idbrand AS brand_id,
        idcategory AS category_id
    FROM products
"#;

/// Sizes of one product, used by every cascade step
const SIZES_OF_PRODUCT: &str = "SELECT idproductsize FROM productsizes WHERE idproduct = $1";

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self, page: Pagination) -> Result<(Vec<Product>, i64), DomainError> {
        let rows: Vec<ProductRow> =
            sqlx::query_as(&format!("{} ORDER BY idproduct LIMIT $1 OFFSET $2", SELECT_PRODUCT))
                .bind(page.limit)
                .bind(page.offset())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("listing products", e))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting products", e))?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn find(&self, id: i32) -> Result<Option<Product>, DomainError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!("{} WHERE idproduct = $1", SELECT_PRODUCT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding product", e))?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, input: &ProductInput) -> Result<Product, DomainError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO products (name, imageurl, price, idbrand, idcategory)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING idproduct
            "#,
        )
        .bind(&input.name)
        .bind(&input.image_url)
        .bind(input.price)
        .bind(input.brand_id)
        .bind(input.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("creating product", e))?;

        info!("Created product {}", id);
        Ok(Product {
            id,
            name: input.name.clone(),
            image_url: input.image_url.clone(),
            price: input.price,
            brand_id: input.brand_id,
            category_id: input.category_id,
        })
    }

    async fn update(&self, id: i32, input: &ProductInput) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $1, imageurl = $2, price = $3, idbrand = $4, idcategory = $5
            WHERE idproduct = $6
            "#,
        )
        .bind(&input.name)
        .bind(&input.image_url)
        .bind(input.price)
        .bind(input.brand_id)
        .bind(input.category_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("updating product", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_cascade(&self, id: i32) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("starting product delete", e))?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE idproduct = $1)")
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| db_error("checking product", e))?;
        if !exists {
            return Ok(false);
        }

        let dependents = [
            format!("DELETE FROM basket WHERE idproductsize IN ({})", SIZES_OF_PRODUCT),
            format!("DELETE FROM favorites WHERE idproductsize IN ({})", SIZES_OF_PRODUCT),
            format!("DELETE FROM orderproducts WHERE idproductsize IN ({})", SIZES_OF_PRODUCT),
            "DELETE FROM productsizes WHERE idproduct = $1".to_string(),
            "DELETE FROM reviews WHERE idproduct = $1".to_string(),
            "DELETE FROM products WHERE idproduct = $1".to_string(),
        ];
        for sql in &dependents {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("deleting product dependents", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("committing product delete", e))?;

        info!("Deleted product {} with its sizes, reviews and references", id);
        Ok(true)
    }

    async fn sizes(&self, product_id: i32) -> Result<Vec<ProductSize>, DomainError> {
        let rows: Vec<ProductSizeRow> = sqlx::query_as(
            r#"
            SELECT idproductsize AS id, idproduct AS product_id, size, quantity
            FROM productsizes
            WHERE idproduct = $1
            ORDER BY size
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing product sizes", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_size_quantity(&self, size_id: i32, quantity: i32) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE productsizes SET quantity = $1 WHERE idproductsize = $2")
            .bind(quantity)
            .bind(size_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("updating size quantity", e))?;

        Ok(result.rows_affected() > 0)
    }
}
