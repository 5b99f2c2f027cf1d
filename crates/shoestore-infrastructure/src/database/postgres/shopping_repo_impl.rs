//! Basket and favorites storage

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use shoestore_core::domain::{BasketEntry, BasketItem, Favorite, FavoriteItem};
use shoestore_core::error::DomainError;
use shoestore_core::repositories::ShoppingRepository;

use super::db_error;

pub struct PgShoppingRepository {
    pool: PgPool,
}

impl PgShoppingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct BasketItemRow {
    pub id: i32,
    pub user_id: i32,
    pub product_size_id: i32,
    pub quantity: i32,
    pub product_id: i32,
    pub product_name: String,
    pub size: i32,
    pub available: i32,
    pub price: f64,
    pub image_url: String,
}

impl From<BasketItemRow> for BasketItem {
    fn from(row: BasketItemRow) -> Self {
        BasketItem {
            id: row.id,
            user_id: row.user_id,
            product_size_id: row.product_size_id,
            quantity: row.quantity,
            product_id: row.product_id,
            product_name: row.product_name,
            size: row.size,
            available: row.available,
            price: row.price,
            image_url: row.image_url,
        }
    }
}

#[derive(Debug, FromRow)]
struct FavoriteItemRow {
    pub id: i32,
    pub user_id: i32,
    pub product_size_id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub size: i32,
    pub price: f64,
    pub image_url: String,
}

impl From<FavoriteItemRow> for FavoriteItem {
    fn from(row: FavoriteItemRow) -> Self {
        FavoriteItem {
            id: row.id,
            user_id: row.user_id,
            product_size_id: row.product_size_id,
            product_id: row.product_id,
            product_name: row.product_name,
            size: row.size,
            price: row.price,
            image_url: row.image_url,
        }
    }
}

#[async_trait]
impl ShoppingRepository for PgShoppingRepository {
    async fn basket_for_user(&self, user_id: i32) -> Result<Vec<BasketItem>, DomainError> {
        let rows: Vec<BasketItemRow> = sqlx::query_as(
            r#"
            SELECT
                b.idbasket AS id,
                b.iduser AS user_id,
                b.idproductsize AS product_size_id,
                b.quantity,
                p.idproduct AS product_id,
                p.name AS product_name,
                ps.size,
                ps.quantity AS available,
                p.price::float8 AS price,
                COALESCE(p.imageurl, '') AS image_url
            FROM basket b
            JOIN productsizes ps ON b.idproductsize = ps.idproductsize
            JOIN products p ON ps.idproduct = p.idproduct
            WHERE b.iduser = $1
            ORDER BY b.idbasket
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("loading basket", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn add_to_basket(
        &self,
        user_id: i32,
        product_size_id: i32,
        quantity: i32,
    ) -> Result<BasketEntry, DomainError> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO basket (iduser, idproductsize, quantity) VALUES ($1, $2, $3) RETURNING idbasket",
        )
        .bind(user_id)
        .bind(product_size_id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("adding to basket", e))?;

        Ok(BasketEntry { id, user_id, product_size_id, quantity })
    }

    async fn update_basket_quantity(&self, id: i32, quantity: i32) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE basket SET quantity = $1 WHERE idbasket = $2")
            .bind(quantity)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("updating basket quantity", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_from_basket(&self, id: i32) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM basket WHERE idbasket = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("removing from basket", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn favorites_for_user(&self, user_id: i32) -> Result<Vec<FavoriteItem>, DomainError> {
        let rows: Vec<FavoriteItemRow> = sqlx::query_as(
            r#"
            SELECT
                f.idfavorites AS id,
                f.iduser AS user_id,
                f.idproductsize AS product_size_id,
                p.idproduct AS product_id,
                p.name AS product_name,
                ps.size,
                p.price::float8 AS price,
                COALESCE(p.imageurl, '') AS image_url
            FROM favorites f
            JOIN productsizes ps ON f.idproductsize = ps.idproductsize
            JOIN products p ON ps.idproduct = p.idproduct
            WHERE f.iduser = $1
            ORDER BY f.idfavorites
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("loading favorites", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn add_favorite(&self, user_id: i32, product_size_id: i32) -> Result<Favorite, DomainError> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO favorites (iduser, idproductsize) VALUES ($1, $2) RETURNING idfavorites",
        )
        .bind(user_id)
        .bind(product_size_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("adding favorite", e))?;

        Ok(Favorite { id, user_id, product_size_id })
    }

    async fn remove_favorite(&self, id: i32) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM favorites WHERE idfavorites = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("removing favorite", e))?;

        Ok(result.rows_affected() > 0)
    }
}
