//! Database module (PostgreSQL adapters)

pub mod connection;
pub mod postgres;

use std::sync::Arc;

use sqlx::PgPool;
use shoestore_core::repositories::Repositories;

pub use connection::create_pool;
pub use postgres::{
    PgAuditRepository, PgOrderRepository, PgProductRepository, PgReportRepository,
    PgReviewRepository, PgShoppingRepository, PgTaxonomyRepository, PgUserRepository,
};

/// Wires every PostgreSQL repository onto one pool.
pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        taxonomies: Arc::new(PgTaxonomyRepository::new(pool.clone())),
        products: Arc::new(PgProductRepository::new(pool.clone())),
        shopping: Arc::new(PgShoppingRepository::new(pool.clone())),
        orders: Arc::new(PgOrderRepository::new(pool.clone())),
        reviews: Arc::new(PgReviewRepository::new(pool.clone())),
        reports: Arc::new(PgReportRepository::new(pool.clone())),
        audit: Arc::new(PgAuditRepository::new(pool)),
    }
}
