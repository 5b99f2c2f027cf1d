//! # Shoe Store Infrastructure
//! 
//! Adapters for the core ports: PostgreSQL repositories, reset-code stores,
//! SMTP mailer, process runner and report renderers.

pub mod database;
pub mod cache;
pub mod mail;
pub mod process;
pub mod reports;

pub use database::{create_pool, postgres_repositories};
pub use cache::{InMemoryResetCodeStore, RedisResetCodeStore};
pub use mail::LettreMailer;
pub use process::TokioCommandRunner;
pub use reports::{PdfRenderer, XlsxRenderer};
