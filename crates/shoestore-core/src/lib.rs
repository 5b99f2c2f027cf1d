//! # Shoe Store Core
//! 
//! Domain entities, repository and gateway traits (ports), the audit logger,
//! and the business services of the shoe store backend.

pub mod domain;
pub mod repositories;
pub mod gateways;
pub mod audit;
pub mod reports;
pub mod services;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
