//! # Shoe Store API
//! 
//! HTTP handlers, middleware, request DTOs and the router.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::{AppState, HttpSettings};

#[cfg(test)]
mod tests;
