//! # Shoe Store Shared
//! 
//! Shared configuration, telemetry, clock, and pagination types for the shoe store backend.

pub mod constants;
pub mod types;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod clock;
pub mod error;

pub use types::*;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AppError;
