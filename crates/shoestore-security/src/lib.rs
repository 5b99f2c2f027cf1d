//! # Shoe Store Security
//! 
//! Security primitives: roles and the role gate, session tokens, password hashing,
//! and one-time confirmation codes.

pub mod error;
pub mod role;
pub mod jwt;
pub mod password;
pub mod codes;

pub use error::AuthError;
pub use role::{Identity, Role};
pub use jwt::{Claims, TokenService};
pub use password::PasswordService;
