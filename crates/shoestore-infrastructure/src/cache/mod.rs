//! Reset-code stores: process memory for single instances, Redis when shared

mod memory;
mod redis;

pub use memory::InMemoryResetCodeStore;
pub use self::redis::RedisResetCodeStore;
