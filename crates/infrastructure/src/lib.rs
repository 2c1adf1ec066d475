//! Infrastructure adapters for the shield's application ports.

#![forbid(unsafe_code)]

mod in_memory_shield_repository;
mod postgres_shield_repository;

pub use in_memory_shield_repository::{ImageParent, InMemoryShieldRepository};
pub use postgres_shield_repository::PostgresShieldRepository;
