//! Persistence adapters for the credential and card stores.
//!
//! PostgreSQL adapters back production deployments; the in-memory adapters
//! back tests and database-less development runs. Both implement the same
//! domain ports, so nothing above this module can tell them apart.

mod bootstrap;
mod diesel_card_repository;
mod diesel_user_repository;
mod memory;
mod models;
mod pool;
pub(crate) mod schema;

pub use bootstrap::{BootstrapError, ensure_schema};
pub use diesel_card_repository::DieselCardRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use memory::{MemoryCardRepository, MemoryUserRepository};
pub use pool::{DbPool, PoolConfig, PoolError};
