//! Domain ports for the hexagonal boundary.
//!
//! Inbound adapters talk to the domain services; the services talk to these
//! driven ports. Outbound adapters (PostgreSQL, in-memory) implement them.

mod card_repository;
mod user_repository;

pub use card_repository::{CardRepository, CardStoreError};
pub use user_repository::{CredentialRecord, UserRepository, UserStoreError};
