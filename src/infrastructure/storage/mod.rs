//! Document storage backends

mod factory;
mod in_memory;
mod postgres;

pub use factory::{StorageBackend, StorageConfig, StorageType, UnknownBackend};
pub use in_memory::InMemoryStorage;
pub use postgres::{PostgresConfig, PostgresStorage};
