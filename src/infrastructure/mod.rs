//! Infrastructure layer - external concerns

pub mod database;
pub mod storage;
pub mod tariff_store;

pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{init_database, run_migrations, DatabaseConfig};
pub use storage::InMemoryRepositoryProvider;
pub use tariff_store::{FileTariffStore, InMemoryTariffStore};
