//! # Rental Billing
//!
//! Billing engine for rental properties: tiered water and electric
//! pricing, monthly bills per room, and revenue snapshots per period.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Billing types, the tariff calculator, bill composer,
//!   revenue aggregator and repository traits
//! - **application**: Services orchestrating repositories and the engine
//! - **infrastructure**: SQLite storage via SeaORM, in-memory storage,
//!   tariff stores
//! - **config**: TOML application settings
//! - **app**: Runtime wiring and logging setup

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use app::{init_tracing, AppHandle, AppOptions};
pub use config::{default_config_path, AppConfig, CONFIG_ENV};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
