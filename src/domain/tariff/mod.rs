//! Tariff aggregate
//!
//! Utility pricing policies, the tiered cost calculation, and the
//! operator-local store they are persisted in.

pub mod calculator;
pub mod model;
pub mod repository;

pub use calculator::cost;
pub use model::{
    StoredTariffs, TariffConfiguration, UtilityKind, UtilityTariff, MAX_AMOUNT, MAX_UNITS,
};
pub use repository::TariffStore;
