//! Domain layer
//!
//! Pure billing types and calculations plus the repository interfaces the
//! infrastructure layer implements.

pub mod billing;
pub mod building;
pub mod repositories;
pub mod revenue;
pub mod room;
pub mod tariff;

pub use billing::{compose_bill, format_money, Bill, PeriodKey};
pub use building::{Building, BuildingRepository, NewBuilding};
pub use repositories::{DomainResult, RepositoryProvider};
pub use revenue::{RevenueBreakdown, RevenueChange, RevenueRecord, RevenueRepository};
pub use room::{
    Lease, LeaseRepository, MeterPair, NewRoom, NewTenant, Occupancy, RoomRepository,
    RoomSnapshot,
};
pub use tariff::{TariffConfiguration, TariffStore, UtilityKind, UtilityTariff};

pub use crate::shared::errors::DomainError;
