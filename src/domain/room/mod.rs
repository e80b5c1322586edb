//! Room aggregate
//!
//! Room snapshots with their meters and tenancy, plus the repository
//! interfaces used to read and mutate them.

pub mod model;
pub mod repository;

pub use model::{Lease, MeterPair, NewRoom, NewTenant, Occupancy, RoomSnapshot};
pub use repository::{LeaseRepository, RoomRepository};
