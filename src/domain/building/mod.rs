//! Building aggregate

pub mod model;
pub mod repository;

pub use model::{Building, NewBuilding};
pub use repository::BuildingRepository;
