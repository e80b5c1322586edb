//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::building::BuildingRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::revenue::RevenueRepository;
use crate::domain::room::{LeaseRepository, RoomRepository};

use super::building_repository::SeaOrmBuildingRepository;
use super::lease_repository::SeaOrmLeaseRepository;
use super::revenue_repository::SeaOrmRevenueRepository;
use super::room_repository::SeaOrmRoomRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let rooms = repos.rooms().find_by_building(1).await?;
/// let last = repos.revenue().find_recent(1).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    buildings: SeaOrmBuildingRepository,
    rooms: SeaOrmRoomRepository,
    leases: SeaOrmLeaseRepository,
    revenue: SeaOrmRevenueRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            buildings: SeaOrmBuildingRepository::new(db.clone()),
            rooms: SeaOrmRoomRepository::new(db.clone()),
            leases: SeaOrmLeaseRepository::new(db.clone()),
            revenue: SeaOrmRevenueRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn buildings(&self) -> &dyn BuildingRepository {
        &self.buildings
    }

    fn rooms(&self) -> &dyn RoomRepository {
        &self.rooms
    }

    fn leases(&self) -> &dyn LeaseRepository {
        &self.leases
    }

    fn revenue(&self) -> &dyn RevenueRepository {
        &self.revenue
    }
}
