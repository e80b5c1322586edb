//! In-memory repositories for development and testing

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;

use crate::domain::billing::PeriodKey;
use crate::domain::building::{Building, BuildingRepository, NewBuilding};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::revenue::{RevenueRecord, RevenueRepository};
use crate::domain::room::{
    Lease, LeaseRepository, MeterPair, NewRoom, NewTenant, Occupancy, RoomRepository,
    RoomSnapshot,
};
use crate::domain::{DomainError, DomainResult};

/// All repositories backed by concurrent maps.
///
/// One value serves as every repository; the provider accessors hand out
/// `self`.
pub struct InMemoryRepositoryProvider {
    buildings: DashMap<i32, Building>,
    rooms: DashMap<i32, RoomSnapshot>,
    revenue: DashMap<PeriodKey, RevenueRecord>,
    building_counter: AtomicI32,
    room_counter: AtomicI32,
    tenant_counter: AtomicI32,
    lease_counter: AtomicI32,
    fail_revenue_writes: AtomicBool,
    fail_revenue_reads: AtomicBool,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self {
            buildings: DashMap::new(),
            rooms: DashMap::new(),
            revenue: DashMap::new(),
            building_counter: AtomicI32::new(1),
            room_counter: AtomicI32::new(1),
            tenant_counter: AtomicI32::new(1),
            lease_counter: AtomicI32::new(1),
            fail_revenue_writes: AtomicBool::new(false),
            fail_revenue_reads: AtomicBool::new(false),
        }
    }

    /// Make every revenue upsert fail with a persistence error.
    pub fn set_fail_revenue_writes(&self, fail: bool) {
        self.fail_revenue_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every revenue lookup by period fail with a persistence error.
    pub fn set_fail_revenue_reads(&self, fail: bool) {
        self.fail_revenue_reads.store(fail, Ordering::SeqCst);
    }

    /// Store a room exactly as given, bypassing id assignment.
    pub fn insert_room(&self, room: RoomSnapshot) {
        self.room_counter.fetch_max(room.id + 1, Ordering::SeqCst);
        self.rooms.insert(room.id, room);
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn buildings(&self) -> &dyn BuildingRepository {
        self
    }

    fn rooms(&self) -> &dyn RoomRepository {
        self
    }

    fn leases(&self) -> &dyn LeaseRepository {
        self
    }

    fn revenue(&self) -> &dyn RevenueRepository {
        self
    }
}

fn sorted_rooms(mut rooms: Vec<RoomSnapshot>) -> Vec<RoomSnapshot> {
    rooms.sort_by(|a, b| {
        (a.building_id, &a.room_number).cmp(&(b.building_id, &b.room_number))
    });
    rooms
}

#[async_trait]
impl BuildingRepository for InMemoryRepositoryProvider {
    async fn create(&self, b: NewBuilding) -> DomainResult<Building> {
        let id = self.building_counter.fetch_add(1, Ordering::SeqCst);
        let building = Building {
            id,
            name: b.name,
            address: b.address,
            created_at: Utc::now(),
        };
        self.buildings.insert(id, building.clone());
        Ok(building)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Building>> {
        Ok(self.buildings.get(&id).map(|b| b.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Building>> {
        let mut all: Vec<Building> = self.buildings.iter().map(|b| b.clone()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}

#[async_trait]
impl RoomRepository for InMemoryRepositoryProvider {
    async fn create(&self, r: NewRoom) -> DomainResult<RoomSnapshot> {
        if !self.buildings.contains_key(&r.building_id) {
            return Err(DomainError::not_found("Building", "id", r.building_id));
        }
        let duplicate = self
            .rooms
            .iter()
            .any(|room| room.building_id == r.building_id && room.room_number == r.room_number);
        if duplicate {
            return Err(DomainError::Validation(format!(
                "room {} already exists in building {}",
                r.room_number, r.building_id
            )));
        }

        let id = self.room_counter.fetch_add(1, Ordering::SeqCst);
        let room = RoomSnapshot {
            id,
            building_id: r.building_id,
            room_number: r.room_number,
            rent_price: r.rent_price,
            occupancy: Occupancy::Vacant,
            water: MeterPair::new(r.water_reading, r.water_reading),
            electric: MeterPair::new(r.electric_reading, r.electric_reading),
        };
        self.rooms.insert(id, room.clone());
        Ok(room)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<RoomSnapshot>> {
        Ok(self.rooms.get(&id).map(|r| r.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<RoomSnapshot>> {
        Ok(sorted_rooms(self.rooms.iter().map(|r| r.clone()).collect()))
    }

    async fn find_by_building(&self, building_id: i32) -> DomainResult<Vec<RoomSnapshot>> {
        Ok(sorted_rooms(
            self.rooms
                .iter()
                .filter(|r| r.building_id == building_id)
                .map(|r| r.clone())
                .collect(),
        ))
    }

    async fn update_meters(
        &self,
        room_id: i32,
        water: MeterPair,
        electric: MeterPair,
    ) -> DomainResult<()> {
        let mut room = self
            .rooms
            .get_mut(&room_id)
            .ok_or_else(|| DomainError::not_found("Room", "id", room_id))?;
        room.water = water;
        room.electric = electric;
        Ok(())
    }

    async fn update_current_readings(
        &self,
        room_id: i32,
        water: Option<i64>,
        electric: Option<i64>,
    ) -> DomainResult<()> {
        let mut room = self
            .rooms
            .get_mut(&room_id)
            .ok_or_else(|| DomainError::not_found("Room", "id", room_id))?;
        if let Some(value) = water {
            room.water.current = value;
        }
        if let Some(value) = electric {
            room.electric.current = value;
        }
        Ok(())
    }
}

#[async_trait]
impl LeaseRepository for InMemoryRepositoryProvider {
    async fn assign(&self, room_id: i32, t: NewTenant) -> DomainResult<Lease> {
        let mut room = self
            .rooms
            .get_mut(&room_id)
            .ok_or_else(|| DomainError::not_found("Room", "id", room_id))?;
        if room.occupancy.is_occupied() {
            return Err(DomainError::Validation(format!(
                "room {} is already occupied",
                room.room_number
            )));
        }

        let lease = Lease {
            lease_id: Some(self.lease_counter.fetch_add(1, Ordering::SeqCst)),
            tenant_id: Some(self.tenant_counter.fetch_add(1, Ordering::SeqCst)),
            tenant_name: t.full_name,
            monthly_rent: t.monthly_rent,
            started_on: Some(t.start_date),
        };
        room.occupancy = Occupancy::Leased(lease.clone());
        Ok(lease)
    }

    async fn end_active(&self, room_id: i32, _end_date: NaiveDate) -> DomainResult<bool> {
        let mut room = self
            .rooms
            .get_mut(&room_id)
            .ok_or_else(|| DomainError::not_found("Room", "id", room_id))?;
        let was_occupied = room.occupancy.is_occupied();
        room.occupancy = Occupancy::Vacant;
        Ok(was_occupied)
    }
}

#[async_trait]
impl RevenueRepository for InMemoryRepositoryProvider {
    async fn find_by_period(&self, period: PeriodKey) -> DomainResult<Option<RevenueRecord>> {
        if self.fail_revenue_reads.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence(
                "revenue store unavailable".to_string(),
            ));
        }
        Ok(self.revenue.get(&period).map(|r| r.clone()))
    }

    async fn upsert(&self, record: RevenueRecord) -> DomainResult<()> {
        if self.fail_revenue_writes.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence(
                "revenue store unavailable".to_string(),
            ));
        }
        self.revenue.insert(record.period_key, record);
        Ok(())
    }

    async fn find_recent(&self, limit: u64) -> DomainResult<Vec<RevenueRecord>> {
        let mut all: Vec<RevenueRecord> = self.revenue.iter().map(|r| r.clone()).collect();
        all.sort_by(|a, b| b.period_key.cmp(&a.period_key));
        all.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    async fn with_room() -> (InMemoryRepositoryProvider, i32) {
        let repos = InMemoryRepositoryProvider::new();
        let b = repos
            .buildings()
            .create(NewBuilding {
                name: "Riverside".into(),
                address: None,
            })
            .await
            .unwrap();
        let room = repos
            .rooms()
            .create(NewRoom {
                building_id: b.id,
                room_number: "101".into(),
                rent_price: Decimal::from(8000),
                water_reading: 0,
                electric_reading: 0,
            })
            .await
            .unwrap();
        (repos, room.id)
    }

    #[tokio::test]
    async fn room_in_unknown_building_is_rejected() {
        let repos = InMemoryRepositoryProvider::new();
        let err = repos
            .rooms()
            .create(NewRoom {
                building_id: 77,
                room_number: "1".into(),
                rent_price: Decimal::ZERO,
                water_reading: 0,
                electric_reading: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn duplicate_room_number_is_rejected() {
        let (repos, room_id) = with_room().await;
        let building_id = repos.rooms().find_by_id(room_id).await.unwrap().unwrap().building_id;
        let err = repos
            .rooms()
            .create(NewRoom {
                building_id,
                room_number: "101".into(),
                rent_price: Decimal::ZERO,
                water_reading: 0,
                electric_reading: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn lease_lifecycle() {
        let (repos, room_id) = with_room().await;
        let tenant = NewTenant {
            full_name: "Anong".into(),
            phone: None,
            monthly_rent: None,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        };
        repos.leases().assign(room_id, tenant.clone()).await.unwrap();
        assert!(repos.leases().assign(room_id, tenant).await.is_err());

        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(repos.leases().end_active(room_id, today).await.unwrap());
        assert!(!repos.leases().end_active(room_id, today).await.unwrap());
    }

    #[tokio::test]
    async fn failing_revenue_writes_surface_as_persistence_errors() {
        let repos = InMemoryRepositoryProvider::new();
        repos.set_fail_revenue_writes(true);
        let record = crate::domain::revenue::RevenueBreakdown::empty("2024-05".parse().unwrap())
            .into_record(&Default::default(), Utc::now());
        let err = repos.revenue().upsert(record).await.unwrap_err();
        assert!(err.is_transient());
    }
}
