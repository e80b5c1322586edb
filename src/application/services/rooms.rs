//! Room service: buildings, rooms, tenancy and meter readings
//!
//! Every change that can move revenue is followed by a revenue refresh.
//! A failed refresh is logged; the change itself stands.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::revenue::RevenueService;
use crate::domain::building::{Building, NewBuilding};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::room::{Lease, NewRoom, NewTenant, RoomSnapshot};
use crate::domain::tariff::{MAX_AMOUNT, MAX_UNITS};
use crate::domain::{DomainError, DomainResult};

fn check_reading(value: i64) -> DomainResult<()> {
    if value < 0 {
        return Err(DomainError::Validation(
            "meter readings must not be negative".to_string(),
        ));
    }
    if value > MAX_UNITS {
        return Err(DomainError::Validation(format!(
            "meter reading {} is above the maximum of {}",
            value, MAX_UNITS
        )));
    }
    Ok(())
}

fn check_rent(rent: Decimal, what: &str) -> DomainResult<()> {
    if rent < Decimal::ZERO {
        return Err(DomainError::Validation(format!("{} must not be negative", what)));
    }
    if rent > Decimal::from(MAX_AMOUNT) {
        return Err(DomainError::Validation(format!(
            "{} is above the maximum of {}",
            what, MAX_AMOUNT
        )));
    }
    Ok(())
}

/// New meter values; `None` leaves that meter unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct MeterReadings {
    pub water: Option<i64>,
    pub electric: Option<i64>,
}

pub struct RoomService {
    repos: Arc<dyn RepositoryProvider>,
    revenue: Arc<RevenueService>,
}

impl RoomService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, revenue: Arc<RevenueService>) -> Self {
        Self { repos, revenue }
    }

    async fn after_change(&self, now: DateTime<Utc>) {
        if let Err(e) = self.revenue.refresh(now).await {
            warn!(error = %e, "Revenue refresh after room change failed");
        }
    }

    async fn existing_room(&self, room_id: i32) -> DomainResult<RoomSnapshot> {
        self.repos
            .rooms()
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Room", "id", room_id))
    }

    // ── Buildings ──────────────────────────────────────────────

    pub async fn add_building(&self, building: NewBuilding) -> DomainResult<Building> {
        if building.name.trim().is_empty() {
            return Err(DomainError::Validation(
                "building name must not be empty".to_string(),
            ));
        }
        self.repos.buildings().create(building).await
    }

    pub async fn list_buildings(&self) -> DomainResult<Vec<Building>> {
        self.repos.buildings().find_all().await
    }

    // ── Rooms ──────────────────────────────────────────────────

    pub async fn add_room(&self, room: NewRoom, now: DateTime<Utc>) -> DomainResult<RoomSnapshot> {
        if room.room_number.trim().is_empty() {
            return Err(DomainError::Validation(
                "room number must not be empty".to_string(),
            ));
        }
        check_rent(room.rent_price, "rent price")?;
        check_reading(room.water_reading)?;
        check_reading(room.electric_reading)?;
        if self.repos.buildings().find_by_id(room.building_id).await?.is_none() {
            return Err(DomainError::not_found("Building", "id", room.building_id));
        }

        let created = self.repos.rooms().create(room).await?;
        self.after_change(now).await;
        Ok(created)
    }

    pub async fn list_rooms(&self, building_id: Option<i32>) -> DomainResult<Vec<RoomSnapshot>> {
        match building_id {
            Some(id) => self.repos.rooms().find_by_building(id).await,
            None => self.repos.rooms().find_all().await,
        }
    }

    // ── Tenancy ────────────────────────────────────────────────

    pub async fn assign_tenant(
        &self,
        room_id: i32,
        tenant: NewTenant,
        now: DateTime<Utc>,
    ) -> DomainResult<Lease> {
        if tenant.full_name.trim().is_empty() {
            return Err(DomainError::Validation(
                "tenant name must not be empty".to_string(),
            ));
        }
        if let Some(rent) = tenant.monthly_rent {
            check_rent(rent, "monthly rent")?;
        }

        let lease = self.repos.leases().assign(room_id, tenant).await?;
        info!(room_id, tenant = %lease.tenant_name, "Room leased");
        self.after_change(now).await;
        Ok(lease)
    }

    /// End the room's tenancy as of `now`. Returns `false` if it was vacant.
    pub async fn vacate_room(&self, room_id: i32, now: DateTime<Utc>) -> DomainResult<bool> {
        let vacated = self
            .repos
            .leases()
            .end_active(room_id, now.date_naive())
            .await?;
        if vacated {
            self.after_change(now).await;
        }
        Ok(vacated)
    }

    // ── Meters ─────────────────────────────────────────────────

    /// Set current readings. Previous readings stay as the cycle baseline.
    ///
    /// Only the given meters are written, so concurrent updates to
    /// different meters of one room do not overwrite each other.
    pub async fn record_readings(
        &self,
        room_id: i32,
        readings: MeterReadings,
        now: DateTime<Utc>,
    ) -> DomainResult<RoomSnapshot> {
        for value in [readings.water, readings.electric].into_iter().flatten() {
            check_reading(value)?;
        }

        self.repos
            .rooms()
            .update_current_readings(room_id, readings.water, readings.electric)
            .await?;

        let room = self.existing_room(room_id).await?;
        if room.water.current < room.water.previous || room.electric.current < room.electric.previous
        {
            warn!(
                room_id,
                water = ?room.water,
                electric = ?room.electric,
                "Reading below previous, usage will count as zero"
            );
        }

        self.after_change(now).await;
        Ok(room)
    }

    /// Roll every room's current readings into the previous ones.
    ///
    /// Returns the number of rooms rolled.
    pub async fn start_new_cycle(
        &self,
        building_id: Option<i32>,
        now: DateTime<Utc>,
    ) -> DomainResult<usize> {
        let rooms = self.list_rooms(building_id).await?;
        for room in &rooms {
            self.repos
                .rooms()
                .update_meters(room.id, room.water.rolled(), room.electric.rolled())
                .await?;
        }
        info!(rooms = rooms.len(), ?building_id, "Billing cycle started");
        self.after_change(now).await;
        Ok(rooms.len())
    }
}
