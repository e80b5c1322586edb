//! Room & lease repository interfaces

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{Lease, MeterPair, NewRoom, NewTenant, RoomSnapshot};
use crate::domain::DomainResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room: NewRoom) -> DomainResult<RoomSnapshot>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<RoomSnapshot>>;
    async fn find_all(&self) -> DomainResult<Vec<RoomSnapshot>>;
    async fn find_by_building(&self, building_id: i32) -> DomainResult<Vec<RoomSnapshot>>;
    async fn update_meters(
        &self,
        room_id: i32,
        water: MeterPair,
        electric: MeterPair,
    ) -> DomainResult<()>;
    /// Set only the given current readings in one write; `None` leaves
    /// that column untouched.
    async fn update_current_readings(
        &self,
        room_id: i32,
        water: Option<i64>,
        electric: Option<i64>,
    ) -> DomainResult<()>;
}

#[async_trait]
pub trait LeaseRepository: Send + Sync {
    /// Create the tenant and an active lease, marking the room occupied.
    async fn assign(&self, room_id: i32, tenant: NewTenant) -> DomainResult<Lease>;
    /// End the room's active tenancy. Returns `false` if it was already vacant.
    async fn end_active(&self, room_id: i32, end_date: NaiveDate) -> DomainResult<bool>;
}
