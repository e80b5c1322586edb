//! Billing service: bills for rooms under the operator's current tariffs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::domain::billing::{compose_bill, Bill};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::room::RoomSnapshot;
use crate::domain::tariff::{cost, TariffStore, UtilityKind};
use crate::domain::{DomainError, DomainResult};

/// Bill together with the room it was issued for
#[derive(Debug, Clone, Serialize)]
pub struct RoomBill {
    pub room_id: i32,
    pub building_id: i32,
    pub room_number: String,
    pub tenant_name: String,
    pub bill: Bill,
}

impl RoomBill {
    fn from_room(room: &RoomSnapshot, bill: Bill) -> Self {
        Self {
            room_id: room.id,
            building_id: room.building_id,
            room_number: room.room_number.clone(),
            tenant_name: room.tenant_name().unwrap_or_default().to_string(),
            bill,
        }
    }
}

pub struct BillingService {
    repos: Arc<dyn RepositoryProvider>,
    tariffs: Arc<dyn TariffStore>,
}

impl BillingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, tariffs: Arc<dyn TariffStore>) -> Self {
        Self { repos, tariffs }
    }

    /// Bill for one room; `None` when the room is vacant.
    pub async fn bill_for_room(
        &self,
        room_id: i32,
        now: DateTime<Utc>,
    ) -> DomainResult<Option<RoomBill>> {
        let room = self
            .repos
            .rooms()
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Room", "id", room_id))?;
        let tariffs = self.tariffs.load()?;

        Ok(compose_bill(&room, &tariffs, now).map(|bill| RoomBill::from_room(&room, bill)))
    }

    /// Bills for every occupied room, optionally limited to one building.
    pub async fn bills(
        &self,
        building_id: Option<i32>,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<RoomBill>> {
        let rooms = match building_id {
            Some(id) => {
                if self.repos.buildings().find_by_id(id).await?.is_none() {
                    return Err(DomainError::not_found("Building", "id", id));
                }
                self.repos.rooms().find_by_building(id).await?
            }
            None => self.repos.rooms().find_all().await?,
        };
        let tariffs = self.tariffs.load()?;

        let bills: Vec<RoomBill> = rooms
            .iter()
            .filter_map(|room| {
                compose_bill(room, &tariffs, now).map(|bill| RoomBill::from_room(room, bill))
            })
            .collect();
        debug!(rooms = rooms.len(), billed = bills.len(), "Bills composed");
        Ok(bills)
    }

    /// What `units` of a utility would cost under the current tariffs.
    pub fn cost_preview(&self, utility: UtilityKind, units: i64) -> DomainResult<Decimal> {
        let tariffs = self.tariffs.load()?;
        Ok(cost(units.max(0), tariffs.get(utility)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    use crate::application::services::test_support::Fixture;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn occupied_room_is_billed() {
        let fx = Fixture::with_billable_room().await;
        let bill = fx.billing().bill_for_room(fx.room_id, now()).await.unwrap().unwrap();

        assert_eq!(bill.tenant_name, "Anong");
        assert_eq!(bill.bill.rent_amount, Decimal::from(8000));
        assert_eq!(bill.bill.water_cost, Decimal::from(150));
        assert_eq!(bill.bill.electric_cost, Decimal::from(100));
        assert_eq!(bill.bill.total_amount, Decimal::from(8250));
        assert_eq!(bill.bill.due_date, NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
    }

    #[tokio::test]
    async fn vacant_room_has_no_bill() {
        let fx = Fixture::with_billable_room().await;
        let vacant = fx.add_room("102").await;
        assert!(fx.billing().bill_for_room(vacant, now()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_room_is_not_found() {
        let fx = Fixture::with_billable_room().await;
        let err = fx.billing().bill_for_room(999, now()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn bills_skip_vacant_rooms() {
        let fx = Fixture::with_billable_room().await;
        fx.add_room("102").await;

        let all = fx.billing().bills(None, now()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].room_number, "101");

        let scoped = fx.billing().bills(Some(fx.building_id), now()).await.unwrap();
        assert_eq!(scoped.len(), 1);
    }

    #[tokio::test]
    async fn bills_for_unknown_building_is_not_found() {
        let fx = Fixture::with_billable_room().await;
        let err = fx.billing().bills(Some(404), now()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn cost_preview_uses_saved_tariffs() {
        let fx = Fixture::with_billable_room().await;
        let billing = fx.billing();
        assert_eq!(billing.cost_preview(UtilityKind::Water, 15).unwrap(), Decimal::from(150));
        assert_eq!(billing.cost_preview(UtilityKind::Water, 5).unwrap(), Decimal::from(100));
        assert_eq!(billing.cost_preview(UtilityKind::Electric, 0).unwrap(), Decimal::ZERO);
        assert_eq!(billing.cost_preview(UtilityKind::Electric, -4).unwrap(), Decimal::ZERO);
    }
}
