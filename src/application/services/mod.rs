//! Application services

mod billing;
mod revenue;
mod rooms;
mod tariffs;

pub use billing::{BillingService, RoomBill};
pub use revenue::{RevenueReport, RevenueService};
pub use rooms::{MeterReadings, RoomService};
pub use tariffs::TariffService;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::{BillingService, RevenueService, RoomService, TariffService};
    use crate::domain::building::NewBuilding;
    use crate::domain::repositories::RepositoryProvider;
    use crate::domain::room::{MeterPair, NewRoom, NewTenant};
    use crate::infrastructure::{InMemoryRepositoryProvider, InMemoryTariffStore};
    use crate::shared::retry::RetryConfig;

    /// In-memory repositories and tariffs with one building.
    pub struct Fixture {
        pub repos: Arc<InMemoryRepositoryProvider>,
        pub tariffs: Arc<InMemoryTariffStore>,
        pub building_id: i32,
        pub room_id: i32,
    }

    impl Fixture {
        pub async fn new() -> Self {
            let repos = Arc::new(InMemoryRepositoryProvider::new());
            let building = repos
                .buildings()
                .create(NewBuilding {
                    name: "Riverside".into(),
                    address: Some("1 River Rd".into()),
                })
                .await
                .unwrap();
            Self {
                repos,
                tariffs: Arc::new(InMemoryTariffStore::new()),
                building_id: building.id,
                room_id: 0,
            }
        }

        /// Room 101 leased to Anong at 8000 rent, 15 water and 3
        /// electric units used: 8250 under default tariffs.
        pub async fn with_billable_room() -> Self {
            let mut fx = Self::new().await;
            let room_id = fx.add_room("101").await;
            fx.repos
                .rooms()
                .update_meters(room_id, MeterPair::new(200, 215), MeterPair::new(1000, 1003))
                .await
                .unwrap();
            fx.repos
                .leases()
                .assign(
                    room_id,
                    NewTenant {
                        full_name: "Anong".into(),
                        phone: None,
                        monthly_rent: None,
                        start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                    },
                )
                .await
                .unwrap();
            fx.room_id = room_id;
            fx
        }

        /// Vacant room at 8000 rent with zeroed meters.
        pub async fn add_room(&self, number: &str) -> i32 {
            self.repos
                .rooms()
                .create(NewRoom {
                    building_id: self.building_id,
                    room_number: number.into(),
                    rent_price: Decimal::from(8000),
                    water_reading: 0,
                    electric_reading: 0,
                })
                .await
                .unwrap()
                .id
        }

        pub fn revenue(&self) -> Arc<RevenueService> {
            Arc::new(
                RevenueService::new(self.repos.clone(), self.tariffs.clone())
                    .with_retry(RetryConfig::none()),
            )
        }

        pub fn billing(&self) -> BillingService {
            BillingService::new(self.repos.clone(), self.tariffs.clone())
        }

        pub fn rooms(&self) -> RoomService {
            RoomService::new(self.repos.clone(), self.revenue())
        }

        pub fn tariff_service(&self) -> TariffService {
            TariffService::new(self.tariffs.clone(), self.revenue())
        }
    }
}
