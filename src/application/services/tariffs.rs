//! Tariff service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::revenue::RevenueService;
use crate::domain::tariff::{TariffConfiguration, TariffStore, UtilityKind, UtilityTariff};
use crate::domain::DomainResult;

pub struct TariffService {
    store: Arc<dyn TariffStore>,
    revenue: Arc<RevenueService>,
}

impl TariffService {
    pub fn new(store: Arc<dyn TariffStore>, revenue: Arc<RevenueService>) -> Self {
        Self { store, revenue }
    }

    pub fn current(&self) -> DomainResult<TariffConfiguration> {
        self.store.load()
    }

    /// Replace one utility's tariff and recompute revenue under it.
    ///
    /// Invalid tariffs are rejected before anything is saved.
    pub async fn update(
        &self,
        utility: UtilityKind,
        tariff: UtilityTariff,
        now: DateTime<Utc>,
    ) -> DomainResult<TariffConfiguration> {
        let next = self.store.load()?.with(utility, tariff)?;
        self.store.save(&next)?;
        info!(
            %utility,
            rate = %next.get(utility).rate_per_unit,
            minimum_charge = %next.get(utility).minimum_charge,
            minimum_units = next.get(utility).minimum_units,
            "Tariff updated"
        );
        self.after_change(now).await;
        Ok(next)
    }

    /// Restore the built-in tariffs.
    pub async fn reset(&self, now: DateTime<Utc>) -> DomainResult<TariffConfiguration> {
        let defaults = TariffConfiguration::default();
        self.store.save(&defaults)?;
        info!("Tariffs reset to defaults");
        self.after_change(now).await;
        Ok(defaults)
    }

    async fn after_change(&self, now: DateTime<Utc>) {
        if let Err(e) = self.revenue.refresh(now).await {
            warn!(error = %e, "Revenue refresh after tariff change failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    use crate::application::services::test_support::Fixture;
    use crate::domain::DomainError;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn update_saves_and_reprices_revenue() {
        let fx = Fixture::with_billable_room().await;
        let electric = UtilityTariff::new(Decimal::new(85, 1), Decimal::from(100), 2);

        let next = fx
            .tariff_service()
            .update(UtilityKind::Electric, electric.clone(), now())
            .await
            .unwrap();
        assert_eq!(next.electric(), &electric);
        assert_eq!(fx.tariffs.load().unwrap(), next);

        // 3 units: 100 minimum + 1 extra unit at 8.5
        let saved = fx.revenue().history(1).await.unwrap();
        assert_eq!(saved[0].electric_subtotal, Decimal::new(1085, 1));
        assert_eq!(saved[0].tariffs_used, next);
    }

    #[tokio::test]
    async fn invalid_tariff_is_not_saved() {
        let fx = Fixture::with_billable_room().await;
        let err = fx
            .tariff_service()
            .update(
                UtilityKind::Water,
                UtilityTariff::new(Decimal::from(10), Decimal::from(-5), 10),
                now(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::InvalidTariff {
                utility: UtilityKind::Water,
                ..
            }
        ));
        assert_eq!(fx.tariffs.load().unwrap(), TariffConfiguration::default());
        assert!(fx.revenue().history(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reset_restores_defaults() {
        let fx = Fixture::with_billable_room().await;
        let service = fx.tariff_service();
        service
            .update(
                UtilityKind::Water,
                UtilityTariff::new(Decimal::from(20), Decimal::from(0), 0),
                now(),
            )
            .await
            .unwrap();

        let restored = service.reset(now()).await.unwrap();
        assert_eq!(restored, TariffConfiguration::default());
        assert_eq!(service.current().unwrap(), TariffConfiguration::default());
    }
}
