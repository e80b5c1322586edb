//! SeaORM implementation of RevenueRepository

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};
use tracing::{debug, info};

use super::{db_err, money_from_db, money_to_db};
use crate::domain::billing::PeriodKey;
use crate::domain::revenue::{RevenueRecord, RevenueRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::revenue_history;

pub struct SeaOrmRevenueRepository {
    db: DatabaseConnection,
}

impl SeaOrmRevenueRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn corrupt(field: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::Persistence(format!("Corrupt revenue {}: {}", field, e))
}

fn model_to_domain(m: revenue_history::Model) -> DomainResult<RevenueRecord> {
    Ok(RevenueRecord {
        period_key: m.period_key.parse().map_err(|e| corrupt("period", e))?,
        total_revenue: money_from_db(&m.total_revenue)?,
        occupied_room_count: u32::try_from(m.occupied_room_count)
            .map_err(|e| corrupt("room count", e))?,
        rent_subtotal: money_from_db(&m.rent_subtotal)?,
        water_subtotal: money_from_db(&m.water_subtotal)?,
        electric_subtotal: money_from_db(&m.electric_subtotal)?,
        tariffs_used: serde_json::from_str(&m.tariffs_used).map_err(|e| corrupt("tariffs", e))?,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(r: &RevenueRecord) -> DomainResult<revenue_history::ActiveModel> {
    let tariffs =
        serde_json::to_string(&r.tariffs_used).map_err(|e| DomainError::Persistence(e.to_string()))?;
    let room_count = i32::try_from(r.occupied_room_count)
        .map_err(|e| DomainError::Validation(format!("occupied room count: {}", e)))?;

    Ok(revenue_history::ActiveModel {
        period_key: Set(r.period_key.to_string()),
        total_revenue: Set(money_to_db(r.total_revenue)),
        occupied_room_count: Set(room_count),
        rent_subtotal: Set(money_to_db(r.rent_subtotal)),
        water_subtotal: Set(money_to_db(r.water_subtotal)),
        electric_subtotal: Set(money_to_db(r.electric_subtotal)),
        tariffs_used: Set(tariffs),
        updated_at: Set(r.updated_at),
    })
}

#[async_trait]
impl RevenueRepository for SeaOrmRevenueRepository {
    async fn find_by_period(&self, period: PeriodKey) -> DomainResult<Option<RevenueRecord>> {
        revenue_history::Entity::find_by_id(period.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn upsert(&self, record: RevenueRecord) -> DomainResult<()> {
        let model = domain_to_active(&record)?;

        revenue_history::Entity::insert(model)
            .on_conflict(
                OnConflict::column(revenue_history::Column::PeriodKey)
                    .update_columns([
                        revenue_history::Column::TotalRevenue,
                        revenue_history::Column::OccupiedRoomCount,
                        revenue_history::Column::RentSubtotal,
                        revenue_history::Column::WaterSubtotal,
                        revenue_history::Column::ElectricSubtotal,
                        revenue_history::Column::TariffsUsed,
                        revenue_history::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;

        info!(
            period = %record.period_key,
            total = %record.total_revenue,
            rooms = record.occupied_room_count,
            "Revenue snapshot saved"
        );
        Ok(())
    }

    async fn find_recent(&self, limit: u64) -> DomainResult<Vec<RevenueRecord>> {
        debug!(limit, "Loading revenue history");
        // YYYY-MM sorts lexically in chronological order
        revenue_history::Entity::find()
            .order_by_desc(revenue_history::Column::PeriodKey)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use crate::domain::revenue::RevenueBreakdown;
    use crate::domain::tariff::{TariffConfiguration, UtilityKind, UtilityTariff};
    use crate::infrastructure::database::repositories::test_support::migrated_db;

    fn record(period: &str, total: i64) -> RevenueRecord {
        RevenueBreakdown {
            total_revenue: Decimal::from(total),
            occupied_room_count: 3,
            rent_subtotal: Decimal::from(total),
            ..RevenueBreakdown::empty(period.parse().unwrap())
        }
        .into_record(
            &TariffConfiguration::default(),
            Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn missing_period_is_none() {
        let repo = SeaOrmRevenueRepository::new(migrated_db().await);
        let found = repo.find_by_period("2024-05".parse().unwrap()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn upsert_round_trips_the_record() {
        let repo = SeaOrmRevenueRepository::new(migrated_db().await);
        let mut rec = record("2024-05", 0);
        rec.total_revenue = Decimal::new(8250_75, 2);
        rec.rent_subtotal = Decimal::new(8000_25, 2);
        rec.water_subtotal = Decimal::new(150_50, 2);
        rec.electric_subtotal = Decimal::from(100);
        rec.tariffs_used = TariffConfiguration::default()
            .with(
                UtilityKind::Electric,
                UtilityTariff::new(Decimal::new(85, 1), Decimal::from(100), 10),
            )
            .unwrap();

        repo.upsert(rec.clone()).await.unwrap();
        let loaded = repo.find_by_period(rec.period_key).await.unwrap().unwrap();
        assert_eq!(loaded, rec);
    }

    #[tokio::test]
    async fn second_upsert_replaces_the_first() {
        let repo = SeaOrmRevenueRepository::new(migrated_db().await);
        repo.upsert(record("2024-05", 1000)).await.unwrap();
        repo.upsert(record("2024-05", 2500)).await.unwrap();

        let all = repo.find_recent(10).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].total_revenue, Decimal::from(2500));
    }

    #[tokio::test]
    async fn recent_history_is_newest_first_and_limited() {
        let repo = SeaOrmRevenueRepository::new(migrated_db().await);
        for (period, total) in [("2023-12", 10), ("2024-02", 30), ("2024-01", 20)] {
            repo.upsert(record(period, total)).await.unwrap();
        }

        let recent = repo.find_recent(2).await.unwrap();
        let periods: Vec<String> = recent.iter().map(|r| r.period_key.to_string()).collect();
        assert_eq!(periods, ["2024-02", "2024-01"]);
    }
}
