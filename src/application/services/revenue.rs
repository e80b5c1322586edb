//! Revenue service: recompute, compare and persist the monthly snapshot

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::billing::PeriodKey;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::revenue::{
    breakdown_by_building, revenue_breakdown, revenue_change, RevenueBreakdown, RevenueChange,
    RevenueRecord,
};
use crate::domain::tariff::TariffStore;
use crate::domain::{DomainError, DomainResult};
use crate::shared::retry::{retry_with_backoff, RetryConfig};

/// Outcome of a revenue refresh
#[derive(Debug, Clone, Serialize)]
pub struct RevenueReport {
    pub breakdown: RevenueBreakdown,
    /// Per building, keyed by building id
    pub buildings: BTreeMap<i32, RevenueBreakdown>,
    /// Record of the previous period, if one was saved
    pub previous: Option<RevenueRecord>,
    pub change: RevenueChange,
    /// Whether the snapshot reached the revenue history
    pub persisted: bool,
}

pub struct RevenueService {
    repos: Arc<dyn RepositoryProvider>,
    tariffs: Arc<dyn TariffStore>,
    retry: RetryConfig,
}

impl RevenueService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, tariffs: Arc<dyn TariffStore>) -> Self {
        Self {
            repos,
            tariffs,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Recompute revenue for the period containing `now` and upsert it.
    ///
    /// A failed upsert is logged and reported through `persisted`; the
    /// computed figures are returned either way. An unreadable previous
    /// period is treated like a missing one.
    pub async fn refresh(&self, now: DateTime<Utc>) -> DomainResult<RevenueReport> {
        let tariffs = self.tariffs.load()?;
        let rooms = self.repos.rooms().find_all().await?;

        let breakdown = revenue_breakdown(&rooms, &tariffs, now);
        let buildings = breakdown_by_building(&rooms, &tariffs, now);
        let baseline_period = breakdown.period_key.previous();
        let previous = match self.repos.revenue().find_by_period(baseline_period).await {
            Ok(previous) => previous,
            Err(e) => {
                warn!(
                    period = %baseline_period,
                    error = %e,
                    "Previous revenue unavailable, using no baseline"
                );
                None
            }
        };
        let change = revenue_change(breakdown.total_revenue, previous.as_ref());

        let record = breakdown.clone().into_record(&tariffs, now);
        let repos = &self.repos;
        let saved = retry_with_backoff(
            self.retry.clone(),
            || repos.revenue().upsert(record.clone()),
            DomainError::is_transient,
            "upsert_revenue_record",
        )
        .await;

        let persisted = match saved {
            Ok(()) => true,
            Err(e) => {
                warn!(period = %breakdown.period_key, error = %e, "Revenue snapshot not saved");
                false
            }
        };

        info!(
            period = %breakdown.period_key,
            total = %breakdown.total_revenue,
            occupied_rooms = breakdown.occupied_room_count,
            change = %change.absolute_change,
            persisted,
            "Revenue refreshed"
        );

        Ok(RevenueReport {
            breakdown,
            buildings,
            previous,
            change,
            persisted,
        })
    }

    /// Saved snapshots, newest first
    pub async fn history(&self, limit: u64) -> DomainResult<Vec<RevenueRecord>> {
        self.repos.revenue().find_recent(limit).await
    }

    pub async fn record(&self, period: PeriodKey) -> DomainResult<Option<RevenueRecord>> {
        self.repos.revenue().find_by_period(period).await
    }
}
