//! Revenue history repository interface

use async_trait::async_trait;

use super::model::RevenueRecord;
use crate::domain::billing::PeriodKey;
use crate::domain::DomainResult;

#[async_trait]
pub trait RevenueRepository: Send + Sync {
    async fn find_by_period(&self, period: PeriodKey) -> DomainResult<Option<RevenueRecord>>;
    /// Insert or fully replace the record for `record.period_key`.
    async fn upsert(&self, record: RevenueRecord) -> DomainResult<()>;
    /// Most recent records first.
    async fn find_recent(&self, limit: u64) -> DomainResult<Vec<RevenueRecord>>;
}
