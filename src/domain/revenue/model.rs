//! Revenue domain entities

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::billing::{Bill, PeriodKey};
use crate::domain::tariff::TariffConfiguration;

/// Revenue for one period split by component.
///
/// `rent_subtotal + water_subtotal + electric_subtotal == total_revenue`
/// always holds: every field is accumulated from the same bills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub period_key: PeriodKey,
    pub total_revenue: Decimal,
    pub occupied_room_count: u32,
    pub rent_subtotal: Decimal,
    pub water_subtotal: Decimal,
    pub electric_subtotal: Decimal,
}

impl RevenueBreakdown {
    pub fn empty(period_key: PeriodKey) -> Self {
        Self {
            period_key,
            total_revenue: Decimal::ZERO,
            occupied_room_count: 0,
            rent_subtotal: Decimal::ZERO,
            water_subtotal: Decimal::ZERO,
            electric_subtotal: Decimal::ZERO,
        }
    }

    pub fn add(&mut self, bill: &Bill) {
        self.total_revenue += bill.total_amount;
        self.occupied_room_count += 1;
        self.rent_subtotal += bill.rent_amount;
        self.water_subtotal += bill.water_cost;
        self.electric_subtotal += bill.electric_cost;
    }

    /// Snapshot to persist for this period.
    pub fn into_record(self, tariffs: &TariffConfiguration, now: DateTime<Utc>) -> RevenueRecord {
        RevenueRecord {
            period_key: self.period_key,
            total_revenue: self.total_revenue,
            occupied_room_count: self.occupied_room_count,
            rent_subtotal: self.rent_subtotal,
            water_subtotal: self.water_subtotal,
            electric_subtotal: self.electric_subtotal,
            tariffs_used: tariffs.clone(),
            updated_at: now,
        }
    }
}

/// Persisted monthly revenue snapshot, one per period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub period_key: PeriodKey,
    pub total_revenue: Decimal,
    pub occupied_room_count: u32,
    pub rent_subtotal: Decimal,
    pub water_subtotal: Decimal,
    pub electric_subtotal: Decimal,
    /// Tariffs the figures were computed with
    pub tariffs_used: TariffConfiguration,
    pub updated_at: DateTime<Utc>,
}

/// Change of current revenue against a baseline period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueChange {
    pub absolute_change: Decimal,
    /// Percent of the baseline; 0 when the baseline is 0
    pub percentage_change: Decimal,
}

impl RevenueChange {
    /// Percentage rounded to two places for display.
    pub fn percentage_display(&self) -> String {
        let rounded = self
            .percentage_change
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("{:.2}%", rounded)
        } else {
            format!("+{:.2}%", rounded.abs())
        }
    }
}
