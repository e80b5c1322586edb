//! Revenue aggregation across rooms

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::model::{RevenueBreakdown, RevenueChange, RevenueRecord};
use crate::domain::billing::{compose_bill, PeriodKey};
use crate::domain::room::RoomSnapshot;
use crate::domain::tariff::TariffConfiguration;

/// Sum of every billable room's total. Vacant rooms contribute nothing.
pub fn current_revenue(
    rooms: &[RoomSnapshot],
    tariffs: &TariffConfiguration,
    now: DateTime<Utc>,
) -> Decimal {
    rooms
        .iter()
        .filter_map(|room| compose_bill(room, tariffs, now))
        .map(|bill| bill.total_amount)
        .sum()
}

/// Same traversal as [`current_revenue`], keeping rent, water and electric
/// subtotals apart.
pub fn revenue_breakdown(
    rooms: &[RoomSnapshot],
    tariffs: &TariffConfiguration,
    now: DateTime<Utc>,
) -> RevenueBreakdown {
    let mut breakdown = RevenueBreakdown::empty(PeriodKey::of(now));
    for bill in rooms.iter().filter_map(|room| compose_bill(room, tariffs, now)) {
        breakdown.add(&bill);
    }
    breakdown
}

/// Per-building breakdowns, keyed by building id.
///
/// Buildings whose rooms are all vacant still appear, with zero totals.
pub fn breakdown_by_building(
    rooms: &[RoomSnapshot],
    tariffs: &TariffConfiguration,
    now: DateTime<Utc>,
) -> BTreeMap<i32, RevenueBreakdown> {
    let period = PeriodKey::of(now);
    let mut buildings: BTreeMap<i32, RevenueBreakdown> = BTreeMap::new();

    for room in rooms {
        let entry = buildings
            .entry(room.building_id)
            .or_insert_with(|| RevenueBreakdown::empty(period));
        if let Some(bill) = compose_bill(room, tariffs, now) {
            entry.add(&bill);
        }
    }
    buildings
}

/// Change of `current` against the baseline record.
///
/// A missing baseline counts as zero. With a zero baseline the percentage
/// is reported as 0 rather than infinite.
pub fn revenue_change(current: Decimal, previous: Option<&RevenueRecord>) -> RevenueChange {
    let baseline = previous.map(|r| r.total_revenue).unwrap_or(Decimal::ZERO);
    let absolute_change = current - baseline;

    let percentage_change = if baseline.is_zero() {
        Decimal::ZERO
    } else {
        absolute_change / baseline * Decimal::ONE_HUNDRED
    };

    RevenueChange {
        absolute_change,
        percentage_change,
    }
}
