//! Bill composition

use chrono::{DateTime, Duration, Utc};

use super::model::{Bill, PeriodKey};
use crate::domain::room::RoomSnapshot;
use crate::domain::tariff::{cost, TariffConfiguration};

/// Days between bill generation and payment due date.
pub const DUE_IN_DAYS: i64 = 5;

/// Compose the bill for `room` at `now`.
///
/// Returns `None` for rooms without an active tenancy; vacant rooms have
/// nothing to bill. The lease's rent wins over the room's base price.
/// Pure: the same inputs always give the same bill.
pub fn compose_bill(
    room: &RoomSnapshot,
    tariffs: &TariffConfiguration,
    now: DateTime<Utc>,
) -> Option<Bill> {
    let lease = room.occupancy.lease()?;

    let rent_amount = lease.monthly_rent.unwrap_or(room.rent_price);

    let water_units = room.water.units_consumed();
    let water_cost = cost(water_units, tariffs.water());

    let electric_units = room.electric.units_consumed();
    let electric_cost = cost(electric_units, tariffs.electric());

    Some(Bill {
        rent_amount,
        water_units,
        water_cost,
        electric_units,
        electric_cost,
        total_amount: rent_amount + water_cost + electric_cost,
        period_key: PeriodKey::of(now),
        due_date: (now + Duration::days(DUE_IN_DAYS)).date_naive(),
    })
}
