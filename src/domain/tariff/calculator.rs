//! Tiered utility cost

use rust_decimal::Decimal;

use super::model::UtilityTariff;

/// Cost of `units_consumed` under `tariff`.
///
/// Zero usage costs nothing. Usage up to the tariff's minimum units is
/// charged the flat minimum; anything above adds `rate_per_unit` for each
/// extra unit. Callers clamp meter deltas before calling, so a negative
/// count is treated like zero.
///
/// A validated tariff cannot overflow for any `i64` count. An unvalidated
/// one saturates at `Decimal::MAX` instead of panicking.
pub fn cost(units_consumed: i64, tariff: &UtilityTariff) -> Decimal {
    if units_consumed <= 0 {
        return Decimal::ZERO;
    }
    if units_consumed <= tariff.minimum_units {
        return tariff.minimum_charge;
    }

    let extra_units = units_consumed.saturating_sub(tariff.minimum_units);
    Decimal::from(extra_units)
        .checked_mul(tariff.rate_per_unit)
        .and_then(|extra| extra.checked_add(tariff.minimum_charge))
        .unwrap_or(Decimal::MAX)
}
