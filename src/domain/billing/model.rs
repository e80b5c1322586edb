//! Bill and billing-period types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Calendar month a bill or revenue snapshot belongs to, shown as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodKey {
    year: i32,
    month: u32,
}

impl PeriodKey {
    pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::Validation(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn of(instant: DateTime<Utc>) -> Self {
        Self::from_date(instant.date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for PeriodKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::Validation(format!("invalid period '{}', expected YYYY-MM", s));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || month.len() != 2 || !digits(year) || !digits(month) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.to_string()
    }
}

/// Amount owed for one room in one period.
///
/// Derived from a room snapshot and the tariffs; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub rent_amount: Decimal,
    pub water_units: i64,
    pub water_cost: Decimal,
    pub electric_units: i64,
    pub electric_cost: Decimal,
    pub total_amount: Decimal,
    pub period_key: PeriodKey,
    pub due_date: NaiveDate,
}

impl Bill {
    pub fn utilities_total(&self) -> Decimal {
        self.water_cost + self.electric_cost
    }
}

/// Format an amount as e.g. `8250.00 THB`.
pub fn format_money(amount: Decimal, currency: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2} {}", rounded, currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn period_key_formats_with_zero_padded_month() {
        let key = PeriodKey::of(Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 0).unwrap());
        assert_eq!(key.to_string(), "2024-03");
    }

    #[test]
    fn period_key_round_trips_through_string() {
        let key: PeriodKey = "2023-11".parse().unwrap();
        assert_eq!(key.year(), 2023);
        assert_eq!(key.month(), 11);
        assert_eq!(String::from(key), "2023-11");
    }

    #[test]
    fn malformed_period_keys_are_rejected() {
        for bad in [
            "2024-13", "2024-00", "24-01", "2024/01", "2024-1", "abcd-ef", "2024-+5", "+024-05",
        ] {
            assert!(bad.parse::<PeriodKey>().is_err(), "{bad}");
        }
    }

    #[test]
    fn previous_wraps_across_years() {
        let jan: PeriodKey = "2024-01".parse().unwrap();
        assert_eq!(jan.previous().to_string(), "2023-12");
        let jul: PeriodKey = "2024-07".parse().unwrap();
        assert_eq!(jul.previous().to_string(), "2024-06");
    }

    #[test]
    fn period_keys_order_chronologically() {
        let a: PeriodKey = "2023-12".parse().unwrap();
        let b: PeriodKey = "2024-01".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn format_money_uses_two_decimals() {
        assert_eq!(format_money(Decimal::from(8250), "THB"), "8250.00 THB");
        assert_eq!(format_money(Decimal::new(55555, 3), "THB"), "55.56 THB");
    }
}
