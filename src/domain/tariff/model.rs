//! Tariff domain entities

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Upper bound for any money amount an operator can enter, in major units.
///
/// Keeps `rate * units` for every `i64` unit count inside `Decimal` range.
pub const MAX_AMOUNT: i64 = 1_000_000_000;

/// Upper bound for meter readings and unit thresholds
pub const MAX_UNITS: i64 = 1_000_000_000_000;

/// Metered utility billed on top of rent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UtilityKind {
    Water,
    Electric,
}

impl UtilityKind {
    pub const ALL: [UtilityKind; 2] = [UtilityKind::Water, UtilityKind::Electric];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Electric => "electric",
        }
    }
}

impl fmt::Display for UtilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UtilityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "water" => Ok(Self::Water),
            "electric" | "electricity" => Ok(Self::Electric),
            other => Err(DomainError::Validation(format!(
                "unknown utility '{}', expected water or electric",
                other
            ))),
        }
    }
}

/// Pricing policy for one utility.
///
/// Usage up to `minimum_units` is covered by the flat `minimum_charge`;
/// every unit above it costs `rate_per_unit`. Amounts are in major
/// currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityTariff {
    pub rate_per_unit: Decimal,
    pub minimum_charge: Decimal,
    pub minimum_units: i64,
}

impl UtilityTariff {
    pub fn new(rate_per_unit: Decimal, minimum_charge: Decimal, minimum_units: i64) -> Self {
        Self {
            rate_per_unit,
            minimum_charge,
            minimum_units,
        }
    }

    /// Built-in pricing used until the operator saves their own.
    pub fn default_for(utility: UtilityKind) -> Self {
        match utility {
            UtilityKind::Water => Self::new(Decimal::from(10), Decimal::from(100), 10),
            UtilityKind::Electric => Self::new(Decimal::from(8), Decimal::from(100), 10),
        }
    }

    /// Reject negative or out-of-range rates, charges and thresholds.
    pub fn validate(&self, utility: UtilityKind) -> DomainResult<()> {
        let invalid = |reason: &str| DomainError::InvalidTariff {
            utility,
            reason: reason.to_string(),
        };
        let max_amount = Decimal::from(MAX_AMOUNT);

        if self.rate_per_unit < Decimal::ZERO {
            return Err(invalid("rate_per_unit must not be negative"));
        }
        if self.minimum_charge < Decimal::ZERO {
            return Err(invalid("minimum_charge must not be negative"));
        }
        if self.minimum_units < 0 {
            return Err(invalid("minimum_units must not be negative"));
        }
        if self.rate_per_unit > max_amount {
            return Err(invalid("rate_per_unit is above the maximum amount"));
        }
        if self.minimum_charge > max_amount {
            return Err(invalid("minimum_charge is above the maximum amount"));
        }
        if self.minimum_units > MAX_UNITS {
            return Err(invalid("minimum_units is above the maximum reading"));
        }
        Ok(())
    }
}

/// Water and electric tariffs in effect for a billing run.
///
/// Only constructible from valid tariffs, so every billing call that
/// receives one can compute without further checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredTariffs")]
pub struct TariffConfiguration {
    water: UtilityTariff,
    electric: UtilityTariff,
}

impl TariffConfiguration {
    pub fn new(water: UtilityTariff, electric: UtilityTariff) -> DomainResult<Self> {
        water.validate(UtilityKind::Water)?;
        electric.validate(UtilityKind::Electric)?;
        Ok(Self { water, electric })
    }

    pub fn water(&self) -> &UtilityTariff {
        &self.water
    }

    pub fn electric(&self) -> &UtilityTariff {
        &self.electric
    }

    pub fn get(&self, utility: UtilityKind) -> &UtilityTariff {
        match utility {
            UtilityKind::Water => &self.water,
            UtilityKind::Electric => &self.electric,
        }
    }

    /// Copy with one utility's tariff replaced.
    pub fn with(&self, utility: UtilityKind, tariff: UtilityTariff) -> DomainResult<Self> {
        tariff.validate(utility)?;
        let mut next = self.clone();
        match utility {
            UtilityKind::Water => next.water = tariff,
            UtilityKind::Electric => next.electric = tariff,
        }
        Ok(next)
    }
}

impl Default for TariffConfiguration {
    fn default() -> Self {
        Self {
            water: UtilityTariff::default_for(UtilityKind::Water),
            electric: UtilityTariff::default_for(UtilityKind::Electric),
        }
    }
}

/// Stored shape before validation, keyed by utility name. A missing key
/// falls back to that utility's default.
#[derive(Debug, Deserialize)]
pub struct StoredTariffs {
    #[serde(default = "default_water")]
    pub water: UtilityTariff,
    #[serde(default = "default_electric")]
    pub electric: UtilityTariff,
}

fn default_water() -> UtilityTariff {
    UtilityTariff::default_for(UtilityKind::Water)
}

fn default_electric() -> UtilityTariff {
    UtilityTariff::default_for(UtilityKind::Electric)
}

impl TryFrom<StoredTariffs> for TariffConfiguration {
    type Error = DomainError;

    fn try_from(raw: StoredTariffs) -> Result<Self, Self::Error> {
        TariffConfiguration::new(raw.water, raw.electric)
    }
}

// ── Tests ──────────────────────────────────────────────────────
