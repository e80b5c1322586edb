//! Room domain entities

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::tariff::{UtilityKind, MAX_UNITS};

/// Previous and current reading of one meter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterPair {
    pub previous: i64,
    pub current: i64,
}

impl MeterPair {
    pub fn new(previous: i64, current: i64) -> Self {
        Self { previous, current }
    }

    /// Units consumed since the previous reading.
    ///
    /// A current reading below the previous one (meter replaced or reset)
    /// yields zero rather than a negative usage. Rows written before
    /// readings were bounded are capped at [`MAX_UNITS`].
    pub fn units_consumed(&self) -> i64 {
        self.current
            .saturating_sub(self.previous)
            .clamp(0, MAX_UNITS)
    }

    /// Start a new billing cycle: the current reading becomes the baseline.
    pub fn rolled(&self) -> Self {
        Self {
            previous: self.current,
            current: self.current,
        }
    }
}

/// Active tenancy of a room.
///
/// Rooms created before tenants had their own table carry the tenant
/// directly on the room row; those come through with no lease or tenant id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    pub lease_id: Option<i32>,
    pub tenant_id: Option<i32>,
    pub tenant_name: String,
    /// Rent agreed on the lease; overrides the room's base price when set
    pub monthly_rent: Option<Decimal>,
    pub started_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Occupancy {
    Vacant,
    Leased(Lease),
}

impl Occupancy {
    pub fn lease(&self) -> Option<&Lease> {
        match self {
            Occupancy::Vacant => None,
            Occupancy::Leased(lease) => Some(lease),
        }
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Occupancy::Leased(_))
    }
}

/// Everything billing needs to know about a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub id: i32,
    pub building_id: i32,
    pub room_number: String,
    /// Base monthly rent
    pub rent_price: Decimal,
    pub occupancy: Occupancy,
    pub water: MeterPair,
    pub electric: MeterPair,
}

impl RoomSnapshot {
    pub fn meter(&self, utility: UtilityKind) -> &MeterPair {
        match utility {
            UtilityKind::Water => &self.water,
            UtilityKind::Electric => &self.electric,
        }
    }

    pub fn tenant_name(&self) -> Option<&str> {
        self.occupancy.lease().map(|l| l.tenant_name.as_str())
    }
}

/// Input for registering a room
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub building_id: i32,
    pub room_number: String,
    pub rent_price: Decimal,
    pub water_reading: i64,
    pub electric_reading: i64,
}

/// Input for moving a tenant into a room
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub full_name: String,
    pub phone: Option<String>,
    /// Lease-specific rent; the room price applies when `None`
    pub monthly_rent: Option<Decimal>,
    pub start_date: NaiveDate,
}
