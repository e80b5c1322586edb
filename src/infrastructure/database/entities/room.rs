//! Room entity
//!
//! Besides meters and rent, a room row still carries the tenant columns
//! used before tenants and leases had their own tables. Rows written by
//! this service keep them empty; older rows may not.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Room occupancy status
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum RoomStatus {
    #[sea_orm(string_value = "vacant")]
    Vacant,
    #[sea_orm(string_value = "occupied")]
    Occupied,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub building_id: i32,

    pub room_number: String,

    /// Base monthly rent, decimal text (e.g. "8000.00")
    pub rent_price: String,

    pub status: RoomStatus,

    /// Legacy tenant name
    #[sea_orm(nullable)]
    pub tenant_name: Option<String>,

    /// Legacy tenant phone
    #[sea_orm(nullable)]
    pub tenant_phone: Option<String>,

    pub water_previous: i64,
    pub water_current: i64,
    pub electric_previous: i64,
    pub electric_current: i64,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::building::Entity",
        from = "Column::BuildingId",
        to = "super::building::Column::Id"
    )]
    Building,
    #[sea_orm(has_many = "super::tenant_lease::Entity")]
    TenantLease,
}

impl Related<super::building::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Building.def()
    }
}

impl Related<super::tenant_lease::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TenantLease.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
