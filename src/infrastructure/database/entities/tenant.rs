//! Tenant entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub full_name: String,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tenant_lease::Entity")]
    TenantLease,
}

impl Related<super::tenant_lease::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TenantLease.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
