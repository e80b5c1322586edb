//! Monthly revenue snapshot entity
//!
//! One row per `YYYY-MM` period; recomputation replaces the row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "revenue_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub period_key: String,

    /// Amounts are decimal text to keep them exact in SQLite
    pub total_revenue: String,
    pub occupied_room_count: i32,
    pub rent_subtotal: String,
    pub water_subtotal: String,
    pub electric_subtotal: String,

    /// Tariff configuration as JSON
    pub tariffs_used: String,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
