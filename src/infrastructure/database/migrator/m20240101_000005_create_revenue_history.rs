//! Create revenue_history table
//!
//! Keyed by period (YYYY-MM) so a recomputation overwrites the month's row.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RevenueHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RevenueHistory::PeriodKey)
                            .string_len(7)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RevenueHistory::TotalRevenue)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevenueHistory::OccupiedRoomCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RevenueHistory::RentSubtotal)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevenueHistory::WaterSubtotal)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevenueHistory::ElectricSubtotal)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevenueHistory::TariffsUsed)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevenueHistory::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RevenueHistory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum RevenueHistory {
    Table,
    PeriodKey,
    TotalRevenue,
    OccupiedRoomCount,
    RentSubtotal,
    WaterSubtotal,
    ElectricSubtotal,
    TariffsUsed,
    UpdatedAt,
}
