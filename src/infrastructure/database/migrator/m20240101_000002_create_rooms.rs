//! Create rooms table
//!
//! Keeps the legacy tenant_name / tenant_phone columns so older rows can
//! still be read.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_buildings::Buildings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rooms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rooms::BuildingId).integer().not_null())
                    .col(ColumnDef::new(Rooms::RoomNumber).string().not_null())
                    .col(
                        ColumnDef::new(Rooms::RentPrice)
                            .string()
                            .not_null()
                            .default("0"),
                    )
                    .col(
                        ColumnDef::new(Rooms::Status)
                            .string_len(20)
                            .not_null()
                            .default("vacant"),
                    )
                    .col(ColumnDef::new(Rooms::TenantName).string())
                    .col(ColumnDef::new(Rooms::TenantPhone).string())
                    .col(
                        ColumnDef::new(Rooms::WaterPrevious)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rooms::WaterCurrent)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rooms::ElectricPrevious)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rooms::ElectricCurrent)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rooms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rooms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rooms_building")
                            .from(Rooms::Table, Rooms::BuildingId)
                            .to(Buildings::Table, Buildings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Room numbers are unique within a building
        manager
            .create_index(
                Index::create()
                    .name("idx_rooms_building_number")
                    .table(Rooms::Table)
                    .col(Rooms::BuildingId)
                    .col(Rooms::RoomNumber)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Rooms {
    Table,
    Id,
    BuildingId,
    RoomNumber,
    RentPrice,
    Status,
    TenantName,
    TenantPhone,
    WaterPrevious,
    WaterCurrent,
    ElectricPrevious,
    ElectricCurrent,
    CreatedAt,
    UpdatedAt,
}
