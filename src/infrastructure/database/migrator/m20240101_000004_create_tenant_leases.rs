//! Create tenant_leases table

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_rooms::Rooms;
use super::m20240101_000003_create_tenants::Tenants;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TenantLeases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TenantLeases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TenantLeases::RoomId).integer().not_null())
                    .col(ColumnDef::new(TenantLeases::TenantId).integer().not_null())
                    .col(ColumnDef::new(TenantLeases::MonthlyRent).string())
                    .col(ColumnDef::new(TenantLeases::StartDate).date().not_null())
                    .col(ColumnDef::new(TenantLeases::EndDate).date())
                    .col(
                        ColumnDef::new(TenantLeases::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(TenantLeases::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenant_leases_room")
                            .from(TenantLeases::Table, TenantLeases::RoomId)
                            .to(Rooms::Table, Rooms::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenant_leases_tenant")
                            .from(TenantLeases::Table, TenantLeases::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenant_leases_room_active")
                    .table(TenantLeases::Table)
                    .col(TenantLeases::RoomId)
                    .col(TenantLeases::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TenantLeases::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum TenantLeases {
    Table,
    Id,
    RoomId,
    TenantId,
    MonthlyRent,
    StartDate,
    EndDate,
    IsActive,
    CreatedAt,
}
