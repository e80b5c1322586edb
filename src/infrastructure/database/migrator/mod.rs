//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_buildings;
mod m20240101_000002_create_rooms;
mod m20240101_000003_create_tenants;
mod m20240101_000004_create_tenant_leases;
mod m20240101_000005_create_revenue_history;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_buildings::Migration),
            Box::new(m20240101_000002_create_rooms::Migration),
            Box::new(m20240101_000003_create_tenants::Migration),
            Box::new(m20240101_000004_create_tenant_leases::Migration),
            Box::new(m20240101_000005_create_revenue_history::Migration),
        ]
    }
}
