//! SeaORM implementation of RoomRepository
//!
//! Assembles `RoomSnapshot`s from the room row, its active lease and the
//! lease's tenant. Rooms that predate the tenant/lease tables keep the
//! tenant on the room row itself; those are mapped to a lease without ids
//! here so nothing downstream has to know about the old layout.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info};

use super::{db_err, money_from_db, money_to_db};
use crate::domain::room::{Lease, MeterPair, NewRoom, Occupancy, RoomRepository, RoomSnapshot};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::room::{self, RoomStatus};
use crate::infrastructure::database::entities::{tenant, tenant_lease};

pub struct SeaOrmRoomRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn assemble(&self, rooms: Vec<room::Model>) -> DomainResult<Vec<RoomSnapshot>> {
        if rooms.is_empty() {
            return Ok(Vec::new());
        }

        let room_ids: Vec<i32> = rooms.iter().map(|r| r.id).collect();
        let leases = tenant_lease::Entity::find()
            .filter(tenant_lease::Column::RoomId.is_in(room_ids))
            .filter(tenant_lease::Column::IsActive.eq(true))
            .order_by_desc(tenant_lease::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let tenant_ids: Vec<i32> = leases.iter().map(|l| l.tenant_id).collect();
        let tenants: HashMap<i32, tenant::Model> = if tenant_ids.is_empty() {
            HashMap::new()
        } else {
            tenant::Entity::find()
                .filter(tenant::Column::Id.is_in(tenant_ids))
                .all(&self.db)
                .await
                .map_err(db_err)?
                .into_iter()
                .map(|t| (t.id, t))
                .collect()
        };

        // Newest lease wins if more than one is somehow active
        let mut active: HashMap<i32, tenant_lease::Model> = HashMap::new();
        for lease in leases {
            active.entry(lease.room_id).or_insert(lease);
        }

        rooms
            .into_iter()
            .map(|r| {
                let lease = active.remove(&r.id);
                room_to_snapshot(r, lease, &tenants)
            })
            .collect()
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn room_to_snapshot(
    r: room::Model,
    lease: Option<tenant_lease::Model>,
    tenants: &HashMap<i32, tenant::Model>,
) -> DomainResult<RoomSnapshot> {
    let occupancy = match lease {
        Some(l) => Occupancy::Leased(Lease {
            lease_id: Some(l.id),
            tenant_id: Some(l.tenant_id),
            tenant_name: tenants
                .get(&l.tenant_id)
                .map(|t| t.full_name.clone())
                .unwrap_or_default(),
            monthly_rent: l.monthly_rent.as_deref().map(money_from_db).transpose()?,
            started_on: Some(l.start_date),
        }),
        None => legacy_occupancy(&r),
    };

    Ok(RoomSnapshot {
        id: r.id,
        building_id: r.building_id,
        room_number: r.room_number,
        rent_price: money_from_db(&r.rent_price)?,
        occupancy,
        water: MeterPair::new(r.water_previous, r.water_current),
        electric: MeterPair::new(r.electric_previous, r.electric_current),
    })
}

/// Tenancy recorded directly on the room row. An occupied status with no
/// tenant name carries nothing to bill and counts as vacant.
fn legacy_occupancy(r: &room::Model) -> Occupancy {
    match (&r.status, r.tenant_name.as_deref().map(str::trim)) {
        (RoomStatus::Occupied, Some(name)) if !name.is_empty() => Occupancy::Leased(Lease {
            lease_id: None,
            tenant_id: None,
            tenant_name: name.to_string(),
            monthly_rent: None,
            started_on: None,
        }),
        _ => Occupancy::Vacant,
    }
}

// ── RoomRepository impl ─────────────────────────────────────────

#[async_trait]
impl RoomRepository for SeaOrmRoomRepository {
    async fn create(&self, r: NewRoom) -> DomainResult<RoomSnapshot> {
        let now = Utc::now();
        let model = room::ActiveModel {
            building_id: Set(r.building_id),
            room_number: Set(r.room_number),
            rent_price: Set(money_to_db(r.rent_price)),
            status: Set(RoomStatus::Vacant),
            tenant_name: Set(None),
            tenant_phone: Set(None),
            water_previous: Set(r.water_reading),
            water_current: Set(r.water_reading),
            electric_previous: Set(r.electric_reading),
            electric_current: Set(r.electric_reading),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let result = model.insert(&self.db).await.map_err(db_err)?;
        info!(
            room_id = result.id,
            building_id = result.building_id,
            room_number = %result.room_number,
            "Room saved"
        );
        room_to_snapshot(result, None, &HashMap::new())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<RoomSnapshot>> {
        let Some(model) = room::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };
        Ok(self.assemble(vec![model]).await?.pop())
    }

    async fn find_all(&self) -> DomainResult<Vec<RoomSnapshot>> {
        let models = room::Entity::find()
            .order_by_asc(room::Column::BuildingId)
            .order_by_asc(room::Column::RoomNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.assemble(models).await
    }

    async fn find_by_building(&self, building_id: i32) -> DomainResult<Vec<RoomSnapshot>> {
        let models = room::Entity::find()
            .filter(room::Column::BuildingId.eq(building_id))
            .order_by_asc(room::Column::RoomNumber)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.assemble(models).await
    }

    async fn update_meters(
        &self,
        room_id: i32,
        water: MeterPair,
        electric: MeterPair,
    ) -> DomainResult<()> {
        debug!(room_id, ?water, ?electric, "Updating meters");

        let existing = room::Entity::find_by_id(room_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Room", "id", room_id))?;

        let mut model: room::ActiveModel = existing.into();
        model.water_previous = Set(water.previous);
        model.water_current = Set(water.current);
        model.electric_previous = Set(electric.previous);
        model.electric_current = Set(electric.current);
        model.updated_at = Set(Utc::now());
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn update_current_readings(
        &self,
        room_id: i32,
        water: Option<i64>,
        electric: Option<i64>,
    ) -> DomainResult<()> {
        debug!(room_id, ?water, ?electric, "Updating current readings");

        let mut update = room::Entity::update_many()
            .col_expr(room::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(room::Column::Id.eq(room_id));
        if let Some(value) = water {
            update = update.col_expr(room::Column::WaterCurrent, Expr::value(value));
        }
        if let Some(value) = electric {
            update = update.col_expr(room::Column::ElectricCurrent, Expr::value(value));
        }

        let result = update.exec(&self.db).await.map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Room", "id", room_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::domain::building::{BuildingRepository, NewBuilding};
    use crate::domain::room::{LeaseRepository, NewTenant};
    use crate::infrastructure::database::repositories::building_repository::SeaOrmBuildingRepository;
    use crate::infrastructure::database::repositories::lease_repository::SeaOrmLeaseRepository;
    use crate::infrastructure::database::repositories::test_support::migrated_db;

    async fn setup() -> (DatabaseConnection, i32) {
        let db = migrated_db().await;
        let building = SeaOrmBuildingRepository::new(db.clone())
            .create(NewBuilding {
                name: "Riverside".into(),
                address: None,
            })
            .await
            .unwrap();
        (db, building.id)
    }

    fn new_room(building_id: i32, number: &str) -> NewRoom {
        NewRoom {
            building_id,
            room_number: number.into(),
            rent_price: Decimal::new(8000_50, 2),
            water_reading: 200,
            electric_reading: 1000,
        }
    }

    #[tokio::test]
    async fn created_room_is_vacant_with_baseline_meters() {
        let (db, building_id) = setup().await;
        let repo = SeaOrmRoomRepository::new(db);

        let room = repo.create(new_room(building_id, "101")).await.unwrap();
        assert_eq!(room.occupancy, Occupancy::Vacant);
        assert_eq!(room.water, MeterPair::new(200, 200));
        assert_eq!(room.rent_price, Decimal::new(8000_50, 2));

        let loaded = repo.find_by_id(room.id).await.unwrap().unwrap();
        assert_eq!(loaded, room);
    }

    #[tokio::test]
    async fn update_meters_persists_both_pairs() {
        let (db, building_id) = setup().await;
        let repo = SeaOrmRoomRepository::new(db);
        let room = repo.create(new_room(building_id, "101")).await.unwrap();

        repo.update_meters(room.id, MeterPair::new(200, 215), MeterPair::new(1000, 1003))
            .await
            .unwrap();

        let loaded = repo.find_by_id(room.id).await.unwrap().unwrap();
        assert_eq!(loaded.water.units_consumed(), 15);
        assert_eq!(loaded.electric.units_consumed(), 3);
    }

    #[tokio::test]
    async fn separate_reading_updates_both_stick() {
        let (db, building_id) = setup().await;
        let repo = SeaOrmRoomRepository::new(db);
        let room = repo.create(new_room(building_id, "101")).await.unwrap();
        let water_before = room.water;
        let electric_before = room.electric;

        repo.update_current_readings(room.id, Some(water_before.previous + 15), None)
            .await
            .unwrap();
        repo.update_current_readings(room.id, None, Some(electric_before.previous + 3))
            .await
            .unwrap();

        let loaded = repo.find_by_id(room.id).await.unwrap().unwrap();
        assert_eq!(loaded.water.previous, water_before.previous);
        assert_eq!(loaded.water.units_consumed(), 15);
        assert_eq!(loaded.electric.previous, electric_before.previous);
        assert_eq!(loaded.electric.units_consumed(), 3);
    }

    #[tokio::test]
    async fn reading_update_for_missing_room_is_not_found() {
        let (db, _) = setup().await;
        let repo = SeaOrmRoomRepository::new(db);
        let err = repo
            .update_current_readings(404, Some(10), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_meters_on_missing_room_is_not_found() {
        let (db, _) = setup().await;
        let repo = SeaOrmRoomRepository::new(db);
        let err = repo
            .update_meters(999, MeterPair::default(), MeterPair::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn active_lease_becomes_occupancy() {
        let (db, building_id) = setup().await;
        let rooms = SeaOrmRoomRepository::new(db.clone());
        let leases = SeaOrmLeaseRepository::new(db);
        let room = rooms.create(new_room(building_id, "101")).await.unwrap();

        leases
            .assign(
                room.id,
                NewTenant {
                    full_name: "Somchai".into(),
                    phone: None,
                    monthly_rent: Some(Decimal::from(7500)),
                    start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                },
            )
            .await
            .unwrap();

        let loaded = rooms.find_by_id(room.id).await.unwrap().unwrap();
        let lease = loaded.occupancy.lease().unwrap();
        assert_eq!(lease.tenant_name, "Somchai");
        assert_eq!(lease.monthly_rent, Some(Decimal::from(7500)));
        assert!(lease.lease_id.is_some());
    }

    #[tokio::test]
    async fn legacy_tenant_columns_are_read_as_a_lease() {
        let (db, building_id) = setup().await;
        let repo = SeaOrmRoomRepository::new(db.clone());
        let room = repo.create(new_room(building_id, "102")).await.unwrap();

        // Simulate a row written before tenant leases existed
        let existing = room::Entity::find_by_id(room.id).one(&db).await.unwrap().unwrap();
        let mut legacy: room::ActiveModel = existing.into();
        legacy.status = Set(RoomStatus::Occupied);
        legacy.tenant_name = Set(Some("Legacy Tenant".into()));
        legacy.update(&db).await.unwrap();

        let loaded = repo.find_by_id(room.id).await.unwrap().unwrap();
        let lease = loaded.occupancy.lease().unwrap();
        assert_eq!(lease.tenant_name, "Legacy Tenant");
        assert_eq!(lease.lease_id, None);
        assert_eq!(lease.monthly_rent, None);
    }

    #[tokio::test]
    async fn occupied_status_without_tenant_is_vacant() {
        let (db, building_id) = setup().await;
        let repo = SeaOrmRoomRepository::new(db.clone());
        let room = repo.create(new_room(building_id, "103")).await.unwrap();

        let existing = room::Entity::find_by_id(room.id).one(&db).await.unwrap().unwrap();
        let mut legacy: room::ActiveModel = existing.into();
        legacy.status = Set(RoomStatus::Occupied);
        legacy.update(&db).await.unwrap();

        let loaded = repo.find_by_id(room.id).await.unwrap().unwrap();
        assert_eq!(loaded.occupancy, Occupancy::Vacant);
    }

    #[tokio::test]
    async fn find_by_building_filters_rooms() {
        let (db, building_id) = setup().await;
        let other = SeaOrmBuildingRepository::new(db.clone())
            .create(NewBuilding {
                name: "Hillside".into(),
                address: Some("2 Hill Rd".into()),
            })
            .await
            .unwrap();
        let repo = SeaOrmRoomRepository::new(db);
        repo.create(new_room(building_id, "101")).await.unwrap();
        repo.create(new_room(building_id, "102")).await.unwrap();
        repo.create(new_room(other.id, "A1")).await.unwrap();

        assert_eq!(repo.find_by_building(building_id).await.unwrap().len(), 2);
        assert_eq!(repo.find_by_building(other.id).await.unwrap().len(), 1);
        assert_eq!(repo.find_all().await.unwrap().len(), 3);
    }
}
