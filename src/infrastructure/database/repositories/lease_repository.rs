//! SeaORM implementation of LeaseRepository

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::info;

use super::{db_err, money_to_db};
use crate::domain::room::{Lease, LeaseRepository, NewTenant};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::room::{self, RoomStatus};
use crate::infrastructure::database::entities::{tenant, tenant_lease};

pub struct SeaOrmLeaseRepository {
    db: DatabaseConnection,
}

impl SeaOrmLeaseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LeaseRepository for SeaOrmLeaseRepository {
    async fn assign(&self, room_id: i32, t: NewTenant) -> DomainResult<Lease> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = room::Entity::find_by_id(room_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Room", "id", room_id))?;

        let active = tenant_lease::Entity::find()
            .filter(tenant_lease::Column::RoomId.eq(room_id))
            .filter(tenant_lease::Column::IsActive.eq(true))
            .one(&txn)
            .await
            .map_err(db_err)?;
        let legacy_tenant = existing.status == RoomStatus::Occupied
            && existing
                .tenant_name
                .as_deref()
                .is_some_and(|n| !n.trim().is_empty());
        if active.is_some() || legacy_tenant {
            return Err(DomainError::Validation(format!(
                "room {} is already occupied",
                existing.room_number
            )));
        }

        let now = Utc::now();
        let tenant = tenant::ActiveModel {
            full_name: Set(t.full_name),
            phone: Set(t.phone),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        let lease = tenant_lease::ActiveModel {
            room_id: Set(room_id),
            tenant_id: Set(tenant.id),
            monthly_rent: Set(t.monthly_rent.map(money_to_db)),
            start_date: Set(t.start_date),
            end_date: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        // Tenancy now lives in the lease; drop any copy on the room row
        let mut room_model: room::ActiveModel = existing.into();
        room_model.status = Set(RoomStatus::Occupied);
        room_model.tenant_name = Set(None);
        room_model.tenant_phone = Set(None);
        room_model.updated_at = Set(now);
        room_model.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        info!(
            room_id,
            lease_id = lease.id,
            tenant_id = tenant.id,
            "Tenant assigned"
        );

        Ok(Lease {
            lease_id: Some(lease.id),
            tenant_id: Some(tenant.id),
            tenant_name: tenant.full_name,
            monthly_rent: t.monthly_rent,
            started_on: Some(lease.start_date),
        })
    }

    async fn end_active(&self, room_id: i32, end_date: NaiveDate) -> DomainResult<bool> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = room::Entity::find_by_id(room_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Room", "id", room_id))?;

        let ended = tenant_lease::Entity::update_many()
            .col_expr(tenant_lease::Column::IsActive, Expr::value(false))
            .col_expr(tenant_lease::Column::EndDate, Expr::value(end_date))
            .filter(tenant_lease::Column::RoomId.eq(room_id))
            .filter(tenant_lease::Column::IsActive.eq(true))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let was_occupied = ended.rows_affected > 0
            || (existing.status == RoomStatus::Occupied
                && existing
                    .tenant_name
                    .as_deref()
                    .is_some_and(|n| !n.trim().is_empty()));

        let mut room_model: room::ActiveModel = existing.into();
        room_model.status = Set(RoomStatus::Vacant);
        room_model.tenant_name = Set(None);
        room_model.tenant_phone = Set(None);
        room_model.updated_at = Set(Utc::now());
        room_model.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        if was_occupied {
            info!(room_id, leases_ended = ended.rows_affected, "Room vacated");
        }
        Ok(was_occupied)
    }
}
