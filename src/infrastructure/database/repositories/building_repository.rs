//! SeaORM implementation of BuildingRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::info;

use super::db_err;
use crate::domain::building::{Building, BuildingRepository, NewBuilding};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::building;

pub struct SeaOrmBuildingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBuildingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: building::Model) -> Building {
    Building {
        id: m.id,
        name: m.name,
        address: m.address,
        created_at: m.created_at,
    }
}

#[async_trait]
impl BuildingRepository for SeaOrmBuildingRepository {
    async fn create(&self, b: NewBuilding) -> DomainResult<Building> {
        let model = building::ActiveModel {
            name: Set(b.name),
            address: Set(b.address),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let result = model.insert(&self.db).await.map_err(db_err)?;
        info!(building_id = result.id, name = %result.name, "Building saved");
        Ok(model_to_domain(result))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Building>> {
        let model = building::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Building>> {
        let models = building::Entity::find()
            .order_by_asc(building::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
