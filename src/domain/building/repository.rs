//! Building repository interface

use async_trait::async_trait;

use super::model::{Building, NewBuilding};
use crate::domain::DomainResult;

#[async_trait]
pub trait BuildingRepository: Send + Sync {
    async fn create(&self, building: NewBuilding) -> DomainResult<Building>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Building>>;
    async fn find_all(&self) -> DomainResult<Vec<Building>>;
}
