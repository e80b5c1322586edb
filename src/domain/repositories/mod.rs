//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::building::BuildingRepository;
use super::revenue::RevenueRepository;
use super::room::{LeaseRepository, RoomRepository};
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn occupied(repos: &dyn RepositoryProvider) -> DomainResult<usize> {
///     let rooms = repos.rooms().find_all().await?;
///     Ok(rooms.iter().filter(|r| r.occupancy.is_occupied()).count())
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn buildings(&self) -> &dyn BuildingRepository;
    fn rooms(&self) -> &dyn RoomRepository;
    fn leases(&self) -> &dyn LeaseRepository;
    fn revenue(&self) -> &dyn RevenueRepository;
}
