//! Tariff store interface

use super::model::TariffConfiguration;
use crate::domain::DomainResult;

/// Operator-scoped tariff storage.
///
/// Tariffs live next to the operator (a local file, not the shared
/// database). Implementations return defaults when nothing was saved yet.
pub trait TariffStore: Send + Sync {
    fn load(&self) -> DomainResult<TariffConfiguration>;
    fn save(&self, tariffs: &TariffConfiguration) -> DomainResult<()>;
}
