//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod building_repository;
pub mod lease_repository;
pub mod repository_provider;
pub mod revenue_repository;
pub mod room_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::DomainError;

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Persistence(format!("Database error: {}", e))
}

/// Amounts are stored as decimal text; SQLite has no exact decimal type.
pub(crate) fn money_to_db(amount: Decimal) -> String {
    amount.to_string()
}

pub(crate) fn money_from_db(raw: &str) -> Result<Decimal, DomainError> {
    Decimal::from_str(raw.trim())
        .map_err(|e| DomainError::Persistence(format!("Corrupt amount '{}': {}", raw, e)))
}
