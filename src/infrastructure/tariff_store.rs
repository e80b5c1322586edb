//! Tariff stores
//!
//! The operator's tariffs are kept in a JSON file next to their config,
//! keyed by utility name:
//!
//! ```json
//! { "water": { "rate_per_unit": "10", "minimum_charge": "100", "minimum_units": 10 },
//!   "electric": { "rate_per_unit": "8", "minimum_charge": "100", "minimum_units": 10 } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info};

use crate::domain::tariff::{StoredTariffs, TariffConfiguration, TariffStore};
use crate::domain::{DomainError, DomainResult};
use crate::shared::errors::InfraError;

/// Tariffs persisted as a JSON file
pub struct FileTariffStore {
    path: PathBuf,
}

impl FileTariffStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<StoredTariffs>, InfraError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn write(&self, tariffs: &TariffConfiguration) -> Result<(), InfraError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(tariffs)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl TariffStore for FileTariffStore {
    fn load(&self) -> DomainResult<TariffConfiguration> {
        match self.read() {
            Ok(Some(stored)) => {
                // Negative or oversized values surface as InvalidTariff
                let tariffs = TariffConfiguration::try_from(stored)?;
                debug!(path = %self.path.display(), "Tariffs loaded");
                Ok(tariffs)
            }
            Ok(None) => {
                debug!(path = %self.path.display(), "No saved tariffs, using defaults");
                Ok(TariffConfiguration::default())
            }
            Err(InfraError::Serialization(e)) => Err(DomainError::Validation(format!(
                "tariff file {}: {}",
                self.path.display(),
                e
            ))),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, tariffs: &TariffConfiguration) -> DomainResult<()> {
        self.write(tariffs)?;
        info!(path = %self.path.display(), "Tariffs saved");
        Ok(())
    }
}

/// Tariffs held in memory, for tests and one-off runs
#[derive(Default)]
pub struct InMemoryTariffStore {
    tariffs: RwLock<Option<TariffConfiguration>>,
}

impl InMemoryTariffStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(tariffs: TariffConfiguration) -> Self {
        Self {
            tariffs: RwLock::new(Some(tariffs)),
        }
    }
}

impl TariffStore for InMemoryTariffStore {
    fn load(&self) -> DomainResult<TariffConfiguration> {
        let guard = self
            .tariffs
            .read()
            .map_err(|_| DomainError::Persistence("tariff store lock poisoned".to_string()))?;
        Ok(guard.clone().unwrap_or_default())
    }

    fn save(&self, tariffs: &TariffConfiguration) -> DomainResult<()> {
        let mut guard = self
            .tariffs
            .write()
            .map_err(|_| DomainError::Persistence("tariff store lock poisoned".to_string()))?;
        *guard = Some(tariffs.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::domain::tariff::{UtilityKind, UtilityTariff};

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTariffStore::new(dir.path().join("tariffs.json"));
        assert_eq!(store.load().unwrap(), TariffConfiguration::default());
    }

    #[test]
    fn saved_tariffs_are_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTariffStore::new(dir.path().join("nested/dir/tariffs.json"));
        let tariffs = TariffConfiguration::default()
            .with(
                UtilityKind::Water,
                UtilityTariff::new(Decimal::new(125, 1), Decimal::from(80), 5),
            )
            .unwrap();

        store.save(&tariffs).unwrap();
        assert_eq!(store.load().unwrap(), tariffs);
    }

    #[test]
    fn partial_file_falls_back_per_utility() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tariffs.json");
        fs::write(
            &path,
            r#"{"electric": {"rate_per_unit": 7, "minimum_charge": 50, "minimum_units": 5}}"#,
        )
        .unwrap();

        let loaded = FileTariffStore::new(&path).load().unwrap();
        assert_eq!(
            loaded.water(),
            &UtilityTariff::default_for(UtilityKind::Water)
        );
        assert_eq!(loaded.electric().rate_per_unit, Decimal::from(7));
    }

    #[test]
    fn negative_values_in_file_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tariffs.json");
        fs::write(
            &path,
            r#"{"water": {"rate_per_unit": -1, "minimum_charge": 100, "minimum_units": 10}}"#,
        )
        .unwrap();

        let err = FileTariffStore::new(&path).load().unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidTariff {
                utility: UtilityKind::Water,
                ..
            }
        ));
    }

    #[test]
    fn oversized_rate_in_file_names_the_utility() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tariffs.json");
        fs::write(
            &path,
            r#"{"electric": {"rate_per_unit": "10000000000", "minimum_charge": 100, "minimum_units": 10}}"#,
        )
        .unwrap();

        let err = FileTariffStore::new(&path).load().unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidTariff {
                utility: UtilityKind::Electric,
                ..
            }
        ));
    }

    #[test]
    fn malformed_file_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tariffs.json");
        fs::write(&path, r#"{"water": {"rate_per_unit": "#).unwrap();

        let err = FileTariffStore::new(&path).load().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn in_memory_store_starts_with_defaults() {
        let store = InMemoryTariffStore::new();
        assert_eq!(store.load().unwrap(), TariffConfiguration::default());
    }
}
