//! Configuration module
//!
//! Application settings are read from a TOML file, by default
//! `<config_dir>/rental-billing/config.toml`:
//!
//! ```toml
//! [database]
//! url = "sqlite://./rental-billing.db?mode=rwc"
//!
//! [logging]
//! level = "info"
//! format = "pretty"   # or "json"
//!
//! [billing]
//! currency = "THB"
//!
//! [tariffs]
//! store = "/home/me/.config/rental-billing/tariffs.json"
//! ```
//!
//! Every section and key is optional. A missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::infrastructure::DatabaseConfig;
use crate::shared::errors::InfraError;

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "RENTAL_BILLING_CONFIG";

const APP_DIR: &str = "rental-billing";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub billing: BillingConfig,
    pub tariffs: TariffStoreConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `rental_billing=debug`
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Currency label printed next to amounts
    pub currency: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            currency: "THB".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffStoreConfig {
    /// Tariff JSON file; defaults to `tariffs.json` beside the config
    pub store: Option<PathBuf>,
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, InfraError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn tariff_store_path(&self) -> PathBuf {
        self.tariffs
            .store
            .clone()
            .unwrap_or_else(|| app_dir().join("tariffs.json"))
    }
}

fn app_dir() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// `<config_dir>/rental-billing/config.toml`
pub fn default_config_path() -> PathBuf {
    app_dir().join("config.toml")
}
