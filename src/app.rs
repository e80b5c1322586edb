//! Application runtime.
//!
//! [`AppHandle`] wires configuration into the database, the tariff store and
//! the application services. The CLI builds one per invocation.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::application::services::{BillingService, RevenueService, RoomService, TariffService};
use crate::config::AppConfig;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::tariff::TariffStore;
use crate::infrastructure::{init_database, FileTariffStore, SeaOrmRepositoryProvider};
use crate::shared::errors::{AppError, InfraError};

// ── Options ────────────────────────────────────────────────────────

pub struct AppOptions {
    pub config: AppConfig,
    /// Apply migrations on connect; overrides `database.auto_migrate` when false
    pub auto_migrate: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── AppHandle ──────────────────────────────────────────────────────

/// Connected services sharing one repository provider and tariff store.
pub struct AppHandle {
    pub config: AppConfig,
    pub repos: Arc<dyn RepositoryProvider>,
    pub tariff_store: Arc<dyn TariffStore>,
    pub billing: BillingService,
    pub revenue: Arc<RevenueService>,
    pub rooms: RoomService,
    pub tariffs: TariffService,

    db: DatabaseConnection,
}

impl AppHandle {
    pub async fn start(opts: AppOptions) -> Result<Self, AppError> {
        let mut config = opts.config;
        config.database.auto_migrate &= opts.auto_migrate;

        let db = init_database(&config.database)
            .await
            .map_err(InfraError::from)?;
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        let store_path = config.tariff_store_path();
        info!(path = %store_path.display(), "Using tariff store");
        let tariff_store: Arc<dyn TariffStore> = Arc::new(FileTariffStore::new(store_path));

        Ok(Self::assemble(config, db, repos, tariff_store))
    }

    fn assemble(
        config: AppConfig,
        db: DatabaseConnection,
        repos: Arc<dyn RepositoryProvider>,
        tariff_store: Arc<dyn TariffStore>,
    ) -> Self {
        let revenue = Arc::new(RevenueService::new(repos.clone(), tariff_store.clone()));
        Self {
            billing: BillingService::new(repos.clone(), tariff_store.clone()),
            rooms: RoomService::new(repos.clone(), revenue.clone()),
            tariffs: TariffService::new(tariff_store.clone(), revenue.clone()),
            revenue,
            config,
            repos,
            tariff_store,
            db,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn close(self) -> Result<(), AppError> {
        self.db
            .close()
            .await
            .map_err(InfraError::from)?;
        Ok(())
    }
}

/// Initialize tracing (logging) from the application config.
///
/// `RUST_LOG` takes precedence over `logging.level`. Call once at startup.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    // Logs go to stderr; stdout carries command output
    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
