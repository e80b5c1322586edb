pub mod entities;
pub mod migrator;
pub mod repositories;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde::{Deserialize, Serialize};
use tracing::info;

use migrator::Migrator;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./rental-billing.db?mode=rwc";

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./rental-billing.db?mode=rwc")
    pub url: String,
    /// Apply pending migrations on connect
    pub auto_migrate: bool,
    /// Log every SQL statement
    pub sql_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            auto_migrate: true,
            sql_logging: false,
        }
    }
}

impl DatabaseConfig {
    /// Create config for an SQLite file, created if missing
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            ..Self::default()
        }
    }
}

/// Initialize database connection, migrating if configured to
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!(url = %config.url, "Connecting to database");
    let mut opts = ConnectOptions::new(config.url.clone());
    opts.sqlx_logging(config.sql_logging);
    let db = Database::connect(opts).await?;
    info!("Database connected successfully");

    if config.auto_migrate {
        run_migrations(&db).await?;
    }
    Ok(db)
}

pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), sea_orm::DbErr> {
    Migrator::up(db, None).await?;
    info!("Database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_helper_builds_rwc_url() {
        let cfg = DatabaseConfig::sqlite("/var/lib/billing.db");
        assert_eq!(cfg.url, "sqlite:///var/lib/billing.db?mode=rwc");
        assert!(cfg.auto_migrate);
    }

    #[tokio::test]
    async fn init_database_migrates_in_memory_db() {
        let cfg = DatabaseConfig {
            url: "sqlite::memory:".into(),
            auto_migrate: true,
            sql_logging: false,
        };
        let db = init_database(&cfg).await.unwrap();
        // Re-running is a no-op once applied
        run_migrations(&db).await.unwrap();
    }
}
