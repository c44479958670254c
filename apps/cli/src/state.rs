//! # Application State
//!
//! The database handle and configuration, opened once per process and
//! borrowed by every command.

use stockroom_db::{Database, DbConfig};
use tracing::info;

use crate::config::AppConfig;
use crate::error::ApiError;

pub struct AppState {
    db: Database,
    config: AppConfig,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        AppState { db, config }
    }

    /// Opens (creating if needed) the configured database file and runs
    /// pending migrations.
    pub async fn open(config: AppConfig) -> Result<Self, ApiError> {
        if let Some(parent) = config.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db_config = DbConfig::new(config.database_path.clone())
            .allow_negative_stock(config.allow_negative_stock);
        let db = Database::new(db_config).await?;

        info!(path = %config.database_path.display(), "Database ready");
        Ok(AppState::new(db, config))
    }

    /// In-memory database with the given configuration (tests).
    #[cfg(test)]
    pub async fn in_memory(config: AppConfig) -> Self {
        let db_config = DbConfig::in_memory().allow_negative_stock(config.allow_negative_stock);
        let db = Database::new(db_config)
            .await
            .expect("in-memory database");
        AppState::new(db, config)
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
