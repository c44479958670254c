//! # Application Configuration
//!
//! Settings loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`--db`)
//! 2. Environment variables (`STOCKROOM_*`)
//! 3. Defaults (this file)

use directories::ProjectDirs;
use serde::Serialize;
use std::path::PathBuf;
use stockroom_core::DEFAULT_LOW_STOCK_THRESHOLD;
use thiserror::Error;

pub const ENV_DB_PATH: &str = "STOCKROOM_DB_PATH";
pub const ENV_REPORTS_DIR: &str = "STOCKROOM_REPORTS_DIR";
pub const ENV_LOW_STOCK_THRESHOLD: &str = "STOCKROOM_LOW_STOCK_THRESHOLD";
pub const ENV_ALLOW_NEGATIVE_STOCK: &str = "STOCKROOM_ALLOW_NEGATIVE_STOCK";
pub const ENV_CURRENCY_SYMBOL: &str = "STOCKROOM_CURRENCY_SYMBOL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is set but does not parse.
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    /// No platform data directory and no `STOCKROOM_DB_PATH`.
    #[error("Could not determine app data directory; set STOCKROOM_DB_PATH")]
    NoDataDir,
}

/// Application configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Where `report export` writes its files
    pub reports_dir: PathBuf,

    /// Dashboard low-stock cut-off (inclusive)
    pub low_stock_threshold: i64,

    /// Whether sales and damage records may drive stock below zero
    pub allow_negative_stock: bool,

    /// Currency symbol (for display)
    pub currency_symbol: String,
}

impl AppConfig {
    /// Defaults with an explicit database path. Used by tests and `--db`.
    pub fn with_database_path(path: impl Into<PathBuf>) -> Self {
        AppConfig {
            database_path: path.into(),
            reports_dir: PathBuf::from("./reports"),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            allow_negative_stock: true,
            currency_symbol: "$".to_string(),
        }
    }

    /// Reads the process environment.
    ///
    /// ## Environment Variables
    /// - `STOCKROOM_DB_PATH`: database file (default: platform data dir)
    /// - `STOCKROOM_REPORTS_DIR`: export directory (default: `./reports`)
    /// - `STOCKROOM_LOW_STOCK_THRESHOLD`: integer (default: 5)
    /// - `STOCKROOM_ALLOW_NEGATIVE_STOCK`: `true`/`false` (default: true)
    /// - `STOCKROOM_CURRENCY_SYMBOL`: display symbol (default: `$`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = match lookup(ENV_DB_PATH) {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_database_path()?,
        };

        let mut config = AppConfig::with_database_path(database_path);

        if let Some(dir) = lookup(ENV_REPORTS_DIR) {
            config.reports_dir = PathBuf::from(dir);
        }

        if let Some(value) = lookup(ENV_LOW_STOCK_THRESHOLD) {
            config.low_stock_threshold = value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|t| *t >= 0)
                .ok_or_else(|| ConfigError::InvalidValue(ENV_LOW_STOCK_THRESHOLD.to_string()))?;
        }

        if let Some(value) = lookup(ENV_ALLOW_NEGATIVE_STOCK) {
            config.allow_negative_stock = parse_flag(&value)
                .ok_or_else(|| ConfigError::InvalidValue(ENV_ALLOW_NEGATIVE_STOCK.to_string()))?;
        }

        if let Some(symbol) = lookup(ENV_CURRENCY_SYMBOL) {
            config.currency_symbol = symbol;
        }

        Ok(config)
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = AppConfig::with_database_path("x.db");
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let whole = cents / 100;
        let frac = (cents % 100).abs();

        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            whole.abs(),
            frac
        )
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Platform-specific default database file.
///
/// - **macOS**: `~/Library/Application Support/com.stockroom.stockroom/stockroom.db`
/// - **Windows**: `%APPDATA%\stockroom\stockroom\data\stockroom.db`
/// - **Linux**: `~/.local/share/stockroom/stockroom.db`
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "stockroom", "stockroom").ok_or(ConfigError::NoDataDir)?;
    Ok(dirs.data_dir().join("stockroom.db"))
}
