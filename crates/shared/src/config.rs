//! Application configuration management.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::types::AccountCode;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Persistence configuration.
    pub store: StoreConfig,
    /// Ledger engine configuration.
    pub ledger: LedgerConfig,
    /// Logging configuration.
    pub log: LogConfig,
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the keyed JSON blobs.
    pub data_dir: PathBuf,
    /// Prefix prepended to every blob key.
    pub key_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            key_prefix: "gims_".to_string(),
        }
    }
}

/// Ledger engine configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// The level-3 account holding cash in hand.
    pub cash_code: AccountCode,
    /// The level-3 account representing amounts owed by students.
    pub receivable_code: AccountCode,
    /// The income account credited by fee dues and fee receipts.
    pub fee_income_code: AccountCode,
    /// Start date used when a report asks for an unbounded start.
    pub report_epoch: NaiveDate,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            cash_code: AccountCode::new("1-01-001"),
            receivable_code: AccountCode::new("1-01-004"),
            fee_income_code: AccountCode::new("4-01-001"),
            report_epoch: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "gims=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("GIMS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let config = temp_env::with_vars_unset(
            ["GIMS__LEDGER__RECEIVABLE_CODE", "GIMS__STORE__DATA_DIR", "RUN_MODE"],
            AppConfig::load,
        )
        .unwrap();

        assert_eq!(config.ledger.cash_code, AccountCode::new("1-01-001"));
        assert_eq!(config.ledger.receivable_code, AccountCode::new("1-01-004"));
        assert_eq!(config.ledger.fee_income_code, AccountCode::new("4-01-001"));
        assert_eq!(
            config.ledger.report_epoch,
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );
        assert_eq!(config.store.key_prefix, "gims_");
        assert_eq!(config.log.filter, "gims=info");
    }

    #[test]
    fn test_environment_overrides() {
        let config = temp_env::with_vars(
            [
                ("GIMS__LEDGER__RECEIVABLE_CODE", Some("1-01-009")),
                ("GIMS__STORE__DATA_DIR", Some("/tmp/gims-data")),
            ],
            AppConfig::load,
        )
        .unwrap();

        assert_eq!(config.ledger.receivable_code, AccountCode::new("1-01-009"));
        assert_eq!(config.store.data_dir, PathBuf::from("/tmp/gims-data"));
    }
}
