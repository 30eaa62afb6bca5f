//! Configuration management for the early warning system

use crate::rules::{CreditThresholds, TransactionThresholds};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/cad-ews.toml";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub rules: RulesConfig,
    pub nats: NatsConfig,
    pub logging: LoggingConfig,
}

/// Where the input tables live
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Directory holding the CSV tables
    pub data_dir: PathBuf,
    /// Borrower table file name
    pub credit_file: String,
    /// Transaction table file name
    pub transaction_file: String,
}

impl DataConfig {
    pub fn credit_path(&self) -> PathBuf {
        self.data_dir.join(&self.credit_file)
    }

    pub fn transaction_path(&self) -> PathBuf {
        self.data_dir.join(&self.transaction_file)
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            credit_file: "credit_data.csv".to_string(),
            transaction_file: "transactions.csv".to_string(),
        }
    }
}

/// Rule thresholds. Defaults are the documented production limits.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub credit: CreditThresholds,
    pub transaction: TransactionThresholds,
}

/// NATS delivery configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NatsConfig {
    /// Publish alerts after every run
    pub enabled: bool,
    /// NATS server URL
    pub url: String,
    /// Subject for credit stress alerts
    pub credit_alert_subject: String,
    /// Subject for transaction anomaly alerts
    pub transaction_alert_subject: String,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "nats://localhost:4222".to_string(),
            credit_alert_subject: "ews.alerts.credit".to_string(),
            transaction_alert_subject: "ews.alerts.transactions".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a specific path.
    ///
    /// The file is optional; anything it leaves out falls back to defaults.
    /// `EWS__SECTION__KEY` environment variables override both, e.g.
    /// `EWS__DATA__DATA_DIR=/srv/ews/data`.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("EWS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.data.credit_path(), PathBuf::from("data/credit_data.csv"));
        assert_eq!(config.data.transaction_path(), PathBuf::from("data/transactions.csv"));
        assert_eq!(config.rules.credit.high.overdue_days, 60.0);
        assert_eq!(config.rules.credit.medium.missed_emis, 2);
        assert_eq!(config.rules.transaction.large_amount, 1_000_000.0);
        assert!(!config.nats.enabled);
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from_path(dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.data.data_dir, PathBuf::from("data"));
        assert_eq!(config.rules.transaction.smurfing_min_count, 10);
    }

    #[test]
    fn test_partial_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cad-ews.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[data]
data_dir = "/srv/ews"

[rules.transaction]
large_amount = 500000.0

[rules.credit.high]
overdue_days = 90.0
missed_emis = 4
utilization = 0.99

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();

        assert_eq!(config.data.credit_path(), PathBuf::from("/srv/ews/credit_data.csv"));
        assert_eq!(config.rules.transaction.large_amount, 500_000.0);
        assert_eq!(config.rules.transaction.income_multiple, 5.0);
        assert_eq!(config.rules.credit.high.missed_emis, 4);
        assert_eq!(config.rules.credit.medium.overdue_days, 30.0);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_single_tier_limit_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cad-ews.toml");
        std::fs::write(&path, "[rules.credit.high]\noverdue_days = 90.0\n").unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();
        let credit = config.rules.credit;

        assert_eq!(credit.high.overdue_days, 90.0);
        assert_eq!(credit.high.missed_emis, 3);
        assert_eq!(credit.high.utilization, 0.95);
        assert_eq!(credit.medium, CreditThresholds::default().medium);
    }

    #[test]
    fn test_single_tier_limit_from_environment() {
        std::env::set_var("EWS__RULES__CREDIT__MEDIUM__MISSED_EMIS", "1");
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("absent.toml"));
        std::env::remove_var("EWS__RULES__CREDIT__MEDIUM__MISSED_EMIS");

        let credit = result.unwrap().rules.credit;
        assert_eq!(credit.medium.missed_emis, 1);
        assert_eq!(credit.medium.overdue_days, 30.0);
        assert_eq!(credit.high, CreditThresholds::default().high);
    }
}
