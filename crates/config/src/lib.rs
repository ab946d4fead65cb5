//! Layered configuration for the inventory core.
//!
//! Sources, later ones winning:
//! 1. built-in defaults of each section type;
//! 2. an optional TOML file;
//! 3. `STOCKBOOK_`-prefixed environment variables, nested with `__`
//!    (e.g. `STOCKBOOK_SCANNER__MIN_LENGTH=8`).

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockbook_inventory::{Classifier, InventoryConfig, OperationMetadataTable};
use stockbook_observability::TelemetryConfig;
use stockbook_reports::ReportsConfig;
use stockbook_scanner::ScannerConfig;

pub const ENV_PREFIX: &str = "STOCKBOOK_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scanner: ScannerConfig,
    pub inventory: InventoryConfig,
    pub reports: ReportsConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Defaults overridden by the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// Defaults overridden by `path` (if it exists), then by the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::extract(figment)
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default())).merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Install the tracing subscriber described by the `telemetry` section.
    pub fn init_telemetry(&self) {
        stockbook_observability::init_with(&self.telemetry);
    }

    /// Classifier using the default operation table and the configured sale vocabulary.
    pub fn classifier(&self) -> Classifier {
        Classifier::new(OperationMetadataTable::default(), &self.inventory)
    }

    /// Reject values that would make the core silently useless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scanner.min_length == 0 {
            return Err(ConfigError::Invalid("scanner.min_length must be at least 1".to_string()));
        }
        if self.reports.low_stock_threshold < 0 {
            return Err(ConfigError::Invalid(
                "reports.low_stock_threshold cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_match_core_policy() {
        let config = AppConfig::default();
        assert_eq!(config.scanner.min_length, 6);
        assert_eq!(config.scanner.max_inter_key_delay_ms, 65);
        assert_eq!(config.reports.low_stock_threshold, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_overrides_nested_values() {
        Jail::expect_with(|jail| {
            jail.set_env("STOCKBOOK_SCANNER__MIN_LENGTH", "8");
            jail.set_env("STOCKBOOK_REPORTS__LOW_STOCK_THRESHOLD", "5");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.scanner.min_length, 8);
            assert_eq!(config.scanner.max_inter_key_delay_ms, 65);
            assert_eq!(config.reports.low_stock_threshold, 5);
            Ok(())
        });
    }

    #[test]
    fn toml_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "stockbook.toml",
                r#"
                [scanner]
                max_inter_key_delay_ms = 40

                [inventory]
                sale_reason_prefixes = ["verkauf"]

                [telemetry]
                json = false
                "#,
            )?;
            jail.set_env("STOCKBOOK_SCANNER__MAX_INTER_KEY_DELAY_MS", "50");

            let config = AppConfig::load_from("stockbook.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.scanner.max_inter_key_delay_ms, 50);
            assert_eq!(config.inventory.sale_reason_prefixes, vec!["verkauf".to_string()]);
            assert!(!config.telemetry.json);
            assert_eq!(config.classifier().metadata().len(), 11);
            assert_eq!(config.telemetry.log_level, "info");
            Ok(())
        });
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        Jail::expect_with(|_jail| {
            let config = AppConfig::load_from("absent.toml").map_err(|e| e.to_string())?;
            assert_eq!(config, AppConfig::default());
            Ok(())
        });
    }

    #[test]
    fn zero_min_length_is_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("STOCKBOOK_SCANNER__MIN_LENGTH", "0");
            match AppConfig::load() {
                Err(ConfigError::Invalid(msg)) => assert!(msg.contains("min_length")),
                other => panic!("expected invalid config, got {other:?}"),
            }
            Ok(())
        });
    }
}
