//! Runtime configuration read from the environment.
//!
//! A `.env` file is loaded by the binary before `AppConfig::from_env` runs,
//! so values there behave like regular environment variables.

use thiserror::Error;
use vital_signs_domain::entities::TemperatureUnit;

/// Default unit for temperatures in requests that do not name one
pub const TEMPERATURE_UNIT_VAR: &str = "VITALS_TEMPERATURE_UNIT";
/// Whether abnormal values must be confirmed before a reading is accepted
pub const REQUIRE_CONFIRMATION_VAR: &str = "VITALS_REQUIRE_CONFIRMATION";
/// Default trend window in days
pub const TREND_DAYS_VAR: &str = "VITALS_TREND_DAYS";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub temperature_unit: TemperatureUnit,
    pub require_confirmation: bool,
    pub trend_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            temperature_unit: TemperatureUnit::Fahrenheit,
            require_confirmation: true,
            trend_days: 30,
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(TEMPERATURE_UNIT_VAR) {
            config.temperature_unit = value
                .parse::<TemperatureUnit>()
                .map_err(|message| ConfigError::InvalidValue {
                    key: TEMPERATURE_UNIT_VAR,
                    message,
                })?;
        }

        if let Some(value) = lookup(REQUIRE_CONFIRMATION_VAR) {
            config.require_confirmation = parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
                key: REQUIRE_CONFIRMATION_VAR,
                message: format!("expected true or false, got {}", value),
            })?;
        }

        if let Some(value) = lookup(TREND_DAYS_VAR) {
            config.trend_days = value
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: TREND_DAYS_VAR,
                    message: e.to_string(),
                })?;
        }

        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_reads_all_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (TEMPERATURE_UNIT_VAR, "C"),
            (REQUIRE_CONFIRMATION_VAR, "no"),
            (TREND_DAYS_VAR, "90"),
        ]))
        .unwrap();

        assert_eq!(config.temperature_unit, TemperatureUnit::Celsius);
        assert!(!config.require_confirmation);
        assert_eq!(config.trend_days, 90);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = AppConfig::from_lookup(lookup_from(&[(TREND_DAYS_VAR, "a month")])).unwrap_err();
        assert!(err.to_string().contains(TREND_DAYS_VAR));

        let err = AppConfig::from_lookup(lookup_from(&[(REQUIRE_CONFIRMATION_VAR, "maybe")])).unwrap_err();
        assert!(err.to_string().contains("maybe"));

        assert!(AppConfig::from_lookup(lookup_from(&[(TEMPERATURE_UNIT_VAR, "K")])).is_err());
    }
}
