//! Application configuration
//!
//! Layered from built-in defaults, an optional `paradecast.toml`, and
//! `PARADECAST_*` environment variables (highest precedence). Nested keys use
//! a double underscore, e.g. `PARADECAST_WEATHER__TIMEOUT_SECS=10`.

use std::path::Path;

use application::AnalysisConfig;
use integration_weather::WeatherConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use validator::{Validate, ValidationErrors};

use crate::telemetry::TelemetryConfig;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "PARADECAST";

/// Base name of the config file looked up in the working directory
pub const DEFAULT_CONFIG_NAME: &str = "paradecast";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Values were read but are not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Open-Meteo client settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load from `./paradecast.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load using an explicit config file instead of the default lookup
    ///
    /// An explicit path must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is missing or malformed, or validation fails.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::build(path, environment())
    }

    fn build(path: Option<&Path>, env: config::Environment) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        debug!(?path, "Configuration loaded");
        Ok(config)
    }

    /// Check values that deserialize fine but cannot work
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` listing every offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let problems: Vec<String> = [
            ("weather", self.weather.validate()),
            ("analysis", self.analysis.validate()),
            ("telemetry", self.telemetry.validate()),
        ]
        .into_iter()
        .filter_map(|(section, result)| result.err().map(|errors| (section, errors)))
        .flat_map(|(section, errors)| describe(section, &errors))
        .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems.join("; ")))
        }
    }
}

/// Flatten field errors into sorted `section.field: message` lines
fn describe(section: &str, errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{section}.{field}: {}",
                    error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string)
                )
            })
        })
        .collect();
    messages.sort();
    messages
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use application::AnalysisConfig;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::telemetry::{DEFAULT_LOG_FILTER, LogFormat};

    fn env_from(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        environment().source(Some(map))
    }

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = AppConfig::build(Some(&missing), env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn defaults_without_sources() {
        let config: AppConfig = config::Config::builder()
            .add_source(env_from(&[]))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn default_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn file_overrides_defaults() {
        let file = toml_file(
            r#"
[weather]
timeout_secs = 5
language = "de"

[analysis]
max_days_ahead = 7
enforce_date_window = false

[telemetry]
format = "json"
"#,
        );

        let config = AppConfig::build(Some(file.path()), env_from(&[])).unwrap();
        assert_eq!(config.weather.timeout_secs, 5);
        assert_eq!(config.weather.language, "de");
        assert_eq!(
            config.weather.forecast_base_url,
            "https://api.open-meteo.com/v1"
        );
        assert_eq!(config.analysis.max_days_ahead, 7);
        assert!(!config.analysis.enforce_date_window);
        assert_eq!(config.telemetry.format, LogFormat::Json);
        assert_eq!(config.telemetry.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn environment_overrides_file() {
        let file = toml_file("[weather]\ntimeout_secs = 5\n");
        let env = env_from(&[
            ("PARADECAST_WEATHER__TIMEOUT_SECS", "12"),
            ("PARADECAST_ANALYSIS__CALL_TIMEOUT_SECS", "3"),
        ]);

        let config = AppConfig::build(Some(file.path()), env).unwrap();
        assert_eq!(config.weather.timeout_secs, 12);
        assert_eq!(config.analysis.call_timeout_secs, 3);
    }

    #[test]
    fn unrelated_environment_is_ignored() {
        let file = toml_file("");
        let env = env_from(&[("OTHER_WEATHER__TIMEOUT_SECS", "1")]);

        let config = AppConfig::build(Some(file.path()), env).unwrap();
        assert_eq!(config.weather.timeout_secs, 30);
    }

    #[test]
    fn unknown_log_format_fails_to_load() {
        let file = toml_file("[telemetry]\nformat = \"xml\"\n");
        let err = AppConfig::build(Some(file.path()), env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn validation_runs_on_load() {
        let file = toml_file("[analysis]\nmax_days_ahead = 30\n");
        let err = AppConfig::build(Some(file.path()), env_from(&[])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(msg) if msg == "analysis.max_days_ahead: must be at most 16"
        ));
    }

    #[test]
    fn validate_rejects_url_without_host() {
        let mut config = AppConfig::default();
        config.weather.forecast_base_url = "https://".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(msg) if msg == "weather.forecast_base_url: must be a valid URL"
        ));
    }

    #[test]
    fn validate_reports_every_section() {
        let file = toml_file(
            "[weather]\nforecast_base_url = \"https://\"\n\n[telemetry]\nlog_filter = \"\"\n",
        );
        let env = env_from(&[("PARADECAST_ANALYSIS__CALL_TIMEOUT_SECS", "0")]);

        let err = AppConfig::build(Some(file.path()), env).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let msg = err.to_string();
        assert!(msg.contains("weather.forecast_base_url"));
        assert!(msg.contains("analysis.call_timeout_secs: must be greater than 0"));
        assert!(msg.contains("telemetry.log_filter: must not be empty"));
    }

    #[test]
    fn validate_rejects_non_http_url() {
        let mut config = AppConfig::default();
        config.weather.geocoding_base_url = "ftp://example.com".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: weather.geocoding_base_url: must use http or https"
        );
    }

    #[test]
    fn validate_rejects_zero_timeouts() {
        let mut config = AppConfig::default();
        config.weather.timeout_secs = 0;
        assert!(config.validate().is_err());

        let config = AppConfig {
            analysis: AnalysisConfig {
                call_timeout_secs: 0,
                ..AnalysisConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_language() {
        let mut config = AppConfig::default();
        config.weather.language = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn serializes_to_toml_sections() {
        let rendered = toml::to_string(&AppConfig::default()).unwrap();
        assert!(rendered.contains("[weather]"));
        assert!(rendered.contains("[analysis]"));
        assert!(rendered.contains("[telemetry]"));
    }
}
