//! Configuration management for the weather pipeline
//!
//! Settings come from an optional TOML file, then `WEATHER_PIPELINE__*`
//! environment overrides, then the three pipeline variables the CI job sets:
//! `LOCATION`, `WEATHER_API_KEY` and `WEATHER_UNITS`.

use crate::models::UnitsMode;
use crate::{PipelineError, Result};
use anyhow::Context;
use config::{Config, Environment, File, FileFormat, Map};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Settings file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "weather-pipeline.toml";

pub const LOCATION_VAR: &str = "LOCATION";
pub const API_KEY_VAR: &str = "WEATHER_API_KEY";
pub const UNITS_VAR: &str = "WEATHER_UNITS";

const ENV_OVERRIDE_PREFIX: &str = "WEATHER_PIPELINE";
const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Free-text query resolved by the validator (`LOCATION`)
    pub location: Option<String>,
    pub geocoder: GeocoderConfig,
    pub weather: WeatherConfig,
    pub handoff: HandoffConfig,
    pub logging: LoggingConfig,
}

/// Geocoding service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// Client identifier sent as the HTTP user agent
    pub user_agent: String,
    pub timeout_seconds: u64,
}

/// Weather service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// `WEATHER_API_KEY`
    pub api_key: Option<String>,
    /// `WEATHER_UNITS`
    pub units: UnitsMode,
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Hand-off file locations, relative to the working directory
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HandoffConfig {
    pub location_file: PathBuf,
    pub weather_file: PathBuf,
}

/// Logging configuration settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "gitlab-weather-app".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            units: UnitsMode::default(),
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            location_file: PathBuf::from("validated_location.txt"),
            weather_file: PathBuf::from("weather_data.txt"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl GeocoderConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl WeatherConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl PipelineConfig {
    /// Load configuration from the specified path (or the default file) and
    /// the process environment
    pub fn load_from_path(config_path: Option<PathBuf>) -> anyhow::Result<Self> {
        Self::load_with_env(config_path, None, |name| env::var(name).ok())
    }

    /// Load configuration with an explicit environment.
    ///
    /// `overrides` replaces the process environment as the source of
    /// `WEATHER_PIPELINE__*` keys when given; `lookup` resolves the pipeline
    /// variables.
    fn load_with_env<F>(
        config_path: Option<PathBuf>,
        overrides: Option<Map<String, String>>,
        lookup: F,
    ) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let settings = Config::builder()
            .add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(FileFormat::Toml),
            )
            .add_source(
                Environment::with_prefix(ENV_OVERRIDE_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(overrides),
            )
            .build()
            .with_context(|| format!("Failed to read settings from {}", config_file.display()))?;

        let mut config: PipelineConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_env(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Apply the pipeline variables on top of file settings
    ///
    /// Values are stored as-is: an empty `WEATHER_UNITS` is sent verbatim and
    /// reported in Kelvin, while empty `LOCATION` and `WEATHER_API_KEY` are
    /// rejected by the `require_*` accessors.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(location) = lookup(LOCATION_VAR) {
            self.location = Some(location);
        }
        if let Some(api_key) = lookup(API_KEY_VAR) {
            self.weather.api_key = Some(api_key);
        }
        if let Some(units) = lookup(UNITS_VAR) {
            self.weather.units = UnitsMode::from_raw(&units);
        }
    }

    /// Location query, failing when unset or empty
    pub fn require_location(&self) -> Result<&str> {
        match self.location.as_deref() {
            Some(location) if !location.is_empty() => Ok(location),
            _ => Err(PipelineError::missing_config(LOCATION_VAR, "")),
        }
    }

    /// Weather API key, failing when unset or empty
    pub fn require_api_key(&self) -> Result<&str> {
        match self.weather.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(PipelineError::missing_config(
                API_KEY_VAR,
                "Add it in Settings → CI/CD → Variables",
            )),
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        Self::validate_timeout("geocoder", self.geocoder.timeout_seconds)?;
        Self::validate_timeout("weather", self.weather.timeout_seconds)?;
        Self::validate_base_url("geocoder", &self.geocoder.base_url)?;
        Self::validate_base_url("weather", &self.weather.base_url)?;

        if self.geocoder.user_agent.trim().is_empty() {
            return Err(PipelineError::config("Geocoder user agent cannot be empty"));
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PipelineError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PipelineError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        Ok(())
    }

    fn validate_timeout(service: &str, seconds: u64) -> Result<()> {
        if seconds == 0 || seconds > MAX_TIMEOUT_SECONDS {
            return Err(PipelineError::config(format!(
                "{service} timeout must be between 1 and {MAX_TIMEOUT_SECONDS} seconds"
            )));
        }
        Ok(())
    }

    fn validate_base_url(service: &str, url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::config(format!(
                "{service} base URL must be a valid HTTP or HTTPS URL"
            )));
        }
        Ok(())
    }
}
