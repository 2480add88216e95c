use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use snowplan_engine::{ComfortBands, PreferredWindow, UserParameters};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Prefix for environment overrides, e.g. `SNOWPLAN_CLEARING__AREA_M2=80`
const ENV_PREFIX: &str = "SNOWPLAN";

const DEPARTURE_FORMAT: &str = "%H:%M";

/// Largest real-world UTC offset, in minutes
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// All errors joined into one line
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The area being cleared and the user's schedule
    #[serde(default)]
    pub clearing: ClearingConfig,

    /// Temperature bands for describing snow events
    #[serde(default)]
    pub comfort: ComfortConfig,

    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearingConfig {
    /// Clearable area in m²
    pub area_m2: f64,

    /// Daily departure, local "HH:MM"
    pub departure_time: Option<String>,

    /// Reported plow pile height in mm
    pub plow_pile_mm: Option<f64>,

    /// Last time the area was cleared, RFC 3339
    pub last_cleared: Option<String>,

    /// Offset of the local clock from UTC, in minutes
    pub utc_offset_minutes: i32,

    /// Times of day you would rather clear, e.g. a morning and an evening slot
    pub preferred_windows: Vec<PreferredWindowConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferredWindowConfig {
    pub label: String,
    /// Local "HH:MM"
    pub start: String,
    /// Local "HH:MM"
    pub end: String,
}

impl PreferredWindowConfig {
    fn parse(&self) -> Result<PreferredWindow, ConfigError> {
        let start = parse_clock("start", &self.start)?;
        let end = parse_clock("end", &self.end)?;
        if start >= end {
            return Err(ConfigError::Invalid(format!(
                "window {:?} must start before it ends",
                self.label
            )));
        }
        Ok(PreferredWindow {
            label: self.label.clone(),
            start,
            end,
        })
    }
}

impl Default for ClearingConfig {
    fn default() -> Self {
        Self {
            area_m2: snowplan_engine::types::DEFAULT_AREA_M2,
            departure_time: None,
            plow_pile_mm: None,
            last_cleared: None,
            utc_offset_minutes: 0,
            preferred_windows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComfortConfig {
    pub cold_below_c: f64,
    pub warm_above_c: f64,
}

impl Default for ComfortConfig {
    fn default() -> Self {
        let bands = ComfortBands::default();
        Self {
            cold_below_c: bands.cold_below_c,
            warm_above_c: bands.warm_above_c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// How often callers should fetch a fresh forecast
    pub refresh_minutes: u32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            refresh_minutes: 30,
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, creating a default file if missing.
    ///
    /// `SNOWPLAN_*` environment variables override values from the file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Creating default config");
            Self::default().save_to(path)?;
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config = Self::layered(&contents, Self::environment())
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Fails when validation finds errors; warnings are logged.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// File contents with an environment source layered on top
    fn layered(contents: &str, env: config::Environment) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();
        let clearing = &self.clearing;

        if !clearing.area_m2.is_finite() || clearing.area_m2 <= 0.0 {
            result.add_error("clearing.area_m2", "Area must be greater than 0");
        } else if clearing.area_m2 > 5000.0 {
            result.add_warning("clearing.area_m2", "Area is unusually large (>5000 m²)");
        }

        if let Some(departure) = &clearing.departure_time {
            if let Err(e) = parse_departure(departure) {
                result.add_error("clearing.departure_time", e.to_string());
            }
        }

        if let Some(last) = &clearing.last_cleared {
            if let Err(e) = parse_last_cleared(last) {
                result.add_error("clearing.last_cleared", e.to_string());
            }
        }

        if let Some(pile) = clearing.plow_pile_mm {
            if !pile.is_finite() || pile < 0.0 {
                result.add_error("clearing.plow_pile_mm", "Pile height cannot be negative");
            }
        }

        for window in &clearing.preferred_windows {
            if window.label.trim().is_empty() {
                result.add_error("clearing.preferred_windows", "Label cannot be empty");
            }
            if let Err(e) = window.parse() {
                result.add_error("clearing.preferred_windows", e.to_string());
            }
        }

        if clearing.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            result.add_error(
                "clearing.utc_offset_minutes",
                format!("Offset must be within ±{} minutes", MAX_OFFSET_MINUTES),
            );
        }

        if self.comfort.cold_below_c >= self.comfort.warm_above_c {
            result.add_error("comfort", "cold_below_c must be lower than warm_above_c");
        }

        if self.weather.refresh_minutes == 0 {
            result.add_warning(
                "weather.refresh_minutes",
                "Weather refresh disabled (0 minutes)",
            );
        } else if self.weather.refresh_minutes > 1440 {
            result.add_warning(
                "weather.refresh_minutes",
                "Weather refresh interval is more than 24 hours",
            );
        }

        result
    }

    /// Engine parameters for the configured area
    pub fn user_parameters(&self) -> Result<UserParameters, ConfigError> {
        let clearing = &self.clearing;
        let utc_offset = FixedOffset::east_opt(clearing.utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "utc_offset_minutes out of range: {}",
                clearing.utc_offset_minutes
            ))
        })?;

        Ok(UserParameters {
            area_m2: clearing.area_m2,
            last_cleared: clearing
                .last_cleared
                .as_deref()
                .map(parse_last_cleared)
                .transpose()?,
            plow_pile_mm: clearing.plow_pile_mm,
            departure_time: clearing
                .departure_time
                .as_deref()
                .map(parse_departure)
                .transpose()?,
            utc_offset,
            comfort: ComfortBands {
                cold_below_c: self.comfort.cold_below_c,
                warm_above_c: self.comfort.warm_above_c,
            },
            preferred_windows: clearing
                .preferred_windows
                .iter()
                .map(PreferredWindowConfig::parse)
                .collect::<Result<_, _>>()?,
        })
    }

    /// Note that the area was cleared at `at`. A reported plow pile is
    /// considered cleared with it.
    pub fn record_cleared(&mut self, at: DateTime<Utc>) {
        self.clearing.last_cleared = Some(at.to_rfc3339());
        self.clearing.plow_pile_mm = None;
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("snowplan");

        Ok(config_dir.join("config.toml"))
    }
}

fn parse_departure(value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, DEPARTURE_FORMAT)
        .map_err(|_| ConfigError::Invalid(format!("departure time must be HH:MM, got {value:?}")))
}

fn parse_clock(field: &str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, DEPARTURE_FORMAT)
        .map_err(|_| ConfigError::Invalid(format!("window {field} must be HH:MM, got {value:?}")))
}

fn parse_last_cleared(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ConfigError::Invalid(format!("last_cleared must be RFC 3339, got {value:?}")))
}
