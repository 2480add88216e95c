use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sky condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SkyCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    FreezingRain,
    Snow,
    HeavySnow,
    Thunderstorm,
}

impl SkyCondition {
    /// Convert WMO weather code to SkyCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 | 66 | 67 => Self::FreezingRain,
            61 | 63 | 80 => Self::Rain,
            65 | 81 | 82 => Self::HeavyRain,
            71 | 73 | 77 | 85 => Self::Snow,
            75 | 86 => Self::HeavySnow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Clear, // Unknown codes default to clear
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::FreezingRain => "Freezing Rain",
            Self::Snow => "Snow",
            Self::HeavySnow => "Heavy Snow",
            Self::Thunderstorm => "Thunderstorm",
        }
    }

    /// Whether the condition itself reports falling snow
    pub fn is_snowing(&self) -> bool {
        matches!(self, Self::Snow | Self::HeavySnow)
    }
}

/// One hour of normalized forecast data.
///
/// Units are fixed at the adapter boundary: °C, mm of snow-water-equivalent
/// per hour, mm/h of rain, percent cloud cover and km/h wind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub time: DateTime<Utc>,
    pub temperature_c: f64,
    pub snowfall_mm: f64,
    pub rain_mm: f64,
    pub cloud_cover_pct: f64,
    pub wind_speed_kmh: f64,
    pub condition: SkyCondition,
    pub is_day: bool,
}

impl WeatherSample {
    /// A dry, calm, overcast sample at the given time and temperature.
    pub fn calm(time: DateTime<Utc>, temperature_c: f64) -> Self {
        Self {
            time,
            temperature_c,
            snowfall_mm: 0.0,
            rain_mm: 0.0,
            cloud_cover_pct: 100.0,
            wind_speed_kmh: 0.0,
            condition: SkyCondition::Cloudy,
            is_day: false,
        }
    }

    /// Any precipitation falling during this hour
    pub fn is_precipitating(&self) -> bool {
        self.snowfall_mm > 0.0 || self.rain_mm > 0.0
    }
}

/// Current conditions share the hourly sample shape.
pub type CurrentConditions = WeatherSample;

/// A normalized forecast as handed to the recommendation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub current: CurrentConditions,
    pub hourly: Vec<WeatherSample>,
}

/// Weather adapter errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Hourly field `{field}` has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Invalid sample at index {index}: {reason}")]
    InvalidSample { index: usize, reason: String },
    #[error("Invalid current conditions: {reason}")]
    InvalidCurrent { reason: String },
    #[error("Samples out of order at index {index}")]
    Unordered { index: usize },
    #[error("Forecast has no current conditions and no hourly samples")]
    MissingCurrent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wmo_code_clear() {
        assert_eq!(SkyCondition::from_wmo_code(0), SkyCondition::Clear);
    }

    #[test]
    fn test_wmo_code_snow() {
        assert_eq!(SkyCondition::from_wmo_code(71), SkyCondition::Snow);
        assert_eq!(SkyCondition::from_wmo_code(73), SkyCondition::Snow);
        assert_eq!(SkyCondition::from_wmo_code(77), SkyCondition::Snow);
        assert_eq!(SkyCondition::from_wmo_code(85), SkyCondition::Snow);
    }

    #[test]
    fn test_wmo_code_heavy_snow() {
        assert_eq!(SkyCondition::from_wmo_code(75), SkyCondition::HeavySnow);
        assert_eq!(SkyCondition::from_wmo_code(86), SkyCondition::HeavySnow);
        assert!(SkyCondition::HeavySnow.is_snowing());
    }

    #[test]
    fn test_wmo_code_freezing_rain() {
        assert_eq!(SkyCondition::from_wmo_code(56), SkyCondition::FreezingRain);
        assert_eq!(SkyCondition::from_wmo_code(67), SkyCondition::FreezingRain);
        assert!(!SkyCondition::FreezingRain.is_snowing());
    }

    #[test]
    fn test_wmo_code_unknown_defaults_to_clear() {
        assert_eq!(SkyCondition::from_wmo_code(999), SkyCondition::Clear);
        assert_eq!(SkyCondition::from_wmo_code(-1), SkyCondition::Clear);
    }

    #[test]
    fn test_condition_description() {
        assert_eq!(SkyCondition::Clear.description(), "Clear");
        assert_eq!(SkyCondition::HeavySnow.description(), "Heavy Snow");
    }

    #[test]
    fn test_calm_sample_is_dry() {
        let t = Utc.with_ymd_and_hms(2026, 1, 10, 6, 0, 0).unwrap();
        let sample = WeatherSample::calm(t, -3.0);
        assert!(!sample.is_precipitating());
        assert_eq!(sample.temperature_c, -3.0);
    }

    #[test]
    fn test_precipitating_on_rain_only() {
        let t = Utc.with_ymd_and_hms(2026, 1, 10, 6, 0, 0).unwrap();
        let sample = WeatherSample {
            rain_mm: 0.2,
            ..WeatherSample::calm(t, 2.0)
        };
        assert!(sample.is_precipitating());
    }
}
