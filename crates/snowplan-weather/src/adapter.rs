//! Weather adapter boundary.
//!
//! Turns an Open-Meteo style hourly payload into the normalized [`Forecast`]
//! the recommendation engine consumes. All unit conversion and input
//! validation happens here; the engine assumes well-formed samples.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::types::{Forecast, SkyCondition, WeatherError, WeatherSample};

/// Open-Meteo reports snowfall in centimetres.
const MM_PER_CM: f64 = 10.0;

/// Raw current block
#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrent {
    pub time: String,
    pub temperature_2m: f64,
    #[serde(default)]
    pub snowfall: f64,
    #[serde(default)]
    pub rain: f64,
    #[serde(default)]
    pub cloud_cover: f64,
    #[serde(default)]
    pub wind_speed_10m: f64,
    #[serde(default)]
    pub weather_code: i32,
    #[serde(default)]
    pub is_day: u8,
}

/// Raw hourly block, parallel arrays indexed by hour
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHourly {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub snowfall: Vec<f64>,
    pub rain: Vec<f64>,
    pub cloud_cover: Vec<f64>,
    pub wind_speed_10m: Vec<f64>,
    pub weather_code: Vec<i32>,
    pub is_day: Vec<u8>,
}

/// Raw API response
#[derive(Debug, Clone, Deserialize)]
pub struct OpenMeteoResponse {
    #[serde(default)]
    pub utc_offset_seconds: i32,
    pub current: Option<RawCurrent>,
    #[serde(default)]
    pub hourly: RawHourly,
}

/// Parse and normalize a provider payload.
pub fn parse_open_meteo(json: &str) -> Result<Forecast, WeatherError> {
    let response: OpenMeteoResponse = serde_json::from_str(json)?;
    normalize(response)
}

/// Normalize an already-deserialized payload.
pub fn normalize(response: OpenMeteoResponse) -> Result<Forecast, WeatherError> {
    let offset = response.utc_offset_seconds;
    let hourly = normalize_hourly(&response.hourly, offset)?;

    let current = match response.current {
        Some(raw) => {
            let time = parse_timestamp(&raw.time, offset)?;
            let sample = WeatherSample {
                time,
                temperature_c: raw.temperature_2m,
                snowfall_mm: raw.snowfall * MM_PER_CM,
                rain_mm: raw.rain,
                cloud_cover_pct: raw.cloud_cover.clamp(0.0, 100.0),
                wind_speed_kmh: raw.wind_speed_10m,
                condition: SkyCondition::from_wmo_code(raw.weather_code),
                is_day: raw.is_day != 0,
            };
            check_sample(&sample).map_err(|reason| WeatherError::InvalidCurrent { reason })?;
            sample
        }
        None => hourly.first().cloned().ok_or(WeatherError::MissingCurrent)?,
    };

    tracing::debug!(
        samples = hourly.len(),
        current_temp = current.temperature_c,
        "Normalized forecast"
    );

    Ok(Forecast { current, hourly })
}

fn normalize_hourly(raw: &RawHourly, offset: i32) -> Result<Vec<WeatherSample>, WeatherError> {
    let expected = raw.time.len();
    check_len("temperature_2m", expected, raw.temperature_2m.len())?;
    check_len("snowfall", expected, raw.snowfall.len())?;
    check_len("rain", expected, raw.rain.len())?;
    check_len("cloud_cover", expected, raw.cloud_cover.len())?;
    check_len("wind_speed_10m", expected, raw.wind_speed_10m.len())?;
    check_len("weather_code", expected, raw.weather_code.len())?;
    check_len("is_day", expected, raw.is_day.len())?;

    let mut samples: Vec<WeatherSample> = Vec::with_capacity(expected);
    for i in 0..expected {
        let sample = WeatherSample {
            time: parse_timestamp(&raw.time[i], offset)?,
            temperature_c: raw.temperature_2m[i],
            snowfall_mm: raw.snowfall[i] * MM_PER_CM,
            rain_mm: raw.rain[i],
            cloud_cover_pct: raw.cloud_cover[i].clamp(0.0, 100.0),
            wind_speed_kmh: raw.wind_speed_10m[i],
            condition: SkyCondition::from_wmo_code(raw.weather_code[i]),
            is_day: raw.is_day[i] != 0,
        };
        check_sample(&sample)
            .map_err(|reason| WeatherError::InvalidSample { index: i, reason })?;

        if let Some(prev) = samples.last() {
            if sample.time <= prev.time {
                return Err(WeatherError::Unordered { index: i });
            }
        }
        samples.push(sample);
    }

    Ok(samples)
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<(), WeatherError> {
    if expected != actual {
        return Err(WeatherError::LengthMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Reason the sample is unusable, if any
fn check_sample(sample: &WeatherSample) -> Result<(), String> {
    let fields = [
        ("temperature", sample.temperature_c),
        ("snowfall", sample.snowfall_mm),
        ("rain", sample.rain_mm),
        ("cloud cover", sample.cloud_cover_pct),
        ("wind speed", sample.wind_speed_kmh),
    ];

    for (name, value) in fields {
        if !value.is_finite() {
            return Err(format!("{} is not a finite number", name));
        }
    }

    for (name, value) in [
        ("snowfall", sample.snowfall_mm),
        ("rain", sample.rain_mm),
        ("wind speed", sample.wind_speed_kmh),
    ] {
        if value < 0.0 {
            return Err(format!("{} is negative ({})", name, value));
        }
    }

    Ok(())
}

/// Parse a provider timestamp.
///
/// RFC 3339 strings carry their own offset. The provider's naive
/// `2026-01-10T06:00` form is local time at `utc_offset_seconds`.
pub fn parse_timestamp(s: &str, utc_offset_seconds: i32) -> Result<DateTime<Utc>, WeatherError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| WeatherError::InvalidTimestamp(s.to_string()))?;

    Ok(Utc.from_utc_datetime(&naive) - Duration::seconds(i64::from(utc_offset_seconds)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(snowfall: &str, times: &str) -> String {
        format!(
            r#"{{
                "utc_offset_seconds": 0,
                "hourly": {{
                    "time": {times},
                    "temperature_2m": [-4.0, -5.0],
                    "snowfall": {snowfall},
                    "rain": [0.0, 0.0],
                    "cloud_cover": [100, 90],
                    "wind_speed_10m": [12.0, 20.0],
                    "weather_code": [73, 75],
                    "is_day": [0, 1]
                }}
            }}"#
        )
    }

    #[test]
    fn test_snowfall_converted_from_cm() {
        let json = payload("[0.5, 1.2]", r#"["2026-01-10T06:00", "2026-01-10T07:00"]"#);
        let forecast = parse_open_meteo(&json).unwrap();
        assert_eq!(forecast.hourly.len(), 2);
        assert!((forecast.hourly[0].snowfall_mm - 5.0).abs() < 1e-9);
        assert!((forecast.hourly[1].snowfall_mm - 12.0).abs() < 1e-9);
        assert_eq!(forecast.hourly[1].condition, SkyCondition::HeavySnow);
        assert!(forecast.hourly[1].is_day);
    }

    #[test]
    fn test_missing_current_falls_back_to_first_hour() {
        let json = payload("[0.5, 1.2]", r#"["2026-01-10T06:00", "2026-01-10T07:00"]"#);
        let forecast = parse_open_meteo(&json).unwrap();
        assert_eq!(forecast.current, forecast.hourly[0]);
    }

    #[test]
    fn test_empty_payload_without_current_is_error() {
        let result = parse_open_meteo(r#"{"utc_offset_seconds": 0}"#);
        assert!(matches!(result, Err(WeatherError::MissingCurrent)));
    }

    #[test]
    fn test_negative_snowfall_rejected() {
        let json = payload("[0.5, -1.0]", r#"["2026-01-10T06:00", "2026-01-10T07:00"]"#);
        let result = parse_open_meteo(&json);
        assert!(matches!(result, Err(WeatherError::InvalidSample { index: 1, .. })));
    }

    #[test]
    fn test_unordered_timestamps_rejected() {
        let json = payload("[0.5, 1.0]", r#"["2026-01-10T07:00", "2026-01-10T06:00"]"#);
        let result = parse_open_meteo(&json);
        assert!(matches!(result, Err(WeatherError::Unordered { index: 1 })));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let json = payload("[0.5]", r#"["2026-01-10T06:00", "2026-01-10T07:00"]"#);
        let result = parse_open_meteo(&json);
        assert!(matches!(
            result,
            Err(WeatherError::LengthMismatch {
                field: "snowfall",
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_naive_timestamp_uses_offset() {
        let utc = parse_timestamp("2026-01-10T06:00", -5 * 3600).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2026, 1, 10, 11, 0, 0).unwrap());
    }

    #[test]
    fn test_rfc3339_timestamp_ignores_offset_argument() {
        let utc = parse_timestamp("2026-01-10T06:00:00+01:00", 7200).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2026, 1, 10, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_garbage_timestamp_rejected() {
        assert!(matches!(
            parse_timestamp("yesterday", 0),
            Err(WeatherError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_current_block_parsed() {
        let json = r#"{
            "utc_offset_seconds": 0,
            "current": {
                "time": "2026-01-10T06:15",
                "temperature_2m": 1.5,
                "snowfall": 0.3,
                "rain": 0.4,
                "cloud_cover": 120,
                "wind_speed_10m": 8.0,
                "weather_code": 66,
                "is_day": 1
            }
        }"#;
        let forecast = parse_open_meteo(json).unwrap();
        assert!(forecast.hourly.is_empty());
        assert!((forecast.current.snowfall_mm - 3.0).abs() < 1e-9);
        assert_eq!(forecast.current.cloud_cover_pct, 100.0);
        assert_eq!(forecast.current.condition, SkyCondition::FreezingRain);
    }

    #[test]
    fn test_bad_current_block_reported_without_index() {
        let json = r#"{
            "utc_offset_seconds": 0,
            "current": {
                "time": "2026-01-10T06:15",
                "temperature_2m": -2.0,
                "snowfall": 0.1,
                "rain": 0.0,
                "cloud_cover": 80,
                "wind_speed_10m": -3.0,
                "weather_code": 71,
                "is_day": 0
            }
        }"#;
        let err = parse_open_meteo(json).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidCurrent { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid current conditions: wind speed is negative (-3)"
        );
    }
}
