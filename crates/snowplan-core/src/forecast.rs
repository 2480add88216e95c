use std::path::Path;

use snowplan_weather::{parse_open_meteo, Forecast};

use crate::error::ForecastError;

/// Read and normalize an Open-Meteo style forecast file
pub fn load_forecast(path: &Path) -> Result<Forecast, ForecastError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ForecastError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;

    let forecast = parse_open_meteo(&contents)?;
    tracing::info!(
        path = %path.display(),
        samples = forecast.hourly.len(),
        "Loaded forecast"
    );
    Ok(forecast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FORECAST: &str = r#"{
        "utc_offset_seconds": 0,
        "hourly": {
            "time": ["2026-01-10T00:00", "2026-01-10T01:00"],
            "temperature_2m": [-3.0, -4.0],
            "snowfall": [0.5, 0.2],
            "rain": [0.0, 0.0],
            "cloud_cover": [100, 90],
            "wind_speed_10m": [12.0, 8.0],
            "weather_code": [73, 71],
            "is_day": [0, 0]
        }
    }"#;

    #[test]
    fn test_load_forecast_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FORECAST.as_bytes()).unwrap();

        let forecast = load_forecast(file.path()).unwrap();
        assert_eq!(forecast.hourly.len(), 2);
        assert!((forecast.hourly[0].snowfall_mm - 5.0).abs() < 1e-9);
        assert_eq!(forecast.current.time, forecast.hourly[0].time);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_forecast(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ForecastError::Unreadable { .. }));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        let err = load_forecast(file.path()).unwrap_err();
        assert!(matches!(err, ForecastError::Invalid(_)));
    }
}
