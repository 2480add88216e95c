//! Grouping of snowy hours into discrete snow events.

use chrono::Duration;
use snowplan_science::wind_chill;
use snowplan_weather::WeatherSample;

use crate::types::{Comfort, ComfortBands, SnowEvent};

/// Split the forecast into runs of back-to-back snowy hours.
pub fn snow_events(future: &[&WeatherSample], bands: &ComfortBands) -> Vec<SnowEvent> {
    let mut runs: Vec<Vec<&WeatherSample>> = Vec::new();

    for sample in future.iter().copied().filter(|s| s.snowfall_mm > 0.0) {
        match runs.last_mut() {
            Some(run)
                if run
                    .last()
                    .is_some_and(|prev| prev.time + Duration::hours(1) == sample.time) =>
            {
                run.push(sample)
            }
            _ => runs.push(vec![sample]),
        }
    }

    runs.iter()
        .filter_map(|run| summarize(run, bands))
        .collect()
}

fn summarize(run: &[&WeatherSample], bands: &ComfortBands) -> Option<SnowEvent> {
    let first = run.first()?;
    let last = run.last()?;
    let hours = run.len() as f64;

    let accumulation_mm = run.iter().map(|s| s.snowfall_mm).sum();
    let mean_temperature_c = run.iter().map(|s| s.temperature_c).sum::<f64>() / hours;
    let mean_wind = run.iter().map(|s| s.wind_speed_kmh).sum::<f64>() / hours;
    let feels_like_c = wind_chill(mean_temperature_c, mean_wind);

    Some(SnowEvent {
        start: first.time,
        end: last.time + Duration::hours(1),
        accumulation_mm,
        mean_temperature_c,
        feels_like_c,
        comfort: comfort_for(feels_like_c, bands),
    })
}

pub fn comfort_for(feels_like_c: f64, bands: &ComfortBands) -> Comfort {
    if feels_like_c < bands.cold_below_c {
        Comfort::Cold
    } else if feels_like_c > bands.warm_above_c {
        Comfort::Warm
    } else {
        Comfort::Comfortable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use snowplan_weather::SeriesBuilder;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_two_separate_events() {
        let series = SeriesBuilder::starting_at(t0())
            .temperature(-2.0)
            .snow(3.0)
            .hours(2)
            .dry()
            .hours(3)
            .snow(1.0)
            .hours(1)
            .build();
        let future: Vec<&WeatherSample> = series.iter().collect();
        let events = snow_events(&future, &ComfortBands::default());

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].start, t0());
        assert_eq!(events[0].end, t0() + Duration::hours(2));
        assert!((events[0].accumulation_mm - 6.0).abs() < 1e-9);
        assert_eq!(events[1].start, t0() + Duration::hours(5));
        assert_eq!(events[1].comfort, Comfort::Comfortable);
    }

    #[test]
    fn test_cold_windy_event() {
        let series = SeriesBuilder::starting_at(t0())
            .temperature(-8.0)
            .wind(30.0)
            .snow(5.0)
            .hours(3)
            .build();
        let future: Vec<&WeatherSample> = series.iter().collect();
        let events = snow_events(&future, &ComfortBands::default());

        assert_eq!(events.len(), 1);
        assert!(events[0].feels_like_c < -8.0);
        assert_eq!(events[0].comfort, Comfort::Cold);
    }

    #[test]
    fn test_warm_event_is_heavy() {
        assert_eq!(comfort_for(3.0, &ComfortBands::default()), Comfort::Warm);
        assert_eq!(Comfort::Warm.advice(), "snow may be heavy");
    }

    #[test]
    fn test_no_events_without_snow() {
        let series = SeriesBuilder::starting_at(t0()).hours(5).build();
        let future: Vec<&WeatherSample> = series.iter().collect();
        assert!(snow_events(&future, &ComfortBands::default()).is_empty());
    }
}
