//! Time windows and per-window accumulation totals.

use chrono::{DateTime, Duration, Utc};
use snowplan_science::melt_from_sun;
use snowplan_weather::WeatherSample;

/// How far back and ahead the engine looks.
pub const LOOKAROUND_HOURS: i64 = 24;

/// A closed interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Accumulation since the last clearing, or over the last day if that
    /// was longer ago or never happened.
    pub fn past(now: DateTime<Utc>, last_cleared: Option<DateTime<Utc>>) -> Self {
        let day_ago = now - Duration::hours(LOOKAROUND_HOURS);
        let start = match last_cleared {
            Some(cleared) => cleared.max(day_ago),
            None => day_ago,
        };
        Self { start, end: now }
    }

    pub fn future(now: DateTime<Utc>) -> Self {
        Self {
            start: now,
            end: now + Duration::hours(LOOKAROUND_HOURS),
        }
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }

    /// Samples inside the window, in series order.
    pub fn select<'a>(&self, hourly: &'a [WeatherSample]) -> Vec<&'a WeatherSample> {
        hourly.iter().filter(|s| self.contains(s.time)).collect()
    }
}

/// Sums over one window. Samples are hourly, so a rate summed over samples
/// is a depth in mm.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowTotals {
    pub snowfall_mm: f64,
    pub rain_mm: f64,
    pub solar_melt_mm: f64,
    pub samples: usize,
}

impl WindowTotals {
    pub fn over<'a, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = &'a WeatherSample>,
    {
        samples
            .into_iter()
            .fold(Self::default(), |acc, s| acc.with_sample(s))
    }

    fn with_sample(self, s: &WeatherSample) -> Self {
        Self {
            snowfall_mm: self.snowfall_mm + s.snowfall_mm,
            rain_mm: self.rain_mm + s.rain_mm,
            solar_melt_mm: self.solar_melt_mm
                + melt_from_sun(s.temperature_c, s.cloud_cover_pct, 1.0, s.is_day),
            samples: self.samples + 1,
        }
    }

    pub fn combined(self, other: Self) -> Self {
        Self {
            snowfall_mm: self.snowfall_mm + other.snowfall_mm,
            rain_mm: self.rain_mm + other.rain_mm,
            solar_melt_mm: self.solar_melt_mm + other.solar_melt_mm,
            samples: self.samples + other.samples,
        }
    }
}

/// First and last snowy hours of the forecast window.
///
/// The stop time is the top of the hour after the last snowy sample.
pub fn snow_span(future: &[&WeatherSample]) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let start = future.iter().find(|s| s.snowfall_mm > 0.0).map(|s| s.time);
    let stop = future
        .iter()
        .rev()
        .find(|s| s.snowfall_mm > 0.0)
        .map(|s| s.time + Duration::hours(1));
    (start, stop)
}
