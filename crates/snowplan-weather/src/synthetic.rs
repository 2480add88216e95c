//! Synthetic hourly series for demos and tests.

use chrono::{DateTime, Duration, Utc};

use crate::types::{Forecast, SkyCondition, WeatherSample};

/// Builds a contiguous hourly series starting at a fixed instant.
///
/// Each `hours` call appends `count` identical samples; the builder keeps the
/// running clock so segments chain without gaps.
#[derive(Debug, Clone)]
pub struct SeriesBuilder {
    next: DateTime<Utc>,
    template: WeatherSample,
    samples: Vec<WeatherSample>,
}

impl SeriesBuilder {
    /// Start a series at `start` with a calm, dry, −5 °C template.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            next: start,
            template: WeatherSample::calm(start, -5.0),
            samples: Vec::new(),
        }
    }

    pub fn temperature(mut self, temperature_c: f64) -> Self {
        self.template.temperature_c = temperature_c;
        self
    }

    pub fn snow(mut self, snowfall_mm: f64) -> Self {
        self.template.snowfall_mm = snowfall_mm;
        self.template.condition = if snowfall_mm >= 5.0 {
            SkyCondition::HeavySnow
        } else if snowfall_mm > 0.0 {
            SkyCondition::Snow
        } else {
            SkyCondition::Cloudy
        };
        self
    }

    pub fn rain(mut self, rain_mm: f64) -> Self {
        self.template.rain_mm = rain_mm;
        if rain_mm > 0.0 && self.template.snowfall_mm == 0.0 {
            self.template.condition = SkyCondition::Rain;
        }
        self
    }

    pub fn wind(mut self, wind_speed_kmh: f64) -> Self {
        self.template.wind_speed_kmh = wind_speed_kmh;
        self
    }

    pub fn clouds(mut self, cloud_cover_pct: f64) -> Self {
        self.template.cloud_cover_pct = cloud_cover_pct;
        self
    }

    pub fn daylight(mut self, is_day: bool) -> Self {
        self.template.is_day = is_day;
        self
    }

    /// Reset precipitation to dry while keeping temperature and wind.
    pub fn dry(self) -> Self {
        self.snow(0.0).rain(0.0)
    }

    /// Append `count` hourly samples using the current template.
    pub fn hours(mut self, count: u32) -> Self {
        for _ in 0..count {
            self.samples.push(WeatherSample {
                time: self.next,
                ..self.template.clone()
            });
            self.next += Duration::hours(1);
        }
        self
    }

    pub fn build(self) -> Vec<WeatherSample> {
        self.samples
    }

    /// Finish the series with `current` taken from the sample covering `now`,
    /// or a calm sample at `now` if none does.
    pub fn build_forecast(self, now: DateTime<Utc>) -> Forecast {
        let current = self
            .samples
            .iter()
            .rev()
            .find(|s| s.time <= now && now < s.time + Duration::hours(1))
            .cloned()
            .map(|s| WeatherSample { time: now, ..s })
            .unwrap_or_else(|| WeatherSample {
                time: now,
                ..self.template.clone()
            });
        Forecast {
            current,
            hourly: self.samples,
        }
    }
}
