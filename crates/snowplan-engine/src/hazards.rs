//! Hazard checks that can force action regardless of total accumulation,
//! plus the freeze and wind context used for timing.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};
use snowplan_science::thresholds::{
    DRIVEWAY_BLOCKING_MM, RAIN_EXPECTED_MM, SLUSH_RAIN_RATE_MM, SLUSH_SNOW_MM,
};
use snowplan_weather::WeatherSample;

use crate::window::WindowTotals;

/// Local hour at which the overnight accumulation window opens.
const EVENING_HOUR: u32 = 18;

/// Independent hazard flags. Each is evaluated whatever the urgency path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hazards {
    pub plow_pile: bool,
    pub driveway_blocking: bool,
    pub slush: bool,
}

/// Rain landing on snow.
///
/// Either a snowy forecast hour is immediately followed by a rainy one, or
/// snow already on the ground will be rained on. Both need enough snow in
/// total to matter.
pub fn slush_hazard(
    future: &[&WeatherSample],
    past: &WindowTotals,
    future_totals: &WindowTotals,
    total_snowfall_mm: f64,
) -> bool {
    let rain_follows_snow = future
        .windows(2)
        .any(|pair| pair[0].snowfall_mm > 0.0 && pair[1].rain_mm > SLUSH_RAIN_RATE_MM);
    let rain_on_existing =
        past.snowfall_mm > SLUSH_SNOW_MM && future_totals.rain_mm > RAIN_EXPECTED_MM;

    (rain_follows_snow || rain_on_existing) && total_snowfall_mm > SLUSH_SNOW_MM
}

/// A manually reported plow pile always counts.
pub fn plow_pile_detected(pile_height_mm: Option<f64>) -> bool {
    matches!(pile_height_mm, Some(h) if h > 0.0)
}

pub(crate) fn to_utc(local: chrono::NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(
        local - Duration::seconds(i64::from(offset.local_minus_utc())),
        Utc,
    )
}

/// Next occurrence of the departure time: today if still ahead, else tomorrow.
pub fn next_departure(
    now: DateTime<Utc>,
    departure: NaiveTime,
    offset: FixedOffset,
) -> DateTime<Utc> {
    let local_today = now.with_timezone(&offset).date_naive();
    let today = to_utc(local_today.and_time(departure), offset);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// The 18:00 local time immediately preceding `departure`.
pub fn overnight_start(departure: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let local = departure.with_timezone(&offset).naive_local();
    let evening = NaiveTime::from_hms_opt(EVENING_HOUR, 0, 0).unwrap_or_default();
    let same_day = to_utc(local.date().and_time(evening), offset);
    if same_day < departure {
        same_day
    } else {
        same_day - Duration::days(1)
    }
}

/// Snow between the evening cutoff and departure, as `(start, departure, mm)`.
///
/// Snow before `counted_from` (the last clearing) is already gone, so the
/// window opens at whichever of the two is later.
pub fn overnight_snowfall(
    hourly: &[WeatherSample],
    now: DateTime<Utc>,
    counted_from: DateTime<Utc>,
    departure_time: NaiveTime,
    offset: FixedOffset,
) -> (DateTime<Utc>, DateTime<Utc>, f64) {
    let departure = next_departure(now, departure_time, offset);
    let start = overnight_start(departure, offset).max(counted_from);
    let snowfall = hourly
        .iter()
        .filter(|s| start <= s.time && s.time < departure)
        .map(|s| s.snowfall_mm)
        .sum();
    (start, departure, snowfall)
}

/// Whether overnight snow will block a departure.
pub fn driveway_blocked(overnight_snowfall_mm: f64) -> bool {
    overnight_snowfall_mm >= DRIVEWAY_BLOCKING_MM
}

/// First forecast hour after `now` that drops below freezing.
///
/// `None` when it is already below freezing: there is no new deadline.
pub fn freeze_deadline(
    current_temp_c: f64,
    future: &[&WeatherSample],
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if current_temp_c < 0.0 {
        return None;
    }
    future
        .iter()
        .find(|s| s.time > now && s.temperature_c < 0.0)
        .map(|s| s.time)
}

/// Lowest forecast temperature, falling back to the current reading.
pub fn forecast_min_temp(future: &[&WeatherSample], current_temp_c: f64) -> f64 {
    future
        .iter()
        .map(|s| s.temperature_c)
        .reduce(f64::min)
        .unwrap_or(current_temp_c)
}

/// Mean forecast wind, falling back to the current reading.
pub fn forecast_mean_wind(future: &[&WeatherSample], current_wind_kmh: f64) -> f64 {
    if future.is_empty() {
        return current_wind_kmh;
    }
    let total: f64 = future.iter().map(|s| s.wind_speed_kmh).sum();
    total / future.len() as f64
}
