//! Accumulation thresholds in mm of net snow.

/// Below this, snow is left to melt or blow away.
pub const NEGLIGIBLE_MM: f64 = 10.0;
/// Light band upper bound; clearing is optional below it.
pub const LIGHT_MM: f64 = 25.0;
/// Moderate band upper bound.
pub const MODERATE_MM: f64 = 75.0;
/// Heavy band upper bound.
pub const HEAVY_MM: f64 = 150.0;
/// Above this, clear before the storm ends.
pub const VERY_HEAVY_MM: f64 = 200.0;

/// Overnight snowfall that blocks a morning departure.
pub const DRIVEWAY_BLOCKING_MM: f64 = 5.0;

/// Snowfall needed before rain turns it to slush.
pub const SLUSH_SNOW_MM: f64 = 5.0;
/// Hourly rain rate that turns fresh snow to slush.
pub const SLUSH_RAIN_RATE_MM: f64 = 1.0;
/// Forecast rain total that counts as "rain expected".
pub const RAIN_EXPECTED_MM: f64 = 2.0;
