//! Melting and net accumulation.

use crate::thresholds::VERY_HEAVY_MM;

/// Fresh snow melted per mm of rain.
const RAIN_MELT_RATIO: f64 = 10.0;

/// Share of solar radiation a full overcast blocks.
const MAX_CLOUD_BLOCKING: f64 = 0.8;

/// Snow melted by rain, in mm.
pub fn melt_from_rain(rain_mm: f64) -> f64 {
    (rain_mm * RAIN_MELT_RATIO).max(0.0)
}

/// Base solar melt rate in mm/h for an air temperature band.
fn solar_rate(temp_c: f64) -> f64 {
    if temp_c <= 5.0 {
        0.5
    } else if temp_c <= 10.0 {
        2.0
    } else {
        5.0
    }
}

/// Snow melted by sunshine over `hours`, in mm.
///
/// Zero at night and at or below freezing. Cloud cover scales the rate down
/// by up to 80%.
pub fn melt_from_sun(temp_c: f64, cloud_pct: f64, hours: f64, is_day: bool) -> f64 {
    if !is_day || temp_c <= 0.0 {
        return 0.0;
    }
    let cloud_factor = 1.0 - (cloud_pct / 100.0) * MAX_CLOUD_BLOCKING;
    solar_rate(temp_c) * cloud_factor * hours
}

/// Snow remaining after rain and solar melt, floored at zero.
pub fn net_accumulation(snow_mm: f64, rain_mm: f64, solar_melt_mm: f64) -> f64 {
    (snow_mm - melt_from_rain(rain_mm) - solar_melt_mm).max(0.0)
}

/// Whether accumulation is heavy enough to clear before the storm ends.
pub fn should_act_mid_storm(accum_mm: f64) -> bool {
    accum_mm > VERY_HEAVY_MM
}
