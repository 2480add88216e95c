//! Wind effects: perceived temperature and compaction.

/// Wind chill in °C.
///
/// Only defined for air at or below 10 °C with wind of at least 4.8 km/h;
/// outside that range the air temperature is returned unchanged.
pub fn wind_chill(temp_c: f64, wind_kmh: f64) -> f64 {
    if temp_c > 10.0 || wind_kmh < 4.8 {
        return temp_c;
    }
    let w = wind_kmh.powf(0.16);
    let chill = 13.12 + 0.6215 * temp_c - 11.37 * w + 0.3965 * temp_c * w;
    (chill * 10.0).round() / 10.0
}

/// How much faster wind packs fallen snow.
pub fn wind_compaction_factor(wind_kmh: f64) -> f64 {
    if wind_kmh < 10.0 {
        1.0
    } else if wind_kmh < 25.0 {
        1.2
    } else if wind_kmh < 40.0 {
        1.5
    } else {
        2.0
    }
}

/// Shrink a clearing window under wind, never below half an hour.
pub fn adjust_window_for_wind(base_hours: f64, wind_kmh: f64) -> f64 {
    (base_hours / wind_compaction_factor(wind_kmh)).max(0.5)
}
