//! Clearing effort.

/// Area one person clears per minute (m²/min) at a given snow depth.
pub fn clearing_rate(depth_mm: f64) -> f64 {
    if depth_mm < 50.0 {
        2.5
    } else if depth_mm < 100.0 {
        1.5
    } else if depth_mm < 200.0 {
        0.8
    } else {
        0.4
    }
}

/// Minutes for one person to clear `area_m2` at `depth_mm`, rounded up.
pub fn manpower_minutes(area_m2: f64, depth_mm: f64) -> u32 {
    let minutes = (area_m2.max(0.0) / clearing_rate(depth_mm)).ceil();
    minutes as u32
}
