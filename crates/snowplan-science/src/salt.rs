//! De-icing salt effectiveness.

use serde::Serialize;

/// Rock salt stops working below roughly this pavement temperature.
pub const SALT_INEFFECTIVE_BELOW_C: f64 = -15.0;

/// Rain rate at which salt is washed away as it is spread.
pub const SALT_WASHOUT_RAIN_MM: f64 = 0.5;

/// Outcome of the salt check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaltDecision {
    pub apply: bool,
    pub reason: &'static str,
    pub wait_for_rain: bool,
}

impl SaltDecision {
    fn skip(reason: &'static str) -> Self {
        Self {
            apply: false,
            reason,
            wait_for_rain: false,
        }
    }

    fn apply(reason: &'static str) -> Self {
        Self {
            apply: true,
            reason,
            wait_for_rain: false,
        }
    }
}

/// Decide whether salting is worthwhile.
///
/// Checks run in a fixed order: too cold for salt, rain washing it away,
/// then the freeze outlook.
pub fn salt_recommendation(
    current_temp: f64,
    forecast_min_temp: f64,
    snow_expected: bool,
    current_rain_rate: f64,
    rain_expected: bool,
) -> SaltDecision {
    if forecast_min_temp < SALT_INEFFECTIVE_BELOW_C {
        return SaltDecision::skip("Too cold for salt to work; use sand for traction instead");
    }

    if current_rain_rate > SALT_WASHOUT_RAIN_MM {
        return SaltDecision {
            apply: false,
            reason: "Rain would wash salt away; wait until it stops",
            wait_for_rain: true,
        };
    }

    let freeze_expected = forecast_min_temp <= 0.0;

    if rain_expected && !freeze_expected {
        return SaltDecision::skip("Rain expected with no freeze; salt not needed");
    }

    if freeze_expected && current_temp > 0.0 {
        return SaltDecision::apply("Freeze expected; salt now to prevent ice from bonding");
    }

    if snow_expected && freeze_expected {
        return SaltDecision::apply("Salt after clearing to stop the remaining layer from icing");
    }

    SaltDecision::skip("No icing risk; salt not needed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_cold_wins_over_everything() {
        let decision = salt_recommendation(2.0, -18.0, true, 3.0, true);
        assert!(!decision.apply);
        assert!(!decision.wait_for_rain);
        assert!(decision.reason.contains("sand"));
    }

    #[test]
    fn test_active_rain_waits() {
        let decision = salt_recommendation(1.0, -3.0, true, 2.0, true);
        assert!(!decision.apply);
        assert!(decision.wait_for_rain);
    }

    #[test]
    fn test_light_drizzle_does_not_wait() {
        let decision = salt_recommendation(1.0, -3.0, false, 0.3, false);
        assert!(!decision.wait_for_rain);
        assert!(decision.apply);
    }

    #[test]
    fn test_rain_without_freeze_skips() {
        let decision = salt_recommendation(4.0, 1.0, false, 0.0, true);
        assert!(!decision.apply);
        assert!(decision.reason.contains("no freeze"));
    }

    #[test]
    fn test_preventive_before_freeze() {
        let decision = salt_recommendation(3.0, -4.0, false, 0.0, false);
        assert!(decision.apply);
        assert!(decision.reason.contains("prevent"));
    }

    #[test]
    fn test_after_clearing_when_already_frozen() {
        let decision = salt_recommendation(-6.0, -9.0, true, 0.0, false);
        assert!(decision.apply);
        assert!(decision.reason.contains("after clearing"));
    }

    #[test]
    fn test_no_need_when_mild_and_dry() {
        let decision = salt_recommendation(5.0, 2.0, false, 0.0, false);
        assert!(!decision.apply);
    }

    #[test]
    fn test_cold_without_snow_needs_nothing() {
        let decision = salt_recommendation(-6.0, -9.0, false, 0.0, false);
        assert!(!decision.apply);
    }
}
