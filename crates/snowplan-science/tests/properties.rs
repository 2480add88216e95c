//! Property tests for the snow science formulas.

use proptest::prelude::*;
use snowplan_science::{
    adjust_window_for_wind, manpower_minutes, melt_from_rain, melt_from_sun, net_accumulation,
    wind_chill, wind_compaction_factor,
};

proptest! {
    #[test]
    fn prop_rain_melt_is_ten_to_one(rain in 0.0f64..500.0) {
        prop_assert!((melt_from_rain(rain) - 10.0 * rain).abs() < 1e-9);
    }

    #[test]
    fn prop_net_accumulation_never_negative(
        snow in 0.0f64..1000.0,
        rain in 0.0f64..100.0,
        solar in 0.0f64..200.0,
    ) {
        prop_assert!(net_accumulation(snow, rain, solar) >= 0.0);
    }

    #[test]
    fn prop_sun_melt_never_negative(
        temp in -30.0f64..30.0,
        cloud in 0.0f64..=100.0,
        hours in 0.0f64..24.0,
        is_day in any::<bool>(),
    ) {
        prop_assert!(melt_from_sun(temp, cloud, hours, is_day) >= 0.0);
    }

    #[test]
    fn prop_more_cloud_never_melts_more(
        temp in 0.1f64..30.0,
        a in 0.0f64..=100.0,
        b in 0.0f64..=100.0,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(melt_from_sun(temp, high, 1.0, true) <= melt_from_sun(temp, low, 1.0, true));
    }

    #[test]
    fn prop_wind_window_bounded(base in 0.0f64..12.0, wind in 0.0f64..120.0) {
        let window = adjust_window_for_wind(base, wind);
        prop_assert!(window >= 0.5);
        prop_assert!(window <= base.max(0.5));
        prop_assert!(wind_compaction_factor(wind) >= 1.0);
    }

    #[test]
    fn prop_wind_chill_never_warmer(temp in -40.0f64..10.0, wind in 4.8f64..100.0) {
        // Rounding to one decimal can nudge the result up by at most 0.05
        prop_assert!(wind_chill(temp, wind) <= temp + 0.05);
    }

    #[test]
    fn prop_deeper_snow_never_faster(
        area in 1.0f64..500.0,
        a in 0.0f64..400.0,
        b in 0.0f64..400.0,
    ) {
        let (shallow, deep) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(manpower_minutes(area, deep) >= manpower_minutes(area, shallow));
    }
}
