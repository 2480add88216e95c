//! Recommendation engine.
//!
//! A pure function from (hourly series, current conditions, user parameters,
//! now) to a [`Recommendation`]. No clock reads, no I/O, no shared state:
//! identical inputs always produce an identical recommendation.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use snowplan_science::thresholds::{LIGHT_MM, NEGLIGIBLE_MM, RAIN_EXPECTED_MM, VERY_HEAVY_MM};
use snowplan_science::{
    adjust_window_for_wind, manpower_minutes, net_accumulation, salt_recommendation,
    should_act_mid_storm, wind_compaction_factor,
};
use snowplan_weather::{CurrentConditions, WeatherSample};

use crate::events::snow_events;
use crate::hazards::{
    driveway_blocked, forecast_mean_wind, forecast_min_temp, freeze_deadline,
    overnight_snowfall, plow_pile_detected, slush_hazard, Hazards,
};
use crate::rules::{band_for, first_override, OVERRIDE_RULES};
use crate::suggest::alternative_times;
use crate::types::{Recommendation, SaltAdvice, Urgency, UserParameters};
use crate::window::{snow_span, TimeWindow, WindowTotals};

/// Safe window after snow stops before it starts to compact, in hours.
pub const BASE_CLEARING_WINDOW_HOURS: f64 = 2.0;

/// How far ahead of a freeze to finish clearing.
pub const FREEZE_MARGIN_MINUTES: i64 = 30;

/// Salt spread per m² of cleared area.
pub const SALT_GRAMS_PER_M2: f64 = 20.0;

/// Everything the urgency decision reads.
struct Context {
    now: DateTime<Utc>,
    offset: FixedOffset,
    net_mm: f64,
    total_snowfall_mm: f64,
    precipitating: bool,
    current_temp_c: f64,
    snow_stop: Option<DateTime<Utc>>,
    freeze: Option<DateTime<Utc>>,
    mean_wind_kmh: f64,
}

struct Decision {
    should_act: bool,
    urgency: Urgency,
    message: String,
    optimal_time: Option<DateTime<Utc>>,
}

impl Decision {
    fn act_now(urgency: Urgency, message: &str, now: DateTime<Utc>) -> Self {
        Self {
            should_act: true,
            urgency,
            message: message.to_string(),
            optimal_time: Some(now),
        }
    }

    fn wait(urgency: Urgency, message: &str) -> Self {
        Self {
            should_act: false,
            urgency,
            message: message.to_string(),
            optimal_time: None,
        }
    }
}

/// Produce a recommendation for one point in time.
pub fn recommend(
    hourly: &[WeatherSample],
    current: &CurrentConditions,
    params: &UserParameters,
    now: DateTime<Utc>,
) -> Recommendation {
    let past_window = TimeWindow::past(now, params.last_cleared);
    let future_window = TimeWindow::future(now);
    let past = past_window.select(hourly);
    let future = future_window.select(hourly);

    let past_totals = WindowTotals::over(past.iter().copied());
    let future_totals = WindowTotals::over(future.iter().copied());
    let totals = past_totals.combined(future_totals);
    let net_mm = net_accumulation(totals.snowfall_mm, totals.rain_mm, totals.solar_melt_mm);
    let (snow_start, snow_stop) = snow_span(&future);

    tracing::debug!(
        past_start = %past_window.start,
        past_samples = past_totals.samples,
        future_samples = future_totals.samples,
        snowfall_mm = totals.snowfall_mm,
        rain_mm = totals.rain_mm,
        solar_melt_mm = totals.solar_melt_mm,
        net_mm,
        "Aggregated accumulation"
    );

    let driveway_blocking = params.departure_time.is_some_and(|departure| {
        let (start, at, mm) = overnight_snowfall(
            hourly,
            now,
            past_window.start,
            departure,
            params.utc_offset,
        );
        tracing::debug!(%start, departure = %at, overnight_mm = mm, "Overnight window");
        driveway_blocked(mm)
    });
    let hazards = Hazards {
        plow_pile: plow_pile_detected(params.plow_pile_mm),
        driveway_blocking,
        slush: slush_hazard(&future, &past_totals, &future_totals, totals.snowfall_mm),
    };

    let ctx = Context {
        now,
        offset: params.utc_offset,
        net_mm,
        total_snowfall_mm: totals.snowfall_mm,
        precipitating: current.is_precipitating(),
        current_temp_c: current.temperature_c,
        snow_stop,
        freeze: freeze_deadline(current.temperature_c, &future, now),
        mean_wind_kmh: forecast_mean_wind(&future, current.wind_speed_kmh),
    };

    let since = if params.last_cleared == Some(past_window.start) {
        "since you last cleared"
    } else {
        "over the last 24 hours"
    };
    let mut reasoning = vec![format!(
        "{:.1} mm of snow fell {} and {:.1} mm is forecast for the next 24 hours",
        past_totals.snowfall_mm, since, future_totals.snowfall_mm
    )];

    let decision = decide(&ctx, &hazards, &mut reasoning);
    tracing::debug!(
        urgency = %decision.urgency,
        should_act = decision.should_act,
        "Urgency decided"
    );

    let effort_minutes = decision
        .should_act
        .then(|| manpower_minutes(params.area_m2, net_mm));
    if let Some(minutes) = effort_minutes {
        reasoning.push(format!(
            "Clearing {:.0} m² should take one person about {} minutes",
            params.area_m2, minutes
        ));
    }

    let salt = salt_advice(
        current,
        &future,
        &future_totals,
        totals.snowfall_mm,
        params.area_m2,
        decision.optimal_time,
        now,
        params.utc_offset,
    );
    if let Some(timing) = &salt.timing {
        reasoning.push(format!("Salt: {}", timing));
    }

    let events = snow_events(&future, &params.comfort);
    let suggested_times = match events.last() {
        Some(event) if decision.should_act => {
            alternative_times(event, &params.preferred_windows, params.utc_offset)
        }
        _ => Vec::new(),
    };

    Recommendation {
        should_act: decision.should_act,
        urgency: decision.urgency,
        optimal_time: decision.optimal_time,
        message: decision.message,
        reasoning,
        effort_minutes,
        salt,
        net_accumulation_mm: net_mm,
        slush_hazard: hazards.slush,
        driveway_blocking: hazards.driveway_blocking,
        plow_pile_detected: hazards.plow_pile,
        precipitating_now: ctx.precipitating,
        snow_start,
        snow_stop,
        snow_events: events,
        suggested_times,
    }
}

fn decide(ctx: &Context, hazards: &Hazards, reasoning: &mut Vec<String>) -> Decision {
    if ctx.precipitating && should_act_mid_storm(ctx.net_mm) {
        reasoning.push(format!(
            "{:.0} mm is already past the {:.0} mm very heavy mark and it is still coming down",
            ctx.net_mm, VERY_HEAVY_MM
        ));
        return Decision::act_now(
            Urgency::Urgent,
            "Very heavy snow: clear now to prevent buildup",
            ctx.now,
        );
    }

    if ctx.net_mm < NEGLIGIBLE_MM {
        reasoning.push(format!(
            "Net accumulation of {:.1} mm is below the {:.0} mm clearing threshold",
            ctx.net_mm, NEGLIGIBLE_MM
        ));
        if let Some(rule) = first_override(hazards) {
            reasoning.push(rule.reason.to_string());
            return Decision::act_now(rule.urgency, rule.message, ctx.now);
        }
        if ctx.total_snowfall_mm > 0.0 {
            reasoning.push("The snow will melt or settle naturally".to_string());
        } else {
            reasoning.push("No snow expected".to_string());
        }
        return Decision::wait(Urgency::None, "No clearing needed");
    }

    if ctx.net_mm < LIGHT_MM {
        reasoning.push(format!(
            "Net accumulation of {:.1} mm is light (under {:.0} mm)",
            ctx.net_mm, LIGHT_MM
        ));
        if let Some(rule) = first_override(hazards) {
            reasoning.push(rule.reason.to_string());
            return Decision::act_now(rule.urgency, rule.message, ctx.now);
        }
        return Decision::wait(Urgency::Low, "Light snow: clearing is optional");
    }

    clearing_required(ctx, hazards, reasoning)
}

/// Moderate accumulation and above: always act, timing is the question.
fn clearing_required(ctx: &Context, hazards: &Hazards, reasoning: &mut Vec<String>) -> Decision {
    let band = band_for(ctx.net_mm);
    if let Some(band) = band {
        reasoning.push(format!(
            "Net accumulation of {:.1} mm is {} (at least {:.0} mm)",
            ctx.net_mm, band.label, band.min_mm
        ));
    }
    // Hazards still apply on top of deep snow
    let mut hazard_floor = Urgency::None;
    for rule in OVERRIDE_RULES.iter().filter(|rule| (rule.applies)(hazards)) {
        reasoning.push(rule.reason.to_string());
        hazard_floor = hazard_floor.max(rule.urgency);
    }

    let compaction = wind_compaction_factor(ctx.mean_wind_kmh);
    let window_hours = adjust_window_for_wind(BASE_CLEARING_WINDOW_HOURS, ctx.mean_wind_kmh);
    let window = Duration::minutes((window_hours * 60.0).round() as i64);

    let mut target = match ctx.snow_stop {
        Some(stop) => {
            reasoning.push(format!("Snow should stop around {}", clock(stop, ctx.offset)));
            stop + window
        }
        None => ctx.now,
    };

    if compaction > 1.0 {
        reasoning.push(format!(
            "Wind averaging {:.0} km/h packs snow {:.1}x faster; clearing window shortened to {:.1} hours",
            ctx.mean_wind_kmh, compaction, window_hours
        ));
    }

    let mut freeze_floor = Urgency::None;
    if let Some(freeze) = ctx.freeze {
        if freeze < target {
            target = freeze - Duration::minutes(FREEZE_MARGIN_MINUTES);
            freeze_floor = Urgency::High;
            reasoning.push(format!(
                "Temperature drops below freezing at {}; clear before it turns to ice",
                clock(freeze, ctx.offset)
            ));
        }
    }

    let mut waits_for_stop = false;
    if target < ctx.now {
        // Never send anyone out while it is still falling
        match ctx.snow_stop.filter(|_| ctx.precipitating) {
            Some(stop) => {
                target = stop;
                waits_for_stop = true;
            }
            None => target = ctx.now,
        }
    }

    let compaction_pressure =
        compaction > 1.0 || ctx.freeze.is_some() || ctx.current_temp_c <= 0.0;
    let band_tier = band
        .map(|b| b.urgency(compaction_pressure))
        .unwrap_or(Urgency::Low);
    let urgency = band_tier.max(freeze_floor).max(hazard_floor);

    let message = if waits_for_stop {
        format!(
            "Clear as soon as the snow stops, around {}",
            clock(target, ctx.offset)
        )
    } else if freeze_floor > Urgency::None {
        format!("Clear before the freeze, by {}", clock(target, ctx.offset))
    } else if target <= ctx.now {
        "Clear the snow now".to_string()
    } else if urgency >= Urgency::High {
        format!("Heavy snow: plan to clear by {}", clock(target, ctx.offset))
    } else {
        format!("Clear the snow by {}", clock(target, ctx.offset))
    };

    Decision {
        should_act: true,
        urgency,
        message,
        optimal_time: Some(target),
    }
}

fn salt_advice(
    current: &CurrentConditions,
    future: &[&WeatherSample],
    future_totals: &WindowTotals,
    total_snowfall_mm: f64,
    area_m2: f64,
    optimal_time: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> SaltAdvice {
    let decision = salt_recommendation(
        current.temperature_c,
        forecast_min_temp(future, current.temperature_c),
        total_snowfall_mm > NEGLIGIBLE_MM,
        current.rain_mm,
        future_totals.rain_mm > RAIN_EXPECTED_MM,
    );

    let upcoming = optimal_time.filter(|t| *t > now);
    let timing = if decision.wait_for_rain {
        Some("wait for the rain to stop".to_string())
    } else if decision.apply {
        Some(match upcoming {
            Some(t) => format!("apply before {}", clock(t, offset)),
            None => "apply now".to_string(),
        })
    } else {
        None
    };

    SaltAdvice {
        apply: decision.apply,
        reason: decision.reason.to_string(),
        deadline: upcoming.filter(|_| decision.apply),
        quantity: decision.apply.then(|| salt_quantity(area_m2)),
        timing,
    }
}

/// Salt needed for an area, in kg above 1 kg and grams otherwise.
pub fn salt_quantity(area_m2: f64) -> String {
    let grams = area_m2 * SALT_GRAMS_PER_M2;
    if grams > 1000.0 {
        format!("{:.1} kg", grams / 1000.0)
    } else {
        format!("{:.0} g", grams)
    }
}

fn clock(t: DateTime<Utc>, offset: FixedOffset) -> String {
    t.with_timezone(&offset).format("%H:%M").to_string()
}
