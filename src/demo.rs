//! Synthetic scenarios for trying the engine without a forecast file.

use chrono::{DateTime, Duration, DurationRound, NaiveTime, Utc};
use clap::ValueEnum;
use snowplan_engine::UserParameters;
use snowplan_weather::{Forecast, SeriesBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// 90 mm fell overnight in the cold
    HeavyStorm,
    /// Wet snow washed away by rain
    RainMelt,
    /// A few mm of snow and a plow pile across the driveway
    PlowPile,
    /// 8 mm overnight before a 07:00 departure
    Departure,
    /// Snow turning to rain this afternoon
    Slush,
}

/// A ready-to-run scenario: forecast, parameters and the instant to evaluate at.
pub struct Demo {
    pub forecast: Forecast,
    pub params: UserParameters,
    pub now: DateTime<Utc>,
}

impl Scenario {
    pub fn build(self, now: DateTime<Utc>) -> Demo {
        let now = now.duration_trunc(Duration::hours(1)).unwrap_or(now);
        let params = UserParameters::default();

        match self {
            Scenario::HeavyStorm => Demo {
                forecast: SeriesBuilder::starting_at(now - Duration::hours(10))
                    .temperature(-8.0)
                    .wind(15.0)
                    .hours(3)
                    .snow(15.0)
                    .hours(6)
                    .dry()
                    .hours(30)
                    .build_forecast(now),
                params,
                now,
            },
            Scenario::RainMelt => Demo {
                forecast: SeriesBuilder::starting_at(now - Duration::hours(6))
                    .temperature(0.5)
                    .snow(2.0)
                    .rain(5.0)
                    .hours(4)
                    .dry()
                    .temperature(3.0)
                    .hours(28)
                    .build_forecast(now),
                params,
                now,
            },
            Scenario::PlowPile => Demo {
                forecast: SeriesBuilder::starting_at(now - Duration::hours(4))
                    .temperature(-3.0)
                    .snow(5.0)
                    .hours(1)
                    .dry()
                    .hours(30)
                    .build_forecast(now),
                params: UserParameters {
                    plow_pile_mm: Some(50.0),
                    ..params
                },
                now,
            },
            Scenario::Departure => {
                // Evaluate at 22:00 so the snow lands in the overnight window
                let evening = now.date_naive().and_time(
                    NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
                );
                let now = evening.and_utc();
                Demo {
                    forecast: SeriesBuilder::starting_at(now - Duration::hours(2))
                        .temperature(-4.0)
                        .hours(4)
                        .snow(2.0)
                        .hours(4)
                        .dry()
                        .hours(24)
                        .build_forecast(now),
                    params: UserParameters {
                        departure_time: NaiveTime::from_hms_opt(7, 0, 0),
                        ..params
                    },
                    now,
                }
            }
            Scenario::Slush => Demo {
                forecast: SeriesBuilder::starting_at(now)
                    .temperature(1.0)
                    .snow(3.0)
                    .hours(3)
                    .dry()
                    .rain(2.0)
                    .hours(2)
                    .dry()
                    .hours(20)
                    .build_forecast(now),
                params,
                now,
            },
        }
    }
}
