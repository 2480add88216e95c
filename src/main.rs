//! snowplan CLI
//!
//! Reads a forecast, runs the recommendation engine and prints the result.

#![allow(clippy::print_stdout)]

mod demo;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};
use snowplan_core::{load_forecast, AppError, Config, ConfigError};
use snowplan_engine::{needs_renotify, plan_notification, recommend, Recommendation};

use crate::demo::Scenario;

/// snowplan CLI
#[derive(Parser)]
#[command(name = "snowplan")]
#[command(author, version, about = "When to clear snow, and whether to salt", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend what to do about the snow
    ///
    /// Example: snowplan recommend --forecast ./forecast.json
    Recommend {
        /// Open-Meteo style hourly forecast (JSON)
        #[arg(short, long, env = "SNOWPLAN_FORECAST")]
        forecast: PathBuf,

        /// Evaluate at this instant instead of the current time (RFC 3339)
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<Utc>>,

        /// Previous recommendation (JSON) to compare against
        #[arg(long)]
        previous: Option<PathBuf>,

        /// Print the recommendation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record that the area has just been cleared
    Cleared {
        /// When it was cleared (RFC 3339, default now)
        #[arg(long, value_parser = parse_instant)]
        at: Option<DateTime<Utc>>,
    },

    /// Run a built-in scenario
    Demo {
        #[arg(value_enum, default_value = "heavy-storm")]
        scenario: Scenario,

        /// Evaluate at this instant instead of the current time (RFC 3339)
        #[arg(long, value_parser = parse_instant)]
        now: Option<DateTime<Utc>>,

        /// Print the recommendation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the config file location and any problems with it
    Config,
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            eprintln!("{}", describe(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    snowplan_core::init(cli.verbose)?;

    match cli.command {
        Commands::Recommend {
            forecast,
            now,
            previous,
            json,
        } => {
            let (config, _) = Config::load_validated().map_err(config_error)?;
            let params = config.user_parameters()?;

            let forecast = load_forecast(&forecast)?;
            let now = now.unwrap_or_else(Utc::now);

            let rec = recommend(&forecast.hourly, &forecast.current, &params, now);
            tracing::info!(
                urgency = %rec.urgency,
                should_act = rec.should_act,
                "Recommendation ready"
            );

            let previous = previous.map(|path| read_recommendation(&path)).transpose()?;
            let changed = needs_renotify(previous.as_ref(), &rec);

            if json {
                println!("{}", to_json(&rec)?);
            } else {
                print_card(&rec, now, params.utc_offset);
                if previous.is_some() {
                    println!();
                    println!(
                        "{}",
                        if changed {
                            "Changed since the last check."
                        } else {
                            "No change since the last check."
                        }
                    );
                }
            }
        }

        Commands::Cleared { at } => {
            let mut config = Config::load().map_err(config_error)?;
            let at = at.unwrap_or_else(Utc::now);
            config.record_cleared(at);
            config.save().map_err(config_error)?;
            tracing::info!(%at, "Recorded clearing");

            let offset = config.user_parameters()?.utc_offset;
            println!("Marked as cleared at {}", local(at, offset, "%Y-%m-%d %H:%M"));
        }

        Commands::Demo {
            scenario,
            now,
            json,
        } => {
            let demo = scenario.build(now.unwrap_or_else(Utc::now));
            let rec = recommend(
                &demo.forecast.hourly,
                &demo.forecast.current,
                &demo.params,
                demo.now,
            );

            if json {
                println!("{}", to_json(&rec)?);
            } else {
                print_card(&rec, demo.now, demo.params.utc_offset);
            }
        }

        Commands::Config => {
            let path = Config::config_path().map_err(config_error)?;
            println!("Config file: {}", path.display());

            let config = Config::load().map_err(config_error)?;
            let validation = config.validate();

            println!("  Area:         {:.0} m²", config.clearing.area_m2);
            println!(
                "  Departure:    {}",
                config.clearing.departure_time.as_deref().unwrap_or("not set")
            );
            println!(
                "  Last cleared: {}",
                config.clearing.last_cleared.as_deref().unwrap_or("never")
            );
            println!("  UTC offset:   {} min", config.clearing.utc_offset_minutes);
            for window in &config.clearing.preferred_windows {
                println!("  Preferred:    {} {}-{}", window.label, window.start, window.end);
            }

            for error in &validation.errors {
                println!("error: {error}");
            }
            for warning in &validation.warnings {
                println!("warning: {warning}");
            }
            if validation.is_valid() && validation.warnings.is_empty() {
                println!("Configuration OK");
            }
        }
    }

    Ok(())
}

/// Config loading reports through anyhow; keep parse failures distinct.
fn config_error(err: anyhow::Error) -> AppError {
    let detail = format!("{err:#}");
    match err.downcast_ref::<ConfigError>() {
        Some(ConfigError::ParseError(_)) => ConfigError::ParseError(detail).into(),
        _ => ConfigError::Invalid(detail).into(),
    }
}

/// What the user sees on failure: the short hint, then the detail.
fn describe(err: &AppError) -> String {
    let detail = match err {
        AppError::Other(inner) => format!("{inner:#}"),
        other => other.to_string(),
    };
    format!("error: {}\n  {}", err.user_message(), detail)
}

fn to_json(rec: &Recommendation) -> Result<String, AppError> {
    serde_json::to_string_pretty(rec).map_err(|e| AppError::Other(e.into()))
}

fn read_recommendation(path: &Path) -> Result<Recommendation, AppError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| {
        AppError::Other(
            anyhow::Error::new(e)
                .context(format!("{} is not a valid recommendation", path.display())),
        )
    })
}

fn local(t: DateTime<Utc>, offset: FixedOffset, fmt: &str) -> String {
    t.with_timezone(&offset).format(fmt).to_string()
}

fn print_card(rec: &Recommendation, now: DateTime<Utc>, offset: FixedOffset) {
    println!("{}", rec.message);
    println!("  Urgency:    {}", rec.urgency);
    println!("  Net snow:   {:.1} mm", rec.net_accumulation_mm);

    if let Some(t) = rec.optimal_time {
        println!("  Clear at:   {}", local(t, offset, "%a %H:%M"));
    }
    if let Some(minutes) = rec.effort_minutes {
        println!("  Effort:     about {minutes} min");
    }

    let salt = &rec.salt;
    match (&salt.quantity, &salt.timing) {
        (Some(quantity), Some(timing)) => println!("  Salt:       {quantity}, {timing}"),
        (None, Some(timing)) => println!("  Salt:       {timing}"),
        _ => println!("  Salt:       {}", salt.reason),
    }

    let hazards: Vec<&str> = [
        (rec.plow_pile_detected, "plow pile"),
        (rec.driveway_blocking, "driveway blocked at departure"),
        (rec.slush_hazard, "slush"),
    ]
    .into_iter()
    .filter_map(|(flag, name)| flag.then_some(name))
    .collect();
    if !hazards.is_empty() {
        println!("  Hazards:    {}", hazards.join(", "));
    }

    for event in &rec.snow_events {
        println!(
            "  Snow:       {}-{} {:.0} mm, feels like {:.0} °C ({})",
            local(event.start, offset, "%H:%M"),
            local(event.end, offset, "%H:%M"),
            event.accumulation_mm,
            event.feels_like_c,
            event.comfort.advice()
        );
    }

    if !rec.suggested_times.is_empty() {
        println!("Other times:");
        for suggestion in &rec.suggested_times {
            println!(
                "  {} {} ({})",
                local(suggestion.time, offset, "%a %H:%M"),
                suggestion.label,
                suggestion.reason
            );
        }
    }

    if !rec.reasoning.is_empty() {
        println!("Why:");
        for line in &rec.reasoning {
            println!("  - {line}");
        }
    }

    if let Some(plan) = plan_notification(rec, now) {
        println!(
            "Reminder: \"{}\" at {}",
            plan.title,
            local(plan.fire_at, offset, "%H:%M")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowplan_core::ForecastError;

    #[test]
    fn test_missing_forecast_shows_hint_and_path() {
        let err: AppError = load_forecast(Path::new("/nonexistent/forecast.json"))
            .unwrap_err()
            .into();
        let text = describe(&err);
        assert!(text.starts_with("error: Forecast file could not be read. Check the path."));
        assert!(text.contains("/nonexistent/forecast.json"));
    }

    #[test]
    fn test_config_parse_failure_stays_a_parse_error() {
        let err = anyhow::Error::new(ConfigError::ParseError("bad toml".into()))
            .context("Failed to parse config file");
        let app = config_error(err);
        assert!(matches!(app, AppError::Config(ConfigError::ParseError(_))));
        assert!(describe(&app).contains("Failed to parse config file: Configuration parse error"));
    }

    #[test]
    fn test_failed_validation_is_invalid_config() {
        let app = config_error(anyhow::anyhow!("Configuration validation failed: area"));
        assert!(matches!(app, AppError::Config(ConfigError::Invalid(_))));
        assert!(describe(&app).starts_with("error: Invalid configuration. Check your settings."));
    }

    #[test]
    fn test_previous_recommendation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(read_recommendation(&missing), Err(AppError::Io(_))));

        let garbage = dir.path().join("previous.json");
        std::fs::write(&garbage, "not json").unwrap();
        let err = read_recommendation(&garbage).unwrap_err();
        assert!(matches!(err, AppError::Other(_)));
        assert!(describe(&err).contains("is not a valid recommendation"));
    }

    #[test]
    fn test_invalid_forecast_hint() {
        let err = AppError::Forecast(ForecastError::Invalid(
            snowplan_weather::WeatherError::MissingCurrent,
        ));
        assert!(describe(&err).contains("Fetch a fresh forecast"));
    }
}
