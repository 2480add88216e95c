pub mod config;
pub mod error;
pub mod forecast;

pub use config::{
    ClearingConfig, ComfortConfig, Config, PreferredWindowConfig, ValidationResult, WeatherConfig,
};
pub use error::{AppError, ConfigError, ForecastError};
pub use forecast::load_forecast;

use anyhow::Result;

/// Default log level for a `-v` count, used when `RUST_LOG` is unset
fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize logging
///
/// Logs go to stderr so machine-readable output on stdout stays clean.
pub fn init(verbosity: u8) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level(verbosity))),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(anyhow::Error::msg)?;

    tracing::debug!("Snowplan core initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(default_level(0), "info");
        assert_eq!(default_level(1), "debug");
        assert_eq!(default_level(2), "trace");
        assert_eq!(default_level(9), "trace");
    }
}
