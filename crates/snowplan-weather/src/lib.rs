//! Weather data model for snowplan
//!
//! Normalized hourly samples, the provider adapter that produces them,
//! and a synthetic series builder for demos and tests.

pub mod adapter;
pub mod synthetic;
pub mod types;

pub use adapter::{normalize, parse_open_meteo, OpenMeteoResponse};
pub use synthetic::SeriesBuilder;
pub use types::*;
