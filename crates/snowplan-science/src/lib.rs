//! Snow science formulas
//!
//! Stateless physical and empirical models used by the recommendation
//! engine: melting, wind effects, clearing effort and salt effectiveness.
//! Every function is total over finite inputs; callers exclude NaN.

pub mod effort;
pub mod melt;
pub mod salt;
pub mod thresholds;
pub mod wind;

pub use effort::{clearing_rate, manpower_minutes};
pub use melt::{melt_from_rain, melt_from_sun, net_accumulation, should_act_mid_storm};
pub use salt::{salt_recommendation, SaltDecision};
pub use wind::{adjust_window_for_wind, wind_chill, wind_compaction_factor};
