//! Snow clearing recommendation engine
//!
//! Combines a past window (since the last clearing) and a 24-hour forecast
//! window into a single recommendation: whether to clear, how urgently,
//! when, how long it takes and whether to salt, plus a few alternative
//! times that fit the user's day.

pub mod engine;
pub mod events;
pub mod hazards;
pub mod notify;
pub mod rules;
pub mod suggest;
pub mod types;
pub mod window;

pub use engine::{recommend, salt_quantity};
pub use notify::{needs_renotify, plan_notification, NotificationPlan};
pub use suggest::alternative_times;
pub use types::*;
