//! Notification planning.
//!
//! Turns a recommendation into the (title, fire time, body) triple a
//! notification dispatcher expects, and decides whether a fresh
//! recommendation is different enough from the last one to re-notify.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Recommendation, Urgency};

/// Moving the target time by more than this warrants a new notification.
const RESCHEDULE_TOLERANCE_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPlan {
    pub title: String,
    pub fire_at: DateTime<Utc>,
    pub body: String,
}

/// Build a notification for an actionable recommendation.
pub fn plan_notification(
    recommendation: &Recommendation,
    now: DateTime<Utc>,
) -> Option<NotificationPlan> {
    if !recommendation.should_act {
        return None;
    }

    let title = match recommendation.urgency {
        Urgency::Urgent => "Clear snow now",
        Urgency::High => "Snow clearing needed soon",
        _ => "Snow clearing recommended",
    };

    let fire_at = recommendation
        .optimal_time
        .filter(|t| *t > now)
        .unwrap_or(now);

    let mut body = recommendation.message.clone();
    if let Some(minutes) = recommendation.effort_minutes {
        body.push_str(&format!(" (about {} min)", minutes));
    }
    if recommendation.salt.apply {
        body.push_str(". Salt afterwards");
    }

    Some(NotificationPlan {
        title: title.to_string(),
        fire_at,
        body,
    })
}

/// Whether `next` should replace a notification scheduled for `previous`.
pub fn needs_renotify(previous: Option<&Recommendation>, next: &Recommendation) -> bool {
    let Some(previous) = previous else {
        return next.should_act;
    };

    if next.should_act && !previous.should_act {
        return true;
    }
    if next.urgency > previous.urgency {
        return true;
    }

    match (previous.optimal_time, next.optimal_time) {
        (Some(a), Some(b)) => (b - a).num_minutes().abs() > RESCHEDULE_TOLERANCE_MINUTES,
        (None, Some(_)) => next.should_act,
        _ => false,
    }
}
