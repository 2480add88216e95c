//! Alternative clearing times built from the user's preferred windows.

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::hazards::to_utc;
use crate::types::{PreferredWindow, SnowEvent, SuggestionPriority, TimeSuggestion};

pub const MAX_SUGGESTIONS: usize = 3;

/// Times worth clearing after `event`, earliest first.
///
/// Always starts from the moment the snow stops. Each preferred window is
/// offered on the day the snow ends if it has not opened yet, otherwise on
/// the following day.
pub fn alternative_times(
    event: &SnowEvent,
    windows: &[PreferredWindow],
    offset: FixedOffset,
) -> Vec<TimeSuggestion> {
    let mut suggestions = vec![TimeSuggestion {
        time: event.end,
        label: "After snow stops".to_string(),
        reason: format!(
            "Snow ends at {} ({})",
            local(event.end, offset),
            event.comfort.advice()
        ),
        priority: SuggestionPriority::High,
    }];

    let end_date = event.end.with_timezone(&offset).date_naive();
    for window in windows {
        let opens = to_utc(end_date.and_time(window.start), offset);
        let suggestion = if event.end <= opens {
            TimeSuggestion {
                time: opens,
                label: format!("Your {} window", window.label),
                reason: format!(
                    "Falls within your preferred {} time ({})",
                    window.label,
                    span(window)
                ),
                priority: SuggestionPriority::Medium,
            }
        } else {
            TimeSuggestion {
                time: opens + Duration::days(1),
                label: format!("Next day {}", window.label),
                reason: format!("Your preferred {} time ({})", window.label, span(window)),
                priority: SuggestionPriority::Low,
            }
        };
        suggestions.push(suggestion);
    }

    // Stable: on a tie the snow-stop suggestion stays first
    suggestions.sort_by_key(|s| s.time);
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

fn span(window: &PreferredWindow) -> String {
    format!("{}-{}", window.start.format("%H:%M"), window.end.format("%H:%M"))
}

fn local(t: DateTime<Utc>, offset: FixedOffset) -> String {
    t.with_timezone(&offset).format("%a %H:%M").to_string()
}
