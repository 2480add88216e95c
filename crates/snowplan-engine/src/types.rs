use chrono::{DateTime, FixedOffset, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};

/// How soon the snow should be dealt with
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    None,
    Low,
    Moderate,
    High,
    Urgent,
}

impl Urgency {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Temperature bands used to describe conditions during a snow event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComfortBands {
    /// Feels-like temperature below which it is cold work
    pub cold_below_c: f64,
    /// Feels-like temperature above which snow turns wet and heavy
    pub warm_above_c: f64,
}

impl Default for ComfortBands {
    fn default() -> Self {
        Self {
            cold_below_c: -7.0,
            warm_above_c: 2.0,
        }
    }
}

/// Caller-supplied parameters. The engine only reads these.
#[derive(Debug, Clone, PartialEq)]
pub struct UserParameters {
    /// Clearable area in m²
    pub area_m2: f64,
    /// When the area was last cleared
    pub last_cleared: Option<DateTime<Utc>>,
    /// Manually reported plow pile height in mm
    pub plow_pile_mm: Option<f64>,
    /// Daily vehicle departure, local time of day
    pub departure_time: Option<NaiveTime>,
    /// Offset of the user's local clock, used for departure and evening cutoffs
    pub utc_offset: FixedOffset,
    pub comfort: ComfortBands,
    /// Times of day the user would rather be out clearing
    pub preferred_windows: Vec<PreferredWindow>,
}

/// A named local time-of-day range, e.g. "Morning" 07:00 to 09:00
#[derive(Debug, Clone, PartialEq)]
pub struct PreferredWindow {
    pub label: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

pub const DEFAULT_AREA_M2: f64 = 50.0;

impl Default for UserParameters {
    fn default() -> Self {
        Self {
            area_m2: DEFAULT_AREA_M2,
            last_cleared: None,
            plow_pile_mm: None,
            departure_time: None,
            utc_offset: Utc.fix(),
            comfort: ComfortBands::default(),
            preferred_windows: Vec::new(),
        }
    }
}

/// Salt sub-recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaltAdvice {
    pub apply: bool,
    pub reason: String,
    pub deadline: Option<DateTime<Utc>>,
    pub quantity: Option<String>,
    pub timing: Option<String>,
}

/// How pleasant a snow event will be to work in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comfort {
    Cold,
    Comfortable,
    Warm,
}

impl Comfort {
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Cold => "dress warmly",
            Self::Comfortable => "comfortable working conditions",
            Self::Warm => "snow may be heavy",
        }
    }
}

/// A run of consecutive snowy hours in the forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowEvent {
    pub start: DateTime<Utc>,
    /// Top of the hour after the last snowy sample
    pub end: DateTime<Utc>,
    pub accumulation_mm: f64,
    pub mean_temperature_c: f64,
    pub feels_like_c: f64,
    pub comfort: Comfort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPriority {
    High,
    Medium,
    Low,
}

/// An alternative time to clear, shown alongside the main recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSuggestion {
    pub time: DateTime<Utc>,
    pub label: String,
    pub reason: String,
    pub priority: SuggestionPriority,
}

/// Engine output. Built fresh on every call and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub should_act: bool,
    pub urgency: Urgency,
    pub optimal_time: Option<DateTime<Utc>>,
    pub message: String,
    pub reasoning: Vec<String>,
    pub effort_minutes: Option<u32>,
    pub salt: SaltAdvice,
    pub net_accumulation_mm: f64,
    pub slush_hazard: bool,
    pub driveway_blocking: bool,
    pub plow_pile_detected: bool,
    pub precipitating_now: bool,
    pub snow_start: Option<DateTime<Utc>>,
    pub snow_stop: Option<DateTime<Utc>>,
    pub snow_events: Vec<SnowEvent>,
    /// Other sensible times to clear; never changes the decision above
    #[serde(default)]
    pub suggested_times: Vec<TimeSuggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_ordering() {
        assert!(Urgency::None < Urgency::Low);
        assert!(Urgency::Low < Urgency::Moderate);
        assert!(Urgency::Moderate < Urgency::High);
        assert!(Urgency::High < Urgency::Urgent);
        assert_eq!(Urgency::Moderate.max(Urgency::High), Urgency::High);
    }

    #[test]
    fn test_urgency_serializes_lowercase() {
        let json = serde_json::to_string(&Urgency::Urgent).unwrap();
        assert_eq!(json, "\"urgent\"");
    }

    #[test]
    fn test_default_parameters() {
        let params = UserParameters::default();
        assert_eq!(params.area_m2, 50.0);
        assert_eq!(params.utc_offset.local_minus_utc(), 0);
        assert!(params.departure_time.is_none());
        assert!(params.preferred_windows.is_empty());
    }

    #[test]
    fn test_recommendation_without_suggestions_deserializes() {
        let json = r#"{
            "should_act": false,
            "urgency": "none",
            "optimal_time": null,
            "message": "No clearing needed",
            "reasoning": [],
            "effort_minutes": null,
            "salt": {
                "apply": false,
                "reason": "not needed",
                "deadline": null,
                "quantity": null,
                "timing": null
            },
            "net_accumulation_mm": 0.0,
            "slush_hazard": false,
            "driveway_blocking": false,
            "plow_pile_detected": false,
            "precipitating_now": false,
            "snow_start": null,
            "snow_stop": null,
            "snow_events": []
        }"#;
        let rec: Recommendation = serde_json::from_str(json).unwrap();
        assert!(rec.suggested_times.is_empty());
    }
}
