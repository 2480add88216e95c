//! Decision tables: hazard overrides and accumulation bands.
//!
//! Both tables are evaluated top to bottom and the first match wins.

use snowplan_science::thresholds::{HEAVY_MM, LIGHT_MM, MODERATE_MM};

use crate::hazards::Hazards;
use crate::types::Urgency;

/// A hazard that forces action when accumulation alone would not.
#[derive(Clone, Copy)]
pub struct OverrideRule {
    pub name: &'static str,
    pub applies: fn(&Hazards) -> bool,
    pub urgency: Urgency,
    pub message: &'static str,
    pub reason: &'static str,
}

/// Plow pile, then blocked driveway, then slush.
pub static OVERRIDE_RULES: [OverrideRule; 3] = [
    OverrideRule {
        name: "plow_pile",
        applies: |h| h.plow_pile,
        urgency: Urgency::Moderate,
        message: "Plow pile needs clearing",
        reason: "A plow pile was reported at the end of the driveway",
    },
    OverrideRule {
        name: "driveway_blocking",
        applies: |h| h.driveway_blocking,
        urgency: Urgency::Moderate,
        message: "Clear the driveway before you leave",
        reason: "Overnight snow will block your departure",
    },
    OverrideRule {
        name: "slush",
        applies: |h| h.slush,
        urgency: Urgency::Low,
        message: "Clear before rain turns the snow to slush",
        reason: "Rain falling on the snow will leave heavy slush",
    },
];

/// First override that applies, if any.
pub fn first_override(hazards: &Hazards) -> Option<&'static OverrideRule> {
    OVERRIDE_RULES.iter().find(|rule| (rule.applies)(hazards))
}

/// An accumulation band that requires clearing.
#[derive(Debug, Clone, Copy)]
pub struct AccumulationBand {
    pub label: &'static str,
    pub min_mm: f64,
    /// Tier when nothing is hardening the snow
    pub base: Urgency,
    /// Tier when wind, cold or an incoming freeze is compacting it
    pub pressured: Urgency,
}

/// Heaviest band first.
pub static ACCUMULATION_BANDS: [AccumulationBand; 3] = [
    AccumulationBand {
        label: "heavy",
        min_mm: HEAVY_MM,
        base: Urgency::High,
        pressured: Urgency::Urgent,
    },
    AccumulationBand {
        label: "substantial",
        min_mm: MODERATE_MM,
        base: Urgency::Moderate,
        pressured: Urgency::High,
    },
    AccumulationBand {
        label: "moderate",
        min_mm: LIGHT_MM,
        base: Urgency::Low,
        pressured: Urgency::Moderate,
    },
];

/// Band for an accumulation, `None` below the moderate threshold.
pub fn band_for(accumulation_mm: f64) -> Option<&'static AccumulationBand> {
    ACCUMULATION_BANDS
        .iter()
        .find(|band| accumulation_mm >= band.min_mm)
}

impl AccumulationBand {
    pub fn urgency(&self, compaction_pressure: bool) -> Urgency {
        if compaction_pressure {
            self.pressured
        } else {
            self.base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_precedence() {
        let all = Hazards {
            plow_pile: true,
            driveway_blocking: true,
            slush: true,
        };
        assert_eq!(first_override(&all).map(|r| r.name), Some("plow_pile"));

        let no_pile = Hazards {
            plow_pile: false,
            ..all
        };
        assert_eq!(
            first_override(&no_pile).map(|r| r.name),
            Some("driveway_blocking")
        );

        let slush_only = Hazards {
            slush: true,
            ..Hazards::default()
        };
        let rule = first_override(&slush_only).unwrap();
        assert_eq!(rule.urgency, Urgency::Low);
    }

    #[test]
    fn test_no_override_without_hazards() {
        assert!(first_override(&Hazards::default()).is_none());
    }

    #[test]
    fn test_band_lookup() {
        assert!(band_for(24.9).is_none());
        assert_eq!(band_for(25.0).map(|b| b.label), Some("moderate"));
        assert_eq!(band_for(75.0).map(|b| b.label), Some("substantial"));
        assert_eq!(band_for(400.0).map(|b| b.label), Some("heavy"));
    }

    #[test]
    fn test_pressure_escalates_one_tier() {
        for band in &ACCUMULATION_BANDS {
            assert!(band.urgency(true) > band.urgency(false));
        }
    }
}
