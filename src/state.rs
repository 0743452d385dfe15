//! Display state published to subscribers on every tick.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::prayer::{PrayerEntry, PrayerName};

/// The phase the display should be showing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisplayPhase {
    /// Next prayer is more than the approach threshold away.
    Idle,
    /// Next prayer is imminent; countdown runs to its adzan.
    Approaching,
    /// The call to prayer is playing.
    Adzan,
    /// Waiting interval between adzan and congregation.
    Iqomah,
    /// The congregation is praying.
    Prayer,
}

impl DisplayPhase {
    /// Human-readable name used in log output.
    pub fn display_name(&self) -> &'static str {
        match self {
            DisplayPhase::Idle => "idle",
            DisplayPhase::Approaching => "approaching",
            DisplayPhase::Adzan => "adzan",
            DisplayPhase::Iqomah => "iqomah",
            DisplayPhase::Prayer => "prayer",
        }
    }

    /// Whether a prayer-anchored phase chain is running.
    pub fn is_active_phase(&self) -> bool {
        matches!(
            self,
            DisplayPhase::Adzan | DisplayPhase::Iqomah | DisplayPhase::Prayer
        )
    }
}

/// One published observation of the display state.
///
/// `current_prayer` is set only while an active phase chain runs;
/// `next_prayer` is always set, crossing midnight to tomorrow's fajr
/// after isha.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub display_state: DisplayPhase,
    pub current_prayer: Option<PrayerName>,
    pub next_prayer: Option<PrayerName>,
    /// Whole seconds remaining in the phase (ceiling, never negative).
    pub countdown_seconds: u64,
    /// Today's full timetable, in chronological order.
    pub prayers: Vec<PrayerEntry>,
    /// The engine clock at the moment this snapshot was built.
    pub now: DateTime<Local>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_phase_classification() {
        assert!(!DisplayPhase::Idle.is_active_phase());
        assert!(!DisplayPhase::Approaching.is_active_phase());
        assert!(DisplayPhase::Adzan.is_active_phase());
        assert!(DisplayPhase::Iqomah.is_active_phase());
        assert!(DisplayPhase::Prayer.is_active_phase());
    }

    #[test]
    fn test_serialized_phase_tag_is_uppercase() {
        let json = serde_json::to_string(&DisplayPhase::Approaching).unwrap();
        assert_eq!(json, "\"APPROACHING\"");
    }
}
