//! Prayer domain types and daily schedule calculation.
//!
//! This module owns the vocabulary of the engine: the fixed set of prayer
//! names with their display order and labels, the per-day catalog of prayer
//! instants, the iqomah delay table, and the post-prayer phase chain.
//!
//! - [`solar`]: astronomical calculation of the six base prayer instants
//! - [`catalog`]: the day's entries plus tomorrow's fajr for rollover
//! - [`phase`]: the ADZAN → IQOMAH → PRAYER transition policy

pub mod catalog;
pub mod phase;
pub mod solar;

use anyhow::Result;
use chrono::{DateTime, Local};
use serde::Serialize;

use crate::constants::{MAXIMUM_IQOMAH_DELAY, MINIMUM_IQOMAH_DELAY};

pub use catalog::PrayerCatalog;
pub use phase::{Phase, PhaseInfo};

/// The seven named prayer events shown on the display.
///
/// Enumeration order defines the fixed display order for a day. Only the
/// five adzan-eligible prayers (fajr, dhuhr, asr, maghrib, isha) enter the
/// post-prayer phase chain; imsak and sunrise are informational markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Imsak,
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    /// Fixed display order for a day.
    pub const ORDER: [PrayerName; 7] = [
        PrayerName::Imsak,
        PrayerName::Fajr,
        PrayerName::Sunrise,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    /// Localized display label (Indonesian, matching the deployment locale).
    pub fn label(&self) -> &'static str {
        match self {
            PrayerName::Imsak => "Imsak",
            PrayerName::Fajr => "Subuh",
            PrayerName::Sunrise => "Syuruq",
            PrayerName::Dhuhr => "Dzuhur",
            PrayerName::Asr => "Ashar",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isya",
        }
    }

    /// Arabic display label.
    pub fn label_arabic(&self) -> &'static str {
        match self {
            PrayerName::Imsak => "إمساك",
            PrayerName::Fajr => "الفجر",
            PrayerName::Sunrise => "الشروق",
            PrayerName::Dhuhr => "الظهر",
            PrayerName::Asr => "العصر",
            PrayerName::Maghrib => "المغرب",
            PrayerName::Isha => "العشاء",
        }
    }

    /// Whether this prayer triggers the adzan/iqomah/prayer phase chain.
    pub fn is_adzan_eligible(&self) -> bool {
        matches!(
            self,
            PrayerName::Fajr
                | PrayerName::Dhuhr
                | PrayerName::Asr
                | PrayerName::Maghrib
                | PrayerName::Isha
        )
    }
}

/// A single prayer event for one day.
///
/// Entries are created fresh on each calculation cycle and never mutated
/// in place; the whole catalog is replaced on recalculation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PrayerEntry {
    pub name: PrayerName,
    pub label: &'static str,
    pub label_arabic: &'static str,
    pub time: DateTime<Local>,
}

impl PrayerEntry {
    pub fn new(name: PrayerName, time: DateTime<Local>) -> Self {
        Self {
            name,
            label: name.label(),
            label_arabic: name.label_arabic(),
            time,
        }
    }
}

/// Minutes between adzan end and iqomah for each adzan-eligible prayer.
///
/// Supplied per mosque through configuration; every delay must lie within
/// `[0, 60]` minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IqomahDelays {
    pub fajr: u32,
    pub dhuhr: u32,
    pub asr: u32,
    pub maghrib: u32,
    pub isha: u32,
}

impl IqomahDelays {
    /// Uniform delay table, mainly for tests and the default config.
    pub fn uniform(minutes: u32) -> Self {
        Self {
            fajr: minutes,
            dhuhr: minutes,
            asr: minutes,
            maghrib: minutes,
            isha: minutes,
        }
    }

    /// Delay in minutes for an adzan-eligible prayer; `None` for imsak
    /// and sunrise, which never reach the iqomah phase.
    pub fn minutes_for(&self, prayer: PrayerName) -> Option<u32> {
        match prayer {
            PrayerName::Fajr => Some(self.fajr),
            PrayerName::Dhuhr => Some(self.dhuhr),
            PrayerName::Asr => Some(self.asr),
            PrayerName::Maghrib => Some(self.maghrib),
            PrayerName::Isha => Some(self.isha),
            PrayerName::Imsak | PrayerName::Sunrise => None,
        }
    }

    /// Validate every delay against the allowed range.
    pub fn validate(&self) -> Result<()> {
        for (prayer, minutes) in [
            (PrayerName::Fajr, self.fajr),
            (PrayerName::Dhuhr, self.dhuhr),
            (PrayerName::Asr, self.asr),
            (PrayerName::Maghrib, self.maghrib),
            (PrayerName::Isha, self.isha),
        ] {
            if !(MINIMUM_IQOMAH_DELAY..=MAXIMUM_IQOMAH_DELAY).contains(&minutes) {
                anyhow::bail!(
                    "iqomah delay for {} ({} minutes) must be between {} and {} minutes",
                    prayer.label(),
                    minutes,
                    MINIMUM_IQOMAH_DELAY,
                    MAXIMUM_IQOMAH_DELAY
                );
            }
        }
        Ok(())
    }
}

/// Astronomical calculation convention, resolved once at configuration time.
///
/// Unknown tags fall back to [`CalculationMethod::Kemenag`]; that fallback is
/// documented behavior, unlike coordinates which must always be explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CalculationMethod {
    /// Indonesian Kemenag convention (fajr 20°, isha 18°).
    Kemenag,
    /// Muslim World League (fajr 18°, isha 17°).
    Mwl,
    /// Islamic Society of North America (fajr 15°, isha 15°).
    Isna,
    /// Egyptian General Authority of Survey (fajr 19.5°, isha 17.5°).
    Egypt,
}

impl CalculationMethod {
    /// Parse an exact method tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "KEMENAG" => Some(CalculationMethod::Kemenag),
            "MWL" => Some(CalculationMethod::Mwl),
            "ISNA" => Some(CalculationMethod::Isna),
            "EGYPT" => Some(CalculationMethod::Egypt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationMethod::Kemenag => "KEMENAG",
            CalculationMethod::Mwl => "MWL",
            CalculationMethod::Isna => "ISNA",
            CalculationMethod::Egypt => "EGYPT",
        }
    }

    /// Twilight angles (degrees below the horizon) for fajr and isha.
    pub(crate) fn twilight_angles(&self) -> (f64, f64) {
        match self {
            CalculationMethod::Kemenag => (20.0, 18.0),
            CalculationMethod::Mwl => (18.0, 17.0),
            CalculationMethod::Isna => (15.0, 15.0),
            CalculationMethod::Egypt => (19.5, 17.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_enumeration() {
        assert_eq!(PrayerName::ORDER[0], PrayerName::Imsak);
        assert_eq!(PrayerName::ORDER[6], PrayerName::Isha);
        assert_eq!(PrayerName::ORDER.len(), 7);
    }

    #[test]
    fn test_adzan_eligibility() {
        assert!(!PrayerName::Imsak.is_adzan_eligible());
        assert!(!PrayerName::Sunrise.is_adzan_eligible());
        for name in [
            PrayerName::Fajr,
            PrayerName::Dhuhr,
            PrayerName::Asr,
            PrayerName::Maghrib,
            PrayerName::Isha,
        ] {
            assert!(name.is_adzan_eligible(), "{name:?} should be adzan-eligible");
        }
    }

    #[test]
    fn test_iqomah_delays_for_ineligible_prayers() {
        let delays = IqomahDelays::uniform(10);
        assert_eq!(delays.minutes_for(PrayerName::Imsak), None);
        assert_eq!(delays.minutes_for(PrayerName::Sunrise), None);
        assert_eq!(delays.minutes_for(PrayerName::Maghrib), Some(10));
    }

    #[test]
    fn test_iqomah_delay_validation() {
        assert!(IqomahDelays::uniform(0).validate().is_ok());
        assert!(IqomahDelays::uniform(60).validate().is_ok());
        assert!(IqomahDelays::uniform(61).validate().is_err());

        let mut delays = IqomahDelays::uniform(10);
        delays.maghrib = 120;
        let err = delays.validate().unwrap_err().to_string();
        assert!(err.contains("Maghrib"), "error should name the prayer: {err}");
    }

    #[test]
    fn test_method_tag_parsing() {
        assert_eq!(
            CalculationMethod::from_tag("MWL"),
            Some(CalculationMethod::Mwl)
        );
        assert_eq!(CalculationMethod::from_tag("mwl"), None);
        assert_eq!(CalculationMethod::from_tag("CUSTOM"), None);
        assert_eq!(CalculationMethod::Kemenag.as_str(), "KEMENAG");
    }
}
