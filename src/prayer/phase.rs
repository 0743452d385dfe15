//! The adzan → iqomah → prayer phase chain for a single prayer.
//!
//! Phase tracking is time-anchored: every phase knows its absolute end
//! instant, so ticks only compare against the clock and never accumulate
//! drift. A restart mid-chain re-enters through the adzan window scan,
//! which means only the adzan phase itself is resumable; iqomah and prayer
//! are lost on restart because nothing persists the chain.

use chrono::{DateTime, Duration, Local};

use super::{IqomahDelays, PrayerEntry, PrayerName};
use crate::constants::{ADZAN_DURATION_SECS, PRAYER_DURATION_SECS};

/// Steps of the active chain, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Adzan,
    Iqomah,
    Prayer,
}

/// A running phase: which prayer anchors it and when it ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseInfo {
    pub prayer: PrayerName,
    pub phase: Phase,
    pub phase_end: DateTime<Local>,
}

impl PhaseInfo {
    /// Start the chain at the adzan of `entry`.
    ///
    /// The end is anchored to the prayer's scheduled time, not to the
    /// detection instant, so late detection shortens the remaining adzan
    /// instead of shifting the whole chain.
    pub fn begin_adzan(entry: &PrayerEntry) -> Self {
        Self {
            prayer: entry.name,
            phase: Phase::Adzan,
            phase_end: entry.time + Duration::seconds(ADZAN_DURATION_SECS),
        }
    }

    /// Move to the next phase of the chain, or end it.
    ///
    /// A zero iqomah delay still enters the iqomah phase; its window is
    /// zero-length, so exactly one zero-countdown tick is published before
    /// the next tick advances to prayer.
    pub fn advance(&self, delays: &IqomahDelays) -> Option<PhaseInfo> {
        match self.phase {
            Phase::Adzan => {
                let minutes = delays.minutes_for(self.prayer).unwrap_or(0);
                Some(PhaseInfo {
                    prayer: self.prayer,
                    phase: Phase::Iqomah,
                    phase_end: self.phase_end + Duration::minutes(i64::from(minutes)),
                })
            }
            Phase::Iqomah => Some(PhaseInfo {
                prayer: self.prayer,
                phase: Phase::Prayer,
                phase_end: self.phase_end + Duration::seconds(PRAYER_DURATION_SECS),
            }),
            Phase::Prayer => None,
        }
    }
}

/// Find an adzan window containing `now`, preferring the latest prayer.
///
/// Scanning latest-first matters when windows would overlap on a compressed
/// simulated day: the most recent adzan wins.
pub fn detect_adzan_window(entries: &[PrayerEntry], now: DateTime<Local>) -> Option<PhaseInfo> {
    entries
        .iter()
        .rev()
        .filter(|e| e.name.is_adzan_eligible())
        .find(|e| {
            let elapsed = now - e.time;
            elapsed >= Duration::zero() && elapsed < Duration::seconds(ADZAN_DURATION_SECS)
        })
        .map(PhaseInfo::begin_adzan)
}

/// Whole seconds from `now` until `target`, rounded up, floored at zero.
pub fn seconds_until(target: DateTime<Local>, now: DateTime<Local>) -> u64 {
    let ms = (target - now).num_milliseconds();
    ((ms + 999).div_euclid(1000)).max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 15, h, m, s).unwrap()
    }

    #[test]
    fn test_full_chain_from_adzan() {
        let dhuhr = PrayerEntry::new(PrayerName::Dhuhr, at(12, 15, 0));
        let delays = IqomahDelays::uniform(10);

        let adzan = PhaseInfo::begin_adzan(&dhuhr);
        assert_eq!(adzan.phase, Phase::Adzan);
        assert_eq!(adzan.phase_end, at(12, 20, 0));

        let iqomah = adzan.advance(&delays).unwrap();
        assert_eq!(iqomah.phase, Phase::Iqomah);
        assert_eq!(iqomah.phase_end, at(12, 30, 0));

        let prayer = iqomah.advance(&delays).unwrap();
        assert_eq!(prayer.phase, Phase::Prayer);
        assert_eq!(prayer.phase_end, at(12, 45, 0));
        assert_eq!(prayer.prayer, PrayerName::Dhuhr);

        assert!(prayer.advance(&delays).is_none());
    }

    #[test]
    fn test_zero_delay_iqomah_is_momentary() {
        let maghrib = PrayerEntry::new(PrayerName::Maghrib, at(18, 10, 0));
        let delays = IqomahDelays::uniform(0);

        // The iqomah state is still entered, with a zero-length window
        let iqomah = PhaseInfo::begin_adzan(&maghrib).advance(&delays).unwrap();
        assert_eq!(iqomah.phase, Phase::Iqomah);
        assert_eq!(iqomah.phase_end, at(18, 15, 0));

        let prayer = iqomah.advance(&delays).unwrap();
        assert_eq!(prayer.phase, Phase::Prayer);
        assert_eq!(prayer.phase_end, at(18, 15, 0) + Duration::seconds(PRAYER_DURATION_SECS));
    }

    #[test]
    fn test_window_detects_only_eligible_prayers() {
        let entries = vec![
            PrayerEntry::new(PrayerName::Imsak, at(4, 30, 0)),
            PrayerEntry::new(PrayerName::Fajr, at(4, 40, 0)),
            PrayerEntry::new(PrayerName::Sunrise, at(5, 55, 0)),
        ];

        // Inside sunrise's would-be window, but sunrise has no adzan
        assert!(detect_adzan_window(&entries, at(5, 55, 30)).is_none());

        let hit = detect_adzan_window(&entries, at(4, 41, 0)).unwrap();
        assert_eq!(hit.prayer, PrayerName::Fajr);
    }

    #[test]
    fn test_window_is_half_open() {
        let entries = vec![PrayerEntry::new(PrayerName::Asr, at(15, 15, 0))];

        assert!(detect_adzan_window(&entries, at(15, 14, 59)).is_none());
        assert!(detect_adzan_window(&entries, at(15, 15, 0)).is_some());
        assert!(detect_adzan_window(&entries, at(15, 19, 59)).is_some());
        assert!(detect_adzan_window(&entries, at(15, 20, 0)).is_none());
    }

    #[test]
    fn test_overlapping_windows_prefer_latest() {
        let entries = vec![
            PrayerEntry::new(PrayerName::Maghrib, at(18, 10, 0)),
            PrayerEntry::new(PrayerName::Isha, at(18, 12, 0)),
        ];

        let hit = detect_adzan_window(&entries, at(18, 13, 0)).unwrap();
        assert_eq!(hit.prayer, PrayerName::Isha);
    }

    #[test]
    fn test_seconds_until_rounds_up() {
        let target = at(12, 0, 30);
        assert_eq!(seconds_until(target, at(12, 0, 0)), 30);
        assert_eq!(
            seconds_until(target, at(12, 0, 29) + Duration::milliseconds(500)),
            1
        );
        assert_eq!(seconds_until(target, at(12, 0, 30)), 0);
        assert_eq!(seconds_until(target, at(12, 1, 0)), 0);
    }
}
