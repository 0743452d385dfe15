//! Daily prayer timetable with the midnight-continuity entry.
//!
//! A catalog is immutable once calculated: seven entries for one calendar
//! date plus tomorrow's fajr, which keeps the "next prayer" question
//! answerable after isha without waiting for the day rollover.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local, NaiveDate};

use super::solar;
use super::{CalculationMethod, PrayerEntry, PrayerName};
use crate::constants::IMSAK_OFFSET_MINUTES;

#[derive(Debug, Clone)]
pub struct PrayerCatalog {
    /// All seven entries for the calculated date, chronological.
    entries: Vec<PrayerEntry>,
    /// Fajr of the following date, for post-isha continuity.
    tomorrow_fajr: PrayerEntry,
    /// The local calendar date the entries belong to.
    calculated_date: NaiveDate,
}

impl PrayerCatalog {
    /// Calculate the full timetable for `date` at the given coordinates.
    pub fn calculate(
        latitude: f64,
        longitude: f64,
        method: CalculationMethod,
        date: NaiveDate,
    ) -> Result<Self> {
        let schedule = solar::calculate(latitude, longitude, method, date)
            .with_context(|| format!("failed to calculate prayer times for {date}"))?;

        let local = |t: DateTime<chrono::Utc>| t.with_timezone(&Local);
        let fajr_local = local(schedule.fajr);

        let entries = vec![
            PrayerEntry::new(
                PrayerName::Imsak,
                fajr_local - Duration::minutes(IMSAK_OFFSET_MINUTES),
            ),
            PrayerEntry::new(PrayerName::Fajr, fajr_local),
            PrayerEntry::new(PrayerName::Sunrise, local(schedule.sunrise)),
            PrayerEntry::new(PrayerName::Dhuhr, local(schedule.dhuhr)),
            PrayerEntry::new(PrayerName::Asr, local(schedule.asr)),
            PrayerEntry::new(PrayerName::Maghrib, local(schedule.maghrib)),
            PrayerEntry::new(PrayerName::Isha, local(schedule.isha)),
        ];

        let tomorrow = date
            .succ_opt()
            .with_context(|| format!("no calendar date after {date}"))?;
        let tomorrow_schedule = solar::calculate(latitude, longitude, method, tomorrow)
            .with_context(|| format!("failed to calculate prayer times for {tomorrow}"))?;
        let tomorrow_fajr = PrayerEntry::new(PrayerName::Fajr, local(tomorrow_schedule.fajr));

        Ok(Self {
            entries,
            tomorrow_fajr,
            calculated_date: date,
        })
    }

    /// The local calendar date this catalog was calculated for.
    pub fn calculated_date(&self) -> NaiveDate {
        self.calculated_date
    }

    /// Today's seven entries, chronological.
    pub fn entries(&self) -> &[PrayerEntry] {
        &self.entries
    }

    /// Tomorrow's fajr entry.
    pub fn tomorrow_fajr(&self) -> &PrayerEntry {
        &self.tomorrow_fajr
    }

    /// Today's entries followed by tomorrow's fajr, still chronological.
    pub fn merged_ordered(&self) -> Vec<PrayerEntry> {
        let mut merged = self.entries.clone();
        merged.push(self.tomorrow_fajr);
        merged
    }

    /// The first entry strictly after `now`, crossing into tomorrow's fajr
    /// when today is exhausted.
    pub fn next_after(&self, now: DateTime<Local>) -> Option<PrayerEntry> {
        self.merged_ordered().into_iter().find(|e| e.time > now)
    }

    /// Build a catalog from explicit entries, bypassing the calculator.
    ///
    /// The entries must be today's seven in chronological order.
    #[cfg(any(test, feature = "testing-support"))]
    pub fn from_entries(
        entries: Vec<PrayerEntry>,
        tomorrow_fajr: PrayerEntry,
        calculated_date: NaiveDate,
    ) -> Self {
        Self {
            entries,
            tomorrow_fajr,
            calculated_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn jakarta_catalog() -> PrayerCatalog {
        let date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        PrayerCatalog::calculate(-6.2088, 106.8456, CalculationMethod::Kemenag, date).unwrap()
    }

    #[test]
    fn test_catalog_has_seven_ordered_entries() {
        let catalog = jakarta_catalog();
        let entries = catalog.entries();

        assert_eq!(entries.len(), 7);
        for pair in entries.windows(2) {
            assert!(pair[0].time < pair[1].time, "{:?} !< {:?}", pair[0], pair[1]);
        }
        let names: Vec<_> = entries.iter().map(|e| e.name).collect();
        assert_eq!(names, PrayerName::ORDER.to_vec());
    }

    #[test]
    fn test_imsak_precedes_fajr_by_the_offset() {
        let catalog = jakarta_catalog();
        let imsak = catalog.entries()[0];
        let fajr = catalog.entries()[1];

        assert_eq!(fajr.time - imsak.time, Duration::minutes(IMSAK_OFFSET_MINUTES));
    }

    #[test]
    fn test_next_after_crosses_midnight() {
        let catalog = jakarta_catalog();
        let isha = catalog.entries()[6];

        let next = catalog.next_after(isha.time + Duration::minutes(1)).unwrap();
        assert_eq!(next.name, PrayerName::Fajr);
        assert_eq!(next.time, catalog.tomorrow_fajr().time);
        assert!(next.time > isha.time);
    }

    #[test]
    fn test_next_after_before_dawn_is_imsak() {
        let catalog = jakarta_catalog();
        let imsak = catalog.entries()[0];

        let next = catalog.next_after(imsak.time - Duration::hours(1)).unwrap();
        assert_eq!(next.name, PrayerName::Imsak);
    }

    #[test]
    fn test_next_after_is_strict() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let at = |h, m| Local.with_ymd_and_hms(2026, 3, 15, h, m, 0).unwrap();
        let entries = vec![
            PrayerEntry::new(PrayerName::Imsak, at(4, 30)),
            PrayerEntry::new(PrayerName::Fajr, at(4, 40)),
            PrayerEntry::new(PrayerName::Sunrise, at(5, 55)),
            PrayerEntry::new(PrayerName::Dhuhr, at(12, 5)),
            PrayerEntry::new(PrayerName::Asr, at(15, 15)),
            PrayerEntry::new(PrayerName::Maghrib, at(18, 10)),
            PrayerEntry::new(PrayerName::Isha, at(19, 20)),
        ];
        let tomorrow_fajr =
            PrayerEntry::new(PrayerName::Fajr, at(4, 40) + Duration::days(1));
        let catalog = PrayerCatalog::from_entries(entries, tomorrow_fajr, date);

        // At exactly dhuhr, the next prayer is asr, not dhuhr itself
        let next = catalog.next_after(at(12, 5)).unwrap();
        assert_eq!(next.name, PrayerName::Asr);
    }
}
