use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use adzanr::constants::IMSAK_OFFSET_MINUTES;
use adzanr::geo::determine_timezone_from_coordinates;
use adzanr::prayer::{CalculationMethod, PrayerCatalog, PrayerName};

/// Latitudes where every method's twilight angle is reached year-round.
/// A 20° fajr angle stops being reached around 46.5° at the summer
/// solstice, so stay comfortably inside that.
fn temperate_latitude_strategy() -> impl Strategy<Value = f64> {
    -44.0..=44.0
}

fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

fn method_strategy() -> impl Strategy<Value = CalculationMethod> {
    prop_oneof![
        Just(CalculationMethod::Kemenag),
        Just(CalculationMethod::Mwl),
        Just(CalculationMethod::Isna),
        Just(CalculationMethod::Egypt),
    ]
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    // Any day of a leap year exercises the full solar cycle
    (1u32..=366).prop_map(|ordinal| {
        NaiveDate::from_yo_opt(2024, ordinal).expect("ordinal within a leap year")
    })
}

proptest! {
    /// The daily schedule is strictly ordered for every valid combination
    /// of coordinates, method, and date.
    #[test]
    fn test_schedule_is_strictly_ordered(
        lat in temperate_latitude_strategy(),
        lon in longitude_strategy(),
        method in method_strategy(),
        date in date_strategy()
    ) {
        let catalog = PrayerCatalog::calculate(lat, lon, method, date).unwrap();
        let entries = catalog.entries();

        prop_assert_eq!(entries.len(), 7);
        for pair in entries.windows(2) {
            prop_assert!(
                pair[0].time < pair[1].time,
                "{:?} at {} is not before {:?} at {}",
                pair[0].name, pair[0].time, pair[1].name, pair[1].time
            );
        }
    }

    /// Imsak is exactly the configured offset before fajr.
    #[test]
    fn test_imsak_offset_is_exact(
        lat in temperate_latitude_strategy(),
        lon in longitude_strategy(),
        method in method_strategy(),
        date in date_strategy()
    ) {
        let catalog = PrayerCatalog::calculate(lat, lon, method, date).unwrap();
        let imsak = catalog.entries()[0];
        let fajr = catalog.entries()[1];

        prop_assert_eq!(imsak.name, PrayerName::Imsak);
        prop_assert_eq!(fajr.time - imsak.time, Duration::minutes(IMSAK_OFFSET_MINUTES));
    }

    /// Tomorrow's fajr always lies after today's isha, so the engine never
    /// runs out of a next prayer.
    #[test]
    fn test_tomorrow_fajr_extends_past_isha(
        lat in temperate_latitude_strategy(),
        lon in longitude_strategy(),
        method in method_strategy(),
        date in date_strategy()
    ) {
        let catalog = PrayerCatalog::calculate(lat, lon, method, date).unwrap();
        let isha = catalog.entries()[6];

        prop_assert_eq!(isha.name, PrayerName::Isha);
        prop_assert!(catalog.tomorrow_fajr().time > isha.time);
        prop_assert!(catalog.next_after(isha.time).is_some());
    }

    /// Timezone lookup never panics and always yields a parseable zone.
    #[test]
    fn test_timezone_lookup_total(
        lat in -90.0..=90.0f64,
        lon in longitude_strategy()
    ) {
        let tz = determine_timezone_from_coordinates(lat, lon);
        prop_assert!(!tz.name().is_empty());
    }
}
