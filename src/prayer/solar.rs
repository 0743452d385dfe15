//! Astronomical calculation of the daily prayer instants.
//!
//! Implements the calculator contract consumed by the catalog: given
//! coordinates, a calculation method, and a calendar date, produce the six
//! base instants (fajr, sunrise, dhuhr, asr, maghrib, isha) in UTC. Imsak is
//! not produced here; the catalog derives it from fajr.
//!
//! The math is the standard solar-position formulation: declination and the
//! equation of time from the Julian date, then hour angles for the method's
//! twilight angles, the horizon (with refraction), solar noon, and the
//! Shafi'i shadow-length altitude for asr. Accuracy is within roughly a
//! minute of published timetables, which is inside the ihtiyat margins
//! mosques already apply.

use anyhow::{Result, bail};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

use super::CalculationMethod;
use crate::constants::EXTREME_LATITUDE_DEGREES;

/// Altitude of the sun's center at sunrise/sunset, accounting for
/// atmospheric refraction and the solar radius.
const RISE_SET_ANGLE: f64 = 0.833;

/// Shafi'i asr convention: shadow length equal to the object's height.
const ASR_SHADOW_FACTOR: f64 = 1.0;

/// The six calculator-produced instants for one date, in UTC.
#[derive(Debug, Clone, Copy)]
pub struct SolarSchedule {
    pub fajr: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub dhuhr: DateTime<Utc>,
    pub asr: DateTime<Utc>,
    pub maghrib: DateTime<Utc>,
    pub isha: DateTime<Utc>,
}

/// Calculate the six base prayer instants for a date at the given
/// coordinates.
///
/// Fails for latitudes where the method's twilight angles are never
/// reached (polar day/night); the caller decides how to surface that.
pub fn calculate(
    latitude: f64,
    longitude: f64,
    method: CalculationMethod,
    date: NaiveDate,
) -> Result<SolarSchedule> {
    if latitude.abs() > EXTREME_LATITUDE_DEGREES {
        bail!(
            "latitude {latitude:.2}° is beyond {EXTREME_LATITUDE_DEGREES}°; \
             twilight-based prayer times are undefined there"
        );
    }

    let (fajr_angle, isha_angle) = method.twilight_angles();

    // Anchor the Julian date on the observer's meridian so the iteration's
    // day fractions line up with the local solar day.
    let jd = julian_day(date) - longitude / (15.0 * 24.0);

    // Hours of the local solar day, seeded with rough defaults and refined
    // by recomputing with each pass's own results as the sample times.
    let mut fajr = 5.0;
    let mut sunrise = 6.0;
    let mut dhuhr = 12.0;
    let mut asr = 13.0;
    let mut maghrib = 18.0;
    let mut isha = 18.0;

    for _ in 0..2 {
        fajr = sun_angle_time(jd, latitude, fajr_angle, fajr / 24.0, true)
            .ok_or_else(|| angle_error("fajr", fajr_angle, latitude, date))?;
        sunrise = sun_angle_time(jd, latitude, RISE_SET_ANGLE, sunrise / 24.0, true)
            .ok_or_else(|| angle_error("sunrise", RISE_SET_ANGLE, latitude, date))?;
        dhuhr = mid_day(jd, dhuhr / 24.0);
        asr = asr_time(jd, latitude, ASR_SHADOW_FACTOR, asr / 24.0)
            .ok_or_else(|| angle_error("asr", ASR_SHADOW_FACTOR, latitude, date))?;
        maghrib = sun_angle_time(jd, latitude, RISE_SET_ANGLE, maghrib / 24.0, false)
            .ok_or_else(|| angle_error("maghrib", RISE_SET_ANGLE, latitude, date))?;
        isha = sun_angle_time(jd, latitude, isha_angle, isha / 24.0, false)
            .ok_or_else(|| angle_error("isha", isha_angle, latitude, date))?;
    }

    // Solar-day hours → UTC instants
    let to_utc = |hours: f64| -> DateTime<Utc> {
        let base = date.and_time(NaiveTime::MIN).and_utc();
        let utc_hours = hours - longitude / 15.0;
        base + Duration::seconds((utc_hours * 3600.0).round() as i64)
    };

    Ok(SolarSchedule {
        fajr: to_utc(fajr),
        sunrise: to_utc(sunrise),
        dhuhr: to_utc(dhuhr),
        asr: to_utc(asr),
        maghrib: to_utc(maghrib),
        isha: to_utc(isha),
    })
}

fn angle_error(event: &str, angle: f64, latitude: f64, date: NaiveDate) -> anyhow::Error {
    anyhow::anyhow!(
        "the sun does not reach the {event} angle ({angle}°) at latitude {latitude:.2}° on {date}"
    )
}

/// Julian day number for 00:00 UTC of a Gregorian calendar date.
fn julian_day(date: NaiveDate) -> f64 {
    let mut y = date.year() as f64;
    let mut m = date.month() as f64;
    let d = date.day() as f64;
    if m <= 2.0 {
        y -= 1.0;
        m += 12.0;
    }
    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();
    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + d + b - 1524.5
}

/// Sun declination (degrees) and equation of time (hours) at a Julian date.
fn sun_position(jd: f64) -> (f64, f64) {
    let d = jd - 2451545.0;
    let g = fix_angle(357.529 + 0.98560028 * d);
    let q = fix_angle(280.459 + 0.98564736 * d);
    let l = fix_angle(q + 1.915 * dsin(g) + 0.020 * dsin(2.0 * g));
    let e = 23.439 - 0.00000036 * d;

    let declination = dasin(dsin(e) * dsin(l));
    let right_ascension = datan2(dcos(e) * dsin(l), dcos(l)) / 15.0;
    let equation_of_time = q / 15.0 - fix_hour(right_ascension);

    (declination, equation_of_time)
}

/// Solar noon, in hours of the local solar day.
fn mid_day(jd: f64, portion: f64) -> f64 {
    let (_, eqt) = sun_position(jd + portion);
    fix_hour(12.0 - eqt)
}

/// Time at which the sun reaches `angle` degrees below the horizon.
///
/// `ccw` selects the morning crossing (before noon). Returns `None` when
/// the sun never reaches the angle on that day.
fn sun_angle_time(jd: f64, latitude: f64, angle: f64, portion: f64, ccw: bool) -> Option<f64> {
    let (decl, _) = sun_position(jd + portion);
    let noon = mid_day(jd, portion);

    let cos_ha = (-dsin(angle) - dsin(decl) * dsin(latitude)) / (dcos(decl) * dcos(latitude));
    if !(-1.0..=1.0).contains(&cos_ha) {
        return None;
    }
    let t = dacos(cos_ha) / 15.0;
    Some(if ccw { noon - t } else { noon + t })
}

/// Asr time for the given shadow-length factor.
fn asr_time(jd: f64, latitude: f64, factor: f64, portion: f64) -> Option<f64> {
    let (decl, _) = sun_position(jd + portion);
    // Altitude at which an object's shadow is `factor` times its height
    let altitude = datan(1.0 / (factor + dtan((latitude - decl).abs())));
    sun_angle_time(jd, latitude, -altitude, portion, false)
}

fn fix_angle(a: f64) -> f64 {
    a.rem_euclid(360.0)
}

fn fix_hour(h: f64) -> f64 {
    h.rem_euclid(24.0)
}

fn dsin(d: f64) -> f64 {
    d.to_radians().sin()
}

fn dcos(d: f64) -> f64 {
    d.to_radians().cos()
}

fn dtan(d: f64) -> f64 {
    d.to_radians().tan()
}

fn dasin(x: f64) -> f64 {
    x.asin().to_degrees()
}

fn dacos(x: f64) -> f64 {
    x.acos().to_degrees()
}

fn datan(x: f64) -> f64 {
    x.atan().to_degrees()
}

fn datan2(y: f64, x: f64) -> f64 {
    y.atan2(x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    fn local_hour(t: DateTime<Utc>, offset_hours: i32) -> u32 {
        let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
        t.with_timezone(&offset).hour()
    }

    #[test]
    fn test_jakarta_schedule_is_plausible() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let schedule =
            calculate(-6.2088, 106.8456, CalculationMethod::Kemenag, date).unwrap();

        // Jakarta is UTC+7; check each event lands in its expected hour band
        assert!(matches!(local_hour(schedule.fajr, 7), 4..=5));
        assert!(matches!(local_hour(schedule.sunrise, 7), 5..=6));
        assert!(matches!(local_hour(schedule.dhuhr, 7), 11..=12));
        assert!(matches!(local_hour(schedule.asr, 7), 14..=16));
        assert!(matches!(local_hour(schedule.maghrib, 7), 17..=18));
        assert!(matches!(local_hour(schedule.isha, 7), 19..=20));
    }

    #[test]
    fn test_mecca_schedule_is_ordered() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let s = calculate(21.4225, 39.8262, CalculationMethod::Mwl, date).unwrap();

        assert!(s.fajr < s.sunrise);
        assert!(s.sunrise < s.dhuhr);
        assert!(s.dhuhr < s.asr);
        assert!(s.asr < s.maghrib);
        assert!(s.maghrib < s.isha);
    }

    #[test]
    fn test_solar_noon_near_twelve_at_greenwich() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        let s = calculate(51.48, 0.0, CalculationMethod::Mwl, date).unwrap();

        // Equation of time in late March is around -7 minutes
        let noon_minutes = s.dhuhr.hour() * 60 + s.dhuhr.minute();
        assert!(
            (11 * 60 + 45..=12 * 60 + 15).contains(&noon_minutes),
            "solar noon {noon_minutes} min is not near 12:00 UTC"
        );
    }

    #[test]
    fn test_polar_latitude_is_rejected() {
        let date = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let result = calculate(70.0, 25.0, CalculationMethod::Kemenag, date);
        assert!(result.is_err());
    }

    #[test]
    fn test_methods_shift_twilight_only() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        let kemenag = calculate(-6.2, 106.8, CalculationMethod::Kemenag, date).unwrap();
        let isna = calculate(-6.2, 106.8, CalculationMethod::Isna, date).unwrap();

        // A steeper fajr angle means an earlier fajr; horizon events agree
        assert!(kemenag.fajr < isna.fajr);
        assert_eq!(kemenag.sunrise, isna.sunrise);
        assert_eq!(kemenag.maghrib, isna.maghrib);
        assert!(kemenag.isha > isna.isha);
    }
}
