//! Design constants for the prayer engine and configuration validation.

use std::time::Duration;

/// Interval between engine evaluations. The whole state machine is driven
/// at this cadence; countdowns are published in whole seconds.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// How long the adzan phase lasts before the iqomah countdown begins.
pub const ADZAN_DURATION_SECS: i64 = 5 * 60;

/// How long the prayer phase lasts after the iqomah countdown ends.
pub const PRAYER_DURATION_SECS: i64 = 15 * 60;

/// Seconds before a prayer instant at which the display switches from
/// IDLE to APPROACHING.
pub const APPROACHING_THRESHOLD_SECS: i64 = 5 * 60;

/// Imsak is derived locally as this many minutes before fajr; it is never
/// requested from the calculator.
pub const IMSAK_OFFSET_MINUTES: i64 = 10;

/// Iqomah delay bounds in minutes (inclusive).
pub const MINIMUM_IQOMAH_DELAY: u32 = 0;
pub const MAXIMUM_IQOMAH_DELAY: u32 = 60;

/// Per-prayer iqomah delay used when a field is omitted from the
/// `[iqomah]` table.
pub const DEFAULT_IQOMAH_DELAY: u32 = 10;

/// Calculation method tag used when the configured tag is missing or
/// unrecognized. Falling back here is documented behavior; coordinates
/// never fall back silently.
pub const DEFAULT_METHOD_TAG: &str = "KEMENAG";

/// Coordinates written into a freshly created default config file
/// (central Jakarta). These are a starting point for the admin to edit,
/// not a runtime fallback.
pub const DEFAULT_CONFIG_LATITUDE: f64 = -6.2088;
pub const DEFAULT_CONFIG_LONGITUDE: f64 = 106.8456;

/// Latitudes beyond this cannot produce the configured twilight angles for
/// part of the year; the calculator reports an error rather than guessing.
pub const EXTREME_LATITUDE_DEGREES: f64 = 66.5;
