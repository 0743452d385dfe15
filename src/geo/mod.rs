//! Coordinate helpers: timezone lookup and display formatting.

use once_cell::sync::Lazy;
use tzf_rs::DefaultFinder;

// The finder embeds the timezone boundary data; build it once.
static FINDER: Lazy<DefaultFinder> = Lazy::new(DefaultFinder::new);

/// Find the IANA timezone at a coordinate, falling back to UTC for points
/// the boundary data does not cover (open ocean, poles).
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> chrono_tz::Tz {
    let name = FINDER.get_tz_name(longitude, latitude);
    name.parse::<chrono_tz::Tz>().unwrap_or(chrono_tz::Tz::UTC)
}

/// Format a latitude for log output, e.g. `6.2088°S`.
pub fn format_latitude(latitude: f64) -> String {
    let hemisphere = if latitude < 0.0 { 'S' } else { 'N' };
    format!("{:.4}°{}", latitude.abs(), hemisphere)
}

/// Format a longitude for log output, e.g. `106.8456°E`.
pub fn format_longitude(longitude: f64) -> String {
    let hemisphere = if longitude < 0.0 { 'W' } else { 'E' };
    format!("{:.4}°{}", longitude.abs(), hemisphere)
}
