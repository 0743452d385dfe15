//! Implementation of the `timetable` command.
//!
//! Prints one day's prayer schedule, either as a logger-formatted table or
//! as JSON for consumption by display frontends.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::config;
use crate::prayer::{PrayerCatalog, PrayerEntry};

#[derive(Serialize)]
struct TimetableOutput<'a> {
    date: NaiveDate,
    method: &'a str,
    latitude: f64,
    longitude: f64,
    prayers: &'a [PrayerEntry],
    tomorrow_fajr: &'a PrayerEntry,
}

/// Handle the `timetable` command.
pub fn handle_timetable_command(
    date: Option<String>,
    json: bool,
    config_dir: Option<String>,
) -> Result<()> {
    let config = config::loading::load(config_dir.as_deref().map(Path::new))?;

    let date = match date {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))?,
        None => Local::now().date_naive(),
    };

    let method = config.resolved_method();
    let catalog = PrayerCatalog::calculate(config.latitude, config.longitude, method, date)?;

    if json {
        let output = TimetableOutput {
            date,
            method: method.as_str(),
            latitude: config.latitude,
            longitude: config.longitude,
            prayers: catalog.entries(),
            tomorrow_fajr: catalog.tomorrow_fajr(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    log_version!();
    log_block_start!("Prayer times for {} ({})", date, method.as_str());
    for entry in catalog.entries() {
        log_indented!(
            "{:<8} {}   {}",
            entry.label,
            entry.time.format("%H:%M"),
            entry.label_arabic
        );
    }
    log_block_start!(
        "Tomorrow's {}: {}",
        catalog.tomorrow_fajr().label,
        catalog.tomorrow_fajr().time.format("%H:%M")
    );
    log_end!();
    Ok(())
}
