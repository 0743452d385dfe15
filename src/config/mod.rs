//! Mosque configuration: coordinates, calculation method, iqomah delays.
//!
//! Loading, default-file creation, and path resolution live in
//! [`loading`]; range checks live in [`validation`]. A `Config` in hand is
//! parsed and resolved but not necessarily validated; callers go through
//! [`loading::load`], which does both.

pub mod loading;
pub mod validation;

use serde::Deserialize;

use crate::constants::DEFAULT_IQOMAH_DELAY;
use crate::geo;
use crate::prayer::{CalculationMethod, IqomahDelays};

/// Resolved configuration with the required fields present.
#[derive(Debug, Clone)]
pub struct Config {
    pub latitude: f64,
    pub longitude: f64,
    /// Raw method tag as written in the file; resolved lazily so an
    /// unknown tag warns instead of refusing to start.
    pub method: Option<String>,
    pub iqomah: IqomahConfig,
}

/// The `[iqomah]` table: minutes per adzan-eligible prayer.
///
/// Fields omitted in the file take the default delay.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct IqomahConfig {
    #[serde(default = "default_delay")]
    pub fajr: u32,
    #[serde(default = "default_delay")]
    pub dhuhr: u32,
    #[serde(default = "default_delay")]
    pub asr: u32,
    #[serde(default = "default_delay")]
    pub maghrib: u32,
    #[serde(default = "default_delay")]
    pub isha: u32,
}

fn default_delay() -> u32 {
    DEFAULT_IQOMAH_DELAY
}

impl Config {
    /// The calculation method to use, falling back to the default when the
    /// tag is absent or unrecognized. An unrecognized tag logs a warning.
    pub fn resolved_method(&self) -> CalculationMethod {
        match &self.method {
            None => CalculationMethod::Kemenag,
            Some(tag) => match CalculationMethod::from_tag(tag) {
                Some(method) => method,
                None => {
                    log_warning!(
                        "Unknown calculation method '{tag}', using KEMENAG"
                    );
                    CalculationMethod::Kemenag
                }
            },
        }
    }

    pub fn resolved_iqomah_delays(&self) -> IqomahDelays {
        IqomahDelays {
            fajr: self.iqomah.fajr,
            dhuhr: self.iqomah.dhuhr,
            asr: self.iqomah.asr,
            maghrib: self.iqomah.maghrib,
            isha: self.iqomah.isha,
        }
    }

    /// Dump the loaded configuration in the standard block format.
    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");
        log_indented!(
            "Coordinates: {}, {}",
            geo::format_latitude(self.latitude),
            geo::format_longitude(self.longitude)
        );
        log_indented!("Calculation method: {}", self.resolved_method().as_str());
        log_indented!(
            "Iqomah delays: fajr {}m, dhuhr {}m, asr {}m, maghrib {}m, isha {}m",
            self.iqomah.fajr,
            self.iqomah.dhuhr,
            self.iqomah.asr,
            self.iqomah.maghrib,
            self.iqomah.isha
        );
    }
}
