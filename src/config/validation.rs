//! Range checks for a resolved configuration.

use anyhow::{Result, bail};

use super::Config;
use crate::constants::{EXTREME_LATITUDE_DEGREES, MAXIMUM_IQOMAH_DELAY, MINIMUM_IQOMAH_DELAY};

/// Validate coordinate and delay ranges, warning on extreme latitudes.
pub fn validate_config(config: &Config) -> Result<()> {
    if !(-90.0..=90.0).contains(&config.latitude) {
        bail!(
            "latitude must be between -90.0 and 90.0 degrees, got {}",
            config.latitude
        );
    }
    if !(-180.0..=180.0).contains(&config.longitude) {
        bail!(
            "longitude must be between -180.0 and 180.0 degrees, got {}",
            config.longitude
        );
    }

    if config.latitude.abs() > EXTREME_LATITUDE_DEGREES {
        log_warning!(
            "Latitude {:.2}° is beyond {}°; twilight never occurs on some dates \
             and prayer time calculation will fail there",
            config.latitude,
            EXTREME_LATITUDE_DEGREES
        );
    }

    let delays = [
        ("fajr", config.iqomah.fajr),
        ("dhuhr", config.iqomah.dhuhr),
        ("asr", config.iqomah.asr),
        ("maghrib", config.iqomah.maghrib),
        ("isha", config.iqomah.isha),
    ];
    for (prayer, minutes) in delays {
        if !(MINIMUM_IQOMAH_DELAY..=MAXIMUM_IQOMAH_DELAY).contains(&minutes) {
            bail!(
                "iqomah delay for {prayer} must be between {MINIMUM_IQOMAH_DELAY} and \
                 {MAXIMUM_IQOMAH_DELAY} minutes, got {minutes}"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IqomahConfig;

    fn valid_config() -> Config {
        Config {
            latitude: -6.2088,
            longitude: 106.8456,
            method: None,
            iqomah: IqomahConfig {
                fajr: 10,
                dhuhr: 10,
                asr: 10,
                maghrib: 10,
                isha: 10,
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_out_of_range_latitude_fails() {
        let mut config = valid_config();
        config.latitude = 95.0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn test_out_of_range_longitude_fails() {
        let mut config = valid_config();
        config.longitude = 200.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_oversized_iqomah_delay_names_the_prayer() {
        let mut config = valid_config();
        config.iqomah.maghrib = 75;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("maghrib"));
    }

    #[test]
    fn test_extreme_latitude_is_allowed_with_warning() {
        let mut config = valid_config();
        config.latitude = 70.0;
        assert!(validate_config(&config).is_ok());
    }
}
