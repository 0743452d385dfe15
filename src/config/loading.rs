//! Config file discovery, default-file creation, and TOML parsing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use super::{Config, IqomahConfig};
use crate::constants::{
    DEFAULT_CONFIG_LATITUDE, DEFAULT_CONFIG_LONGITUDE, DEFAULT_IQOMAH_DELAY, DEFAULT_METHOD_TAG,
};

const CONFIG_FILE_NAME: &str = "adzanr.toml";

/// File shape as written: required fields are optional here so their
/// absence can be reported with a pointed message instead of a serde one.
#[derive(Debug, Deserialize)]
struct RawConfig {
    latitude: Option<f64>,
    longitude: Option<f64>,
    method: Option<String>,
    iqomah: Option<IqomahConfig>,
}

/// Resolve the configuration file path, honoring a custom directory.
pub fn config_path(custom_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match custom_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs::config_dir()
            .map(|d| d.join("adzanr"))
            .context("could not determine the configuration directory")?,
    };
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load the configuration, creating a commented default file on first run.
pub fn load(custom_dir: Option<&Path>) -> Result<Config> {
    let path = config_path(custom_dir)?;
    if !path.exists() {
        create_default_config(&path)?;
    }
    load_from_path(&path)
}

/// Parse, resolve, and validate a specific configuration file.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let raw: RawConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;

    let config = resolve(raw, path)?;
    super::validation::validate_config(&config)?;
    Ok(config)
}

fn resolve(raw: RawConfig, path: &Path) -> Result<Config> {
    let latitude = raw.latitude.ok_or_else(|| {
        anyhow!(
            "missing 'latitude' in {} (decimal degrees, -90 to 90)",
            path.display()
        )
    })?;
    let longitude = raw.longitude.ok_or_else(|| {
        anyhow!(
            "missing 'longitude' in {} (decimal degrees, -180 to 180)",
            path.display()
        )
    })?;
    let iqomah = raw.iqomah.ok_or_else(|| {
        anyhow!(
            "missing [iqomah] table in {} (minutes per prayer, 0-60)",
            path.display()
        )
    })?;

    Ok(Config {
        latitude,
        longitude,
        method: raw.method,
        iqomah,
    })
}

fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, default_config_contents())
        .with_context(|| format!("failed to write default config to {}", path.display()))?;
    log_block_start!("Created default configuration at {}", path.display());
    log_indented!("Edit it to set your mosque's coordinates");
    Ok(())
}

fn default_config_contents() -> String {
    format!(
        "\
# adzanr configuration

# Coordinates of the mosque in decimal degrees.
# Defaults point at Jakarta; set your own location.
latitude = {DEFAULT_CONFIG_LATITUDE}
longitude = {DEFAULT_CONFIG_LONGITUDE}

# Calculation method: KEMENAG, MWL, ISNA, or EGYPT.
method = \"{DEFAULT_METHOD_TAG}\"

# Minutes between the end of adzan and iqomah, per prayer (0-60).
[iqomah]
fajr = {DEFAULT_IQOMAH_DELAY}
dhuhr = {DEFAULT_IQOMAH_DELAY}
asr = {DEFAULT_IQOMAH_DELAY}
maghrib = {DEFAULT_IQOMAH_DELAY}
isha = {DEFAULT_IQOMAH_DELAY}
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_full_file_loads() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
latitude = -6.2088
longitude = 106.8456
method = "MWL"

[iqomah]
fajr = 15
dhuhr = 10
asr = 10
maghrib = 5
isha = 10
"#,
        );

        let config = load_from_path(&path).unwrap();
        assert_eq!(config.latitude, -6.2088);
        assert_eq!(config.method.as_deref(), Some("MWL"));
        assert_eq!(config.iqomah.fajr, 15);
        assert_eq!(config.iqomah.maghrib, 5);
    }

    #[test]
    fn test_omitted_iqomah_fields_take_the_default() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            "latitude = -6.2\nlongitude = 106.8\n\n[iqomah]\nmaghrib = 5\n",
        );

        let config = load_from_path(&path).unwrap();
        assert_eq!(config.iqomah.maghrib, 5);
        assert_eq!(config.iqomah.fajr, DEFAULT_IQOMAH_DELAY);
        assert_eq!(config.iqomah.isha, DEFAULT_IQOMAH_DELAY);
    }

    #[test]
    fn test_missing_coordinates_fail_with_field_name() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "longitude = 106.8\n\n[iqomah]\n");

        let err = load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("latitude"), "{err:#}");
    }

    #[test]
    fn test_missing_iqomah_table_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "latitude = -6.2\nlongitude = 106.8\n");

        let err = load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("[iqomah]"), "{err:#}");
    }

    #[test]
    fn test_first_run_creates_a_loadable_default() {
        let dir = TempDir::new().unwrap();

        let config = load(Some(dir.path())).unwrap();
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
        assert_eq!(config.latitude, DEFAULT_CONFIG_LATITUDE);
        assert_eq!(config.iqomah.dhuhr, DEFAULT_IQOMAH_DELAY);

        // Second load reads the file it just wrote
        let again = load(Some(dir.path())).unwrap();
        assert_eq!(again.longitude, DEFAULT_CONFIG_LONGITUDE);
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "latitude = \"not a number\"\n");

        assert!(load_from_path(&path).is_err());
    }
}
