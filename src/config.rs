use crate::time::{DEFAULT_TIMEZONE, ReferenceZone, is_valid_time12};
use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub zone: ZoneConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ZoneConfig {
    /// IANA name of the zone used for "now" and the timezone label
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

/// Values used on first run or when the stored start time looks unset.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct DefaultsConfig {
    #[serde(default = "default_end_time")]
    pub end_time: String,
    #[serde(default = "default_add_minutes")]
    pub add_minutes: String,
}

fn default_end_time() -> String {
    "07:00 AM".to_string()
}

fn default_add_minutes() -> String {
    "90".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            end_time: default_end_time(),
            add_minutes: default_add_minutes(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct StateConfig {
    /// Optional override for state directory (for testing)
    pub state_dir_override: Option<PathBuf>,
}

impl ZoneConfig {
    pub fn reference_zone(&self) -> Result<ReferenceZone> {
        ReferenceZone::new(&self.timezone).context("Invalid zone.timezone")
    }
}

impl DefaultsConfig {
    pub fn validate(&self) -> Result<()> {
        if !is_valid_time12(&self.end_time) {
            anyhow::bail!(
                "Invalid defaults.end_time '{}', expected HH:MM AM/PM",
                self.end_time
            );
        }
        if self.add_minutes.trim().parse::<u32>().is_err() {
            anyhow::bail!(
                "Invalid defaults.add_minutes '{}', expected a whole number of minutes",
                self.add_minutes
            );
        }
        Ok(())
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.zone.reference_zone()?;
        self.defaults.validate()?;
        Ok(())
    }
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
    let loader = ConfigBuilder::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .build()
        .context("Failed to build config loader")?;

    loader
        .try_deserialize()
        .context("Failed to parse config file")
}

/// Load `~/.time-span/config.toml`, falling back to defaults when the file
/// does not exist.
pub fn load() -> Result<Config> {
    let config_path = crate::platform::config_path()?;
    if !config_path.exists() {
        return Ok(Config::default());
    }

    let config = load_from_path(&config_path)?;
    config.validate()?;
    Ok(config)
}

pub fn save_to_path<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let toml_string = toml::to_string_pretty(config).context("Failed to serialize config")?;

    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

    Ok(())
}
