use crate::config::{self, Config};
use anyhow::{Context, Result};
use std::path::Path;

pub fn list(config: &Config) -> Result<()> {
    let toml_str = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

pub fn get(key: &str, config: &Config) -> Result<()> {
    // Walk the serialized config by dot path: "zone.timezone"
    let value = serde_json::to_value(config).context("Failed to serialize config")?;

    let mut current = &value;
    for part in key.split('.') {
        current = current
            .get(part)
            .with_context(|| format!("Key not found: {}", part))?;
    }

    match current {
        serde_json::Value::String(s) => println!("{}", s),
        serde_json::Value::Null => println!(),
        v => println!("{}", v),
    }

    Ok(())
}

/// Update one key and write the file back. Comments in the file are not kept.
pub fn set(key: &str, value: &str, path: &Path) -> Result<()> {
    let mut config = if path.exists() {
        config::load_from_path(path)?
    } else {
        Config::default()
    };

    match key {
        "zone.timezone" => config.zone.timezone = value.to_string(),
        "defaults.end_time" => config.defaults.end_time = value.to_string(),
        "defaults.add_minutes" => config.defaults.add_minutes = value.to_string(),
        "state.state_dir_override" => {
            config.state.state_dir_override = if value.is_empty() {
                None
            } else {
                Some(value.into())
            }
        }
        _ => anyhow::bail!("Unknown config key: {}", key),
    }

    config.validate()?;
    config::save_to_path(&config, path)?;
    println!("✓ {} = {}", key, value);
    Ok(())
}
