//! Where the calculator keeps its files.
//!
//! The state directory is resolved through a fallback chain so the CLI keeps
//! working on machines with a read-only home directory.

use crate::state::FileStore;
use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = ".time-span";
const DATA_DIR: &str = "time-span";

/// Directory holding `config.toml`. Not created here.
pub fn config_dir() -> Result<PathBuf> {
    Ok(home::home_dir()
        .context("Could not find home directory")?
        .join(APP_DIR))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Resolve the state directory.
///
/// Priority order:
/// 1. Explicit override from config (testing/CI)
/// 2. `~/.time-span`
/// 3. Platform data directory (XDG on Linux, AppData on Windows)
/// 4. `./.time-span`
pub fn get_state_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        ensure_writable(dir)?;
        return Ok(dir.to_path_buf());
    }

    if let Ok(dir) = config_dir() {
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
        warn!(
            "Cannot write to {}. Trying fallback locations.",
            dir.display()
        );
    }

    if let Some(data) = dirs::data_local_dir() {
        let dir = data.join(DATA_DIR);
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
    }

    let dir = PathBuf::from(APP_DIR);
    ensure_writable(&dir).context(
        "Cannot create state directory in any location. \
         Check file permissions or set state.state_dir_override in config.",
    )?;
    Ok(dir)
}

/// Create `dir` if needed and prove it accepts writes.
pub fn ensure_writable(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let probe = dir.join(".write_test");
    fs::write(&probe, b"test")
        .with_context(|| format!("Directory {} is not writable", dir.display()))?;
    let _ = fs::remove_file(&probe);

    Ok(())
}

pub fn state_store(override_dir: Option<&Path>) -> Result<FileStore> {
    let dir = get_state_dir(override_dir)?;
    Ok(FileStore::in_dir(&dir))
}
