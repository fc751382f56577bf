use anyhow::{Context, Result};
use fs2::FileExt;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// The last-used field values. Stored as opaque strings; validity is
/// re-checked by whoever loads them.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    /// Last rendered difference, display text included (e.g. "1,200").
    #[serde(default)]
    pub minutes: String,
    #[serde(default)]
    pub add_minutes: String,
}

impl PersistedState {
    pub fn has_times(&self) -> bool {
        !self.start_time.trim().is_empty() || !self.end_time.trim().is_empty()
    }
}

/// Key-value persistence for [`PersistedState`].
///
/// `save` is best effort: failures are logged and never reach the caller.
/// `load` returns `None` when nothing usable was ever stored.
pub trait Store {
    fn save(&self, state: &PersistedState);
    fn load(&self) -> Option<PersistedState>;
    fn clear(&self);
}

/// JSON file guarded by an exclusive lock file.
#[derive(Debug, Clone)]
pub struct FileStore {
    lock_path: PathBuf,
    state_path: PathBuf,
}

impl FileStore {
    pub fn new(lock_path: PathBuf, state_path: PathBuf) -> Self {
        Self {
            lock_path,
            state_path,
        }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("state.lock"), dir.join("state.json"))
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    pub fn try_save(&self, state: &PersistedState) -> Result<()> {
        with_state_lock(&self.lock_path, &self.state_path, |stored| {
            *stored = state.clone();
            Ok(())
        })
    }

    pub fn try_load(&self) -> Result<Option<PersistedState>> {
        let state = read_state(&self.state_path)?;
        Ok(state.filter(PersistedState::has_times))
    }

    pub fn try_clear(&self) -> Result<()> {
        with_state_lock(&self.lock_path, &self.state_path, |stored| {
            stored.start_time.clear();
            stored.end_time.clear();
            stored.minutes.clear();
            Ok(())
        })
    }
}

impl Store for FileStore {
    fn save(&self, state: &PersistedState) {
        match self.try_save(state) {
            Ok(()) => debug!("saved state to {}", self.state_path.display()),
            Err(e) => error!("Error saving to storage: {:#}", e),
        }
    }

    fn load(&self) -> Option<PersistedState> {
        self.try_load().unwrap_or_else(|e| {
            error!("Error loading from storage: {:#}", e);
            None
        })
    }

    fn clear(&self) {
        if let Err(e) = self.try_clear() {
            error!("Error clearing storage: {:#}", e);
        }
    }
}

fn read_state(path: &Path) -> Result<Option<PersistedState>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).context("Failed to read state file")?;

    // Handle empty file case
    if content.trim().is_empty() {
        return Ok(None);
    }

    let state = serde_json::from_str(&content).context("Failed to parse state JSON")?;
    Ok(Some(state))
}

fn write_state(path: &Path, state: &PersistedState) -> Result<()> {
    let content = serde_json::to_string_pretty(state).context("Failed to serialize state")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Write to a sibling temp file and rename so a crash never leaves half a file
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Run `f` on the stored state under an exclusive lock and write the result
/// back if `f` succeeds. An unreadable state file is replaced.
pub fn with_state_lock<F, R>(lock_path: &Path, state_path: &Path, f: F) -> Result<R>
where
    F: FnOnce(&mut PersistedState) -> Result<R>,
{
    if let Some(parent) = lock_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(lock_path)
        .context("Failed to open lock file")?;

    file.lock_exclusive().context("Failed to acquire lock")?;

    let mut state = match read_state(state_path) {
        Ok(state) => state.unwrap_or_default(),
        Err(e) => {
            warn!("Discarding unreadable state file: {:#}", e);
            PersistedState::default()
        }
    };

    let result = f(&mut state);

    if result.is_ok() {
        write_state(state_path, &state)?;
    }

    file.unlock().context("Failed to unlock")?;

    result
}
