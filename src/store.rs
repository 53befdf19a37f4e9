//! Key-value persistence of the root object and the in-progress session.

use dirs_next as dirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::migration::{StoredRecord, migrate};
use crate::model::WorkoutRecord;
use crate::session::Session;
use crate::settings::Settings;

/// Key holding `{ workouts, settings }`.
pub const ROOT_KEY: &str = "strengthTracker";
/// Key holding the unfinished workout.
pub const SESSION_KEY: &str = "strengthTracker.currentWorkout";

/// String storage addressed by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    const DIR: &'static str = "strength_tracker";

    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Store inside the platform configuration directory.
    pub fn open_default() -> Result<Self, StorageError> {
        dirs::config_dir()
            .map(|p| Self::new(p.join(Self::DIR)))
            .ok_or(StorageError::NoConfigDir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(key, e))?;
        std::fs::write(self.path(key), value).map_err(|e| io_error(key, e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

/// In-process store. Writes can be made to fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    reject_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::WriteRejected(key.to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.reject_writes {
            return Err(StorageError::WriteRejected(key.to_string()));
        }
        self.entries.remove(key);
        Ok(())
    }
}

/// The persisted root object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub workouts: Vec<WorkoutRecord>,
    #[serde(default)]
    pub settings: Settings,
}

/// Root kept raw so each record and the settings are read on their own.
#[derive(Deserialize)]
struct StoredRoot {
    #[serde(default)]
    workouts: Vec<serde_json::Value>,
    #[serde(default)]
    settings: Option<serde_json::Value>,
}

fn read_records(raw: Vec<serde_json::Value>) -> Vec<StoredRecord> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping unreadable workout {i}: {e}");
                None
            }
        })
        .collect()
}

fn read_settings(raw: Option<serde_json::Value>) -> Settings {
    let Some(value) = raw else {
        return Settings::default();
    };
    serde_json::from_value(value).unwrap_or_else(|e| {
        log::warn!("Saved settings are unreadable, using defaults: {e}");
        Settings::default()
    })
}

/// Load the root object, migrating old records.
///
/// Missing or unreadable data yields an empty history with default
/// settings.
pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> AppData {
    let data = match store.get(ROOT_KEY) {
        Ok(Some(data)) => data,
        Ok(None) => {
            log::debug!("No saved data under {ROOT_KEY}, starting fresh");
            return AppData::default();
        }
        Err(e) => {
            log::warn!("Error loading saved data: {e}");
            return AppData::default();
        }
    };
    match serde_json::from_str::<StoredRoot>(&data) {
        Ok(root) => {
            let workouts = migrate(read_records(root.workouts));
            log::info!("Loaded {} workouts", workouts.len());
            AppData {
                workouts,
                settings: read_settings(root.settings),
            }
        }
        Err(e) => {
            log::warn!("Saved data under {ROOT_KEY} is unreadable, using defaults: {e}");
            AppData::default()
        }
    }
}

pub fn save<S: KeyValueStore + ?Sized>(store: &mut S, data: &AppData) -> Result<(), StorageError> {
    let json = serde_json::to_string(data).map_err(|source| StorageError::Serialize {
        key: ROOT_KEY.to_string(),
        source,
    })?;
    store.set(ROOT_KEY, &json)
}

/// Restore an unfinished workout. Sessions holding only a start time are
/// not restored.
pub fn load_session<S: KeyValueStore + ?Sized>(store: &S) -> Option<Session> {
    let data = match store.get(SESSION_KEY) {
        Ok(data) => data?,
        Err(e) => {
            log::warn!("Error loading current workout: {e}");
            return None;
        }
    };
    match serde_json::from_str::<Session>(&data) {
        Ok(session) if !session.is_empty() => Some(session),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Discarding unreadable current workout: {e}");
            None
        }
    }
}

/// Persist the unfinished workout, or drop the key once it is empty.
pub fn save_session<S: KeyValueStore + ?Sized>(
    store: &mut S,
    session: &Session,
) -> Result<(), StorageError> {
    if session.is_empty() {
        return store.remove(SESSION_KEY);
    }
    let json = serde_json::to_string(session).map_err(|source| StorageError::Serialize {
        key: SESSION_KEY.to_string(),
        source,
    })?;
    store.set(SESSION_KEY, &json)
}
