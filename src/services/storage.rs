//! Local key-value persistence for the chosen duration and running session

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const KEY_MINUTES: &str = "gong.minutes";
pub const KEY_SECONDS: &str = "gong.seconds";
pub const KEY_END_AT: &str = "gong.endAt";

pub const DEFAULT_MINUTES: u32 = 5;
pub const DEFAULT_SECONDS: u32 = 0;
/// The minutes picker offers 0..=60
pub const MINUTE_VALUES: u32 = 61;
pub const SECOND_VALUES: u32 = 60;
/// Longest duration the pickers can express, 60:59
pub const MAX_DURATION_SECONDS: u64 = (MINUTE_VALUES as u64 - 1) * 60 + SECOND_VALUES as u64 - 1;

/// String key-value store in the spirit of browser local storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), String>;
    fn remove(&mut self, key: &str) -> Result<(), String>;
}

/// Store kept only in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), String> {
        self.entries.remove(key);
        Ok(())
    }
}

/// On-disk layout of the state file
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Store backed by a JSON document on disk, rewritten on every change
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store, treating a missing or unreadable file as empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<StateFile>(&contents) {
                Ok(file) => file.entries,
                Err(e) => {
                    warn!("Ignoring corrupt state file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) => {
                debug!("No state loaded from {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), String> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
        }
        let file = StateFile {
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| format!("Failed to serialize state: {}", e))?;
        fs::write(&self.path, json)
            .map_err(|e| format!("Failed to write {}: {}", self.path.display(), e))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<(), String> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

/// Minutes and seconds as chosen on the pickers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChosenDuration {
    pub minutes: u32,
    pub seconds: u32,
}

impl ChosenDuration {
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self { minutes, seconds }
    }

    pub fn total_seconds(&self) -> u64 {
        self.minutes as u64 * 60 + self.seconds as u64
    }
}

impl Default for ChosenDuration {
    fn default() -> Self {
        Self::new(DEFAULT_MINUTES, DEFAULT_SECONDS)
    }
}

/// Typed access to the persisted timer keys. Write failures are logged and
/// absorbed so the countdown never stalls on persistence.
#[derive(Debug)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Last chosen duration, defaulting to 5:00 when missing or corrupt
    pub fn load_duration(&self) -> ChosenDuration {
        let minutes = self.read_number::<u32>(KEY_MINUTES).filter(|m| *m < MINUTE_VALUES);
        let seconds = self.read_number::<u32>(KEY_SECONDS).filter(|s| *s < SECOND_VALUES);
        match (minutes, seconds) {
            (Some(minutes), Some(seconds)) => ChosenDuration::new(minutes, seconds),
            _ => ChosenDuration::default(),
        }
    }

    pub fn save_minutes(&mut self, minutes: u32) {
        self.write(KEY_MINUTES, &minutes.to_string());
    }

    pub fn save_seconds(&mut self, seconds: u32) {
        self.write(KEY_SECONDS, &seconds.to_string());
    }

    pub fn save_duration(&mut self, duration: ChosenDuration) {
        self.save_minutes(duration.minutes);
        self.save_seconds(duration.seconds);
    }

    /// End instant of the in-progress session. A value that does not parse,
    /// or lies further ahead of `now_ms` than any settable duration, is
    /// dropped.
    pub fn load_end_at(&mut self, now_ms: i64) -> Option<i64> {
        let raw = self.store.get(KEY_END_AT)?;
        let end_at_ms = match raw.trim().parse::<i64>() {
            Ok(end_at_ms) => end_at_ms,
            Err(e) => {
                warn!("Discarding corrupt session end time {:?}: {}", raw, e);
                self.clear_session();
                return None;
            }
        };

        let latest = now_ms.saturating_add(MAX_DURATION_SECONDS as i64 * 1000);
        if end_at_ms > latest {
            warn!("Discarding session end time {} beyond {}", end_at_ms, latest);
            self.clear_session();
            return None;
        }
        Some(end_at_ms)
    }

    pub fn save_end_at(&mut self, end_at_ms: i64) {
        self.write(KEY_END_AT, &end_at_ms.to_string());
    }

    pub fn clear_session(&mut self) {
        if let Err(e) = self.store.remove(KEY_END_AT) {
            warn!("Failed to clear persisted session: {}", e);
        }
    }

    fn read_number<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.store.get(key).and_then(|raw| raw.trim().parse().ok())
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!("Failed to persist {}: {}", key, e);
        }
    }
}
