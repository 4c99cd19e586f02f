//! Local key-value persistence for the profile and the result history.
//!
//! The engine only sees the [`ProfileStore`] and [`HistoryStore`] traits.
//! Anything that implements [`KeyValueStore`] gets both for free, which is
//! how the in-memory store used by tests and the file store used by the
//! terminal runtime are wired in.

use crate::error::StoreError;
use crate::history::HistoryRecord;
use crate::profile::StoredProfile;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const PROFILE_KEY: &str = "disabilityProfile";
pub const HISTORY_KEY: &str = "interviewHistory";

/// A single-device string store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

pub trait ProfileStore: Send + Sync {
    fn load_profile(&self) -> Result<Option<StoredProfile>, StoreError>;
    fn save_profile(&self, profile: &StoredProfile) -> Result<(), StoreError>;
}

pub trait HistoryStore: Send + Sync {
    fn load_history(&self) -> Result<Vec<HistoryRecord>, StoreError>;
    fn save_history(&self, records: &[HistoryRecord]) -> Result<(), StoreError>;
}

fn decode<T: serde::de::DeserializeOwned>(key: &str, raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Json {
        key: key.to_string(),
        source,
    })
}

fn encode<T: serde::Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Json {
        key: key.to_string(),
        source,
    })
}

impl<S: KeyValueStore> ProfileStore for S {
    fn load_profile(&self) -> Result<Option<StoredProfile>, StoreError> {
        self.get(PROFILE_KEY)?
            .map(|raw| decode(PROFILE_KEY, &raw))
            .transpose()
    }

    fn save_profile(&self, profile: &StoredProfile) -> Result<(), StoreError> {
        self.set(PROFILE_KEY, &encode(PROFILE_KEY, profile)?)
    }
}

impl<S: KeyValueStore> HistoryStore for S {
    fn load_history(&self) -> Result<Vec<HistoryRecord>, StoreError> {
        Ok(self
            .get(HISTORY_KEY)?
            .map(|raw| decode(HISTORY_KEY, &raw))
            .transpose()?
            .unwrap_or_default())
    }

    fn save_history(&self, records: &[HistoryRecord]) -> Result<(), StoreError> {
        self.set(HISTORY_KEY, &encode(HISTORY_KEY, records)?)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`. Writes go through a temporary
/// sibling file and a rename so a crash never leaves a half-written value.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let target = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &target).map_err(io_err)
    }
}
