use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

pub const SUBJECTS_KEY: &str = "studyplanner-subjects";
pub const TASKS_KEY: &str = "studyplanner-tasks";
pub const EVENTS_KEY: &str = "studyplanner-events";
pub const SESSIONS_KEY: &str = "studyplanner-sessions";
pub const SETTINGS_KEY: &str = "studyplanner-timer-settings";

pub const ALL_KEYS: [&str; 5] = [SUBJECTS_KEY, TASKS_KEY, EVENTS_KEY, SESSIONS_KEY, SETTINGS_KEY];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("slot '{key}' holds invalid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize slot '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value store of JSON slots, one file per key under a data directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        debug!(dir = %dir.display(), "opened store");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read a slot. `Ok(None)` when it has never been written.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.slot_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    /// Replace the whole slot. Written to a sibling temp file and renamed
    /// over the old one so readers never see half a value.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        let path = self.slot_path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })?;
        debug!(key, "saved slot");
        Ok(())
    }

    /// Read a slot, writing `seed()` into it first if it is absent.
    pub fn load_or_seed<T, F>(&self, key: &str, seed: F) -> Result<T, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(value) = self.load(key)? {
            return Ok(value);
        }
        let value = seed();
        self.save(key, &value)?;
        info!(key, "seeded slot with sample data");
        Ok(value)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.slot_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// Delete every slot so the next start reseeds sample data.
    pub fn clear(&self) -> Result<(), StoreError> {
        for key in ALL_KEYS {
            self.remove(key)?;
        }
        info!(dir = %self.dir.display(), "cleared all slots");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::SubjectBook;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("data")).unwrap();
        (dir, store)
    }

    #[test]
    fn absent_slot_loads_as_none() {
        let (_dir, store) = temp_store();
        let loaded: Option<Vec<u32>> = store.load(TASKS_KEY).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn seed_is_written_once() {
        let (_dir, store) = temp_store();
        let seeded = store.load_or_seed(SUBJECTS_KEY, SubjectBook::sample).unwrap();
        assert_eq!(seeded, SubjectBook::sample());
        assert!(store.slot_path(SUBJECTS_KEY).exists());

        let mut edited = seeded.clone();
        edited.remove_subject("1").unwrap();
        store.save(SUBJECTS_KEY, &edited).unwrap();

        let reloaded = store.load_or_seed(SUBJECTS_KEY, SubjectBook::sample).unwrap();
        assert_eq!(reloaded, edited);
    }

    #[test]
    fn corrupt_slot_is_an_error() {
        let (_dir, store) = temp_store();
        fs::write(store.slot_path(EVENTS_KEY), "{not json").unwrap();
        let err = store.load::<Vec<u32>>(EVENTS_KEY).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == EVENTS_KEY));
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let (_dir, store) = temp_store();
        store.save(SESSIONS_KEY, &vec![1, 2, 3]).unwrap();
        let names: Vec<String> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![format!("{SESSIONS_KEY}.json")]);
    }

    #[test]
    fn clear_removes_every_slot() {
        let (_dir, store) = temp_store();
        for key in ALL_KEYS {
            store.save(key, &Vec::<u8>::new()).unwrap();
        }
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(ALL_KEYS.iter().all(|k| !store.slot_path(k).exists()));
    }
}
