use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{info, warn};

use super::models::{HabitSample, MoodEntry, Reminder, UserProfile, UserStats};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize {collection}: {source}")]
    Serialize {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("reminder {0} not found")]
    NotFound(String),
}

/// One persisted JSON file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Reminders,
    Users,
    Stats,
    Habits,
    Moods,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Reminders,
        Collection::Users,
        Collection::Stats,
        Collection::Habits,
        Collection::Moods,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Collection::Reminders => "reminders.json",
            Collection::Users => "user_data.json",
            Collection::Stats => "stats.json",
            Collection::Habits => "habits.json",
            Collection::Moods => "moods.json",
        }
    }
}

/// In-memory copy of every collection.
#[derive(Debug, Default, Clone)]
pub struct Collections {
    pub reminders: BTreeMap<String, Reminder>,
    pub users: BTreeMap<i64, UserProfile>,
    pub stats: BTreeMap<i64, UserStats>,
    pub habits: BTreeMap<i64, Vec<HabitSample>>,
    /// chat id -> `YYYY-MM-DD` -> entry
    pub moods: BTreeMap<i64, BTreeMap<String, MoodEntry>>,
}

impl Collections {
    fn to_json(&self, collection: Collection) -> Result<String, serde_json::Error> {
        match collection {
            Collection::Reminders => serde_json::to_string_pretty(&self.reminders),
            Collection::Users => serde_json::to_string_pretty(&self.users),
            Collection::Stats => serde_json::to_string_pretty(&self.stats),
            Collection::Habits => serde_json::to_string_pretty(&self.habits),
            Collection::Moods => serde_json::to_string_pretty(&self.moods),
        }
    }
}

/// Shared handle to the JSON-backed collections.
///
/// Every mutation goes through [`DataStore::update`], which holds the lock
/// while the touched files are rewritten.
#[derive(Clone)]
pub struct DataStore {
    inner: Arc<Mutex<Collections>>,
    data_dir: Arc<PathBuf>,
}

impl DataStore {
    /// Loads all collections from `data_dir`, creating the directory if
    /// needed.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        if !data_dir.exists() {
            info!("Creating data directory {}", data_dir.display());
            fs::create_dir_all(&data_dir).map_err(|source| StoreError::Io {
                path: data_dir.clone(),
                source,
            })?;
        }

        let collections = Collections {
            reminders: load_collection(&data_dir, Collection::Reminders)?,
            users: load_collection(&data_dir, Collection::Users)?,
            stats: load_collection(&data_dir, Collection::Stats)?,
            habits: load_collection(&data_dir, Collection::Habits)?,
            moods: load_collection(&data_dir, Collection::Moods)?,
        };
        info!(
            "Loaded {} reminders and {} user profiles from {}",
            collections.reminders.len(),
            collections.users.len(),
            data_dir.display()
        );

        Ok(Self {
            inner: Arc::new(Mutex::new(collections)),
            data_dir: Arc::new(data_dir),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        // a panic while holding the lock leaves plain data behind; keep serving it
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs a read-only closure against the collections.
    pub fn read<T>(&self, f: impl FnOnce(&Collections) -> T) -> T {
        f(&self.lock())
    }

    /// Runs `f` on a copy of the collections, rewrites the files of
    /// `touched` and only then makes the copy current.
    ///
    /// When `f` or a write fails the in-memory state is left as it was.
    pub fn update<T>(
        &self,
        touched: &[Collection],
        f: impl FnOnce(&mut Collections) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.lock();
        let mut draft = guard.clone();
        let value = f(&mut draft)?;
        for collection in touched {
            self.save(&draft, *collection)?;
        }
        *guard = draft;
        Ok(value)
    }

    fn save(&self, collections: &Collections, collection: Collection) -> Result<(), StoreError> {
        let json = collections
            .to_json(collection)
            .map_err(|source| StoreError::Serialize {
                collection: collection.file_name(),
                source,
            })?;
        write_atomically(&self.data_dir.join(collection.file_name()), json.as_bytes())
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).map_err(|source| StoreError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_collection<T>(data_dir: &Path, collection: Collection) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
{
    let path = data_dir.join(collection.file_name());
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(source) => return Err(StoreError::Io { path, source }),
    };
    if raw.trim().is_empty() {
        return Ok(T::default());
    }

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            let aside = path.with_extension("json.corrupt");
            warn!(
                "{} is malformed ({}); moving it to {} and starting empty",
                path.display(),
                e,
                aside.display()
            );
            fs::rename(&path, &aside).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            Ok(T::default())
        }
    }
}

/// Health of one data file, as reported by `datactl check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    Missing,
    Valid { entries: usize },
    Malformed { error: String },
}

/// Inspects every data file without modifying anything.
pub fn check_files(data_dir: &Path) -> Vec<(Collection, FileStatus)> {
    Collection::ALL
        .iter()
        .map(|collection| {
            let path = data_dir.join(collection.file_name());
            let status = match fs::read_to_string(&path) {
                Err(_) => FileStatus::Missing,
                Ok(raw) if raw.trim().is_empty() => FileStatus::Valid { entries: 0 },
                Ok(raw) => match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&raw) {
                    Ok(map) => FileStatus::Valid { entries: map.len() },
                    Err(e) => FileStatus::Malformed { error: e.to_string() },
                },
            };
            (*collection, status)
        })
        .collect()
}

/// Deletes every data file; returns how many existed.
pub fn reset_files(data_dir: &Path) -> Result<usize, StoreError> {
    let mut removed = 0;
    for collection in Collection::ALL {
        let path = data_dir.join(collection.file_name());
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => return Err(StoreError::Io { path, source }),
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_empty_dir() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        assert_eq!(store.read(|c| c.reminders.len()), 0);
    }

    #[test]
    fn test_open_creates_missing_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("data");
        DataStore::open(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_malformed_file_is_moved_aside() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("stats.json"), "{ not json").unwrap();

        let store = DataStore::open(dir.path()).unwrap();
        assert!(store.read(|c| c.stats.is_empty()));
        assert!(dir.path().join("stats.json.corrupt").exists());
        assert!(!dir.path().join("stats.json").exists());
    }

    #[test]
    fn test_update_persists_touched_collections() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        store
            .update(&[Collection::Stats], |c| {
                c.stats.entry(7).or_default().created = 3;
                Ok(())
            })
            .unwrap();

        let reopened = DataStore::open(dir.path()).unwrap();
        assert_eq!(reopened.read(|c| c.stats.get(&7).map(|s| s.created)), Some(3));
        assert!(!dir.path().join("reminders.json").exists());
    }

    #[test]
    fn test_failed_update_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        let result: Result<(), _> = store.update(&[Collection::Stats], |c| {
            c.stats.entry(1).or_default().xp = 10;
            Err(StoreError::NotFound("x".to_string()))
        });
        assert!(result.is_err());
        assert!(!dir.path().join("stats.json").exists());
        assert!(store.read(|c| c.stats.is_empty()));
    }

    #[test]
    fn test_failed_write_keeps_memory_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        // a directory where the temp file should go makes the write fail
        fs::create_dir(dir.path().join("stats.json.tmp")).unwrap();

        let result = store.update(&[Collection::Stats], |c| {
            c.stats.entry(1).or_default().xp = 10;
            Ok(())
        });
        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert!(store.read(|c| c.stats.is_empty()));

        fs::remove_dir(dir.path().join("stats.json.tmp")).unwrap();
        store
            .update(&[Collection::Users], |c| {
                c.users.entry(2).or_default();
                Ok(())
            })
            .unwrap();
        assert!(store.read(|c| c.stats.is_empty()));
    }

    #[test]
    fn test_check_and_reset_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("reminders.json"), "{}").unwrap();
        fs::write(dir.path().join("moods.json"), "[").unwrap();

        let report = check_files(dir.path());
        assert_eq!(report[0], (Collection::Reminders, FileStatus::Valid { entries: 0 }));
        assert_eq!(report[1], (Collection::Users, FileStatus::Missing));
        assert!(matches!(report[4].1, FileStatus::Malformed { .. }));

        assert_eq!(reset_files(dir.path()).unwrap(), 2);
        assert_eq!(reset_files(dir.path()).unwrap(), 0);
    }
}
