use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::diary_entry::DiaryEntry;

/// Error type for all fallible store operations.
///
/// A failed save is never fatal to the application: the caller keeps its
/// in-memory draft and surfaces a notification instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persistence medium could not be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    /// The store file exists but is not a JSON object at the top level.
    #[error("store file {} is not valid JSON: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(serde_json::Error),
}

/// Identifies one diary entry's storage slot.
///
/// The month is 0-based in memory and written 1-based into the storage key,
/// matching the key format used by existing data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl EntryKey {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        EntryKey { year, month, day }
    }

    pub fn storage_key(&self) -> String {
        format!("diary-{}-{}-{}", self.year, self.month + 1, self.day)
    }
}

/// Durable key-value store for diary entries, mirrored to one JSON file.
///
/// Records are kept as raw JSON values in memory so that a record this
/// version cannot parse is reported absent on `load` but still survives
/// flushes of other keys.
pub struct EntryStore {
    path: PathBuf,
    records: BTreeMap<String, Value>,
    dirty: bool,
}

impl EntryStore {
    /// Open the store at `path`. A missing file yields an empty store; an
    /// unparseable file is an error rather than silent data loss.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let records = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no store file yet, starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(StoreError::Unavailable(e)),
        };
        Ok(EntryStore {
            path,
            records,
            dirty: false,
        })
    }

    /// Load the entry stored under `key`. A present but malformed record is
    /// treated as absent.
    pub fn load(&self, key: &EntryKey) -> Option<DiaryEntry> {
        let value = self.records.get(&key.storage_key())?;
        match serde_json::from_value(value.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(key = %key.storage_key(), error = %e, "malformed record, treating as absent");
                None
            }
        }
    }

    /// Overwrite the record under `key` wholesale and flush to disk.
    pub fn save(&mut self, key: &EntryKey, entry: &DiaryEntry) -> Result<(), StoreError> {
        let value = serde_json::to_value(entry).map_err(StoreError::Serialize)?;
        self.records.insert(key.storage_key(), value);
        self.dirty = true;
        self.flush()
    }

    /// Remove the record under `key`, if any. Returns whether a record was
    /// actually removed.
    pub fn delete(&mut self, key: &EntryKey) -> Result<bool, StoreError> {
        if self.records.remove(&key.storage_key()).is_none() {
            return Ok(false);
        }
        self.dirty = true;
        self.flush()?;
        Ok(true)
    }

    pub fn contains(&self, key: &EntryKey) -> bool {
        self.records.contains_key(&key.storage_key())
    }

    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        let serialized = serde_json::to_string(&self.records).map_err(StoreError::Serialize)?;
        fs::write(&self.path, serialized)?;
        self.dirty = false;
        Ok(())
    }

    /// Final flush at shutdown. A no-op when every save already reached disk.
    pub fn close(mut self) -> Result<(), StoreError> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> EntryStore {
        EntryStore::open(dir.path().join("diary_entries.json")).unwrap()
    }

    #[test]
    fn storage_key_carries_one_based_month() {
        assert_eq!(
            EntryKey::new(2025, 2, 15).storage_key(),
            "diary-2025-3-15"
        );
        assert_eq!(EntryKey::new(2024, 0, 1).storage_key(), "diary-2024-1-1");
        assert_eq!(
            EntryKey::new(2024, 11, 31).storage_key(),
            "diary-2024-12-31"
        );
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert!(!store.contains(&EntryKey::new(2025, 0, 1)));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let key = EntryKey::new(2025, 2, 15);
        let entry = DiaryEntry {
            title: "hiking".into(),
            content: "up the ridge\nand back".into(),
            mood: "😊 Happy".into(),
            tags: vec!["outdoors".into(), "friends".into()],
        };
        store.save(&key, &entry).unwrap();
        assert_eq!(store.load(&key), Some(entry));
    }

    #[test]
    fn saving_twice_matches_saving_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diary_entries.json");
        let mut store = EntryStore::open(path.clone()).unwrap();
        let key = EntryKey::new(2025, 5, 3);
        let entry = DiaryEntry {
            title: "t".into(),
            ..DiaryEntry::default()
        };
        store.save(&key, &entry).unwrap();
        let once = fs::read_to_string(&path).unwrap();
        store.save(&key, &entry).unwrap();
        let twice = fs::read_to_string(&path).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn reopen_sees_saved_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diary_entries.json");
        let key = EntryKey::new(2025, 2, 15);
        let entry = DiaryEntry {
            tags: vec!["work".into()],
            ..DiaryEntry::default()
        };
        let mut store = EntryStore::open(path.clone()).unwrap();
        store.save(&key, &entry).unwrap();
        store.close().unwrap();

        let reopened = EntryStore::open(path).unwrap();
        assert!(reopened.contains(&key));
        assert_eq!(reopened.load(&key), Some(entry));
    }

    #[test]
    fn malformed_record_loads_as_absent_but_survives_other_saves() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diary_entries.json");
        fs::write(&path, r#"{"diary-2025-3-15": "not an object"}"#).unwrap();

        let bad_key = EntryKey::new(2025, 2, 15);
        let mut store = EntryStore::open(path.clone()).unwrap();
        assert_eq!(store.load(&bad_key), None);
        // presence is keyed, not parseability
        assert!(store.contains(&bad_key));

        let other = EntryKey::new(2025, 2, 16);
        store
            .save(&other, &DiaryEntry::default())
            .unwrap();
        let reopened = EntryStore::open(path).unwrap();
        assert!(reopened.contains(&bad_key));
        assert_eq!(reopened.load(&bad_key), None);
    }

    #[test]
    fn corrupt_store_file_is_an_open_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diary_entries.json");
        fs::write(&path, "{{{ nope").unwrap();
        assert!(matches!(
            EntryStore::open(path),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn delete_removes_key_and_reports_absence() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let key = EntryKey::new(2025, 0, 10);
        store.save(&key, &DiaryEntry::default()).unwrap();
        assert!(store.delete(&key).unwrap());
        assert!(!store.contains(&key));
        assert!(!store.delete(&key).unwrap());
    }

    #[test]
    fn empty_entry_still_persists_as_a_record() {
        let dir = tempdir().unwrap();
        let mut store = store_in(&dir);
        let key = EntryKey::new(2025, 6, 4);
        store.save(&key, &DiaryEntry::default()).unwrap();
        assert!(store.contains(&key));
        assert_eq!(store.load(&key), Some(DiaryEntry::default()));
    }
}
