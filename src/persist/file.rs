//! File-backed stores.
//!
//! Writes go to a sibling file named after the full target name plus
//! `.tmp` (`state.json` -> `state.json.tmp`) and are renamed into place, so
//! a crash mid-write leaves the previous contents intact.

use std::cell::Cell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::store::{CounterStore, SessionStore, StorageError};

/// Counter file schema version.
pub const COUNTER_FILE_VERSION: u16 = 1;

fn write_atomic(path: &Path, data: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp_path = tmp_path_for(path)?;
    fs::write(&tmp_path, data)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> Result<PathBuf, StorageError> {
    let Some(name) = path.file_name() else {
        return Err(StorageError::Unavailable(format!(
            "{} does not name a file",
            path.display()
        )));
    };
    let mut tmp_name = name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Session snapshot in a single file.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store at `path`. Nothing is touched until the first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn save(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        write_atomic(&self.path, bytes)
    }

    fn load(&self) -> Result<Option<Vec<u8>>, StorageError> {
        read_optional(&self.path)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct CounterFile {
    version: u16,
    total_moves: u64,
}

/// Cumulative counter in a JSON file that other processes may also write.
///
/// External changes are found by re-reading the file and comparing with the
/// last value this handle read or wrote.
#[derive(Debug)]
pub struct FileCounterStore {
    path: PathBuf,
    last_seen: Cell<Option<u64>>,
}

impl FileCounterStore {
    /// Counter at `path`. A missing file reads as 0.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_seen: Cell::new(None),
        }
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<u64, StorageError> {
        let Some(bytes) = read_optional(&self.path)? else {
            return Ok(0);
        };
        let file: CounterFile =
            serde_json::from_slice(&bytes).map_err(|e| StorageError::Format(e.to_string()))?;
        if file.version != COUNTER_FILE_VERSION {
            return Err(StorageError::Format(format!(
                "counter version {} (expected {})",
                file.version, COUNTER_FILE_VERSION
            )));
        }
        Ok(file.total_moves)
    }
}

impl CounterStore for FileCounterStore {
    fn read(&self) -> Result<u64, StorageError> {
        let value = self.read_file()?;
        self.last_seen.set(Some(value));
        Ok(value)
    }

    fn write(&mut self, value: u64) -> Result<(), StorageError> {
        let file = CounterFile {
            version: COUNTER_FILE_VERSION,
            total_moves: value,
        };
        let json =
            serde_json::to_vec_pretty(&file).map_err(|e| StorageError::Format(e.to_string()))?;
        write_atomic(&self.path, &json)?;
        self.last_seen.set(Some(value));
        Ok(())
    }

    fn take_external_change(&mut self) -> Option<u64> {
        let current = match self.read_file() {
            Ok(value) => value,
            Err(err) => {
                debug!(path = %self.path.display(), %err, "counter re-read failed");
                return None;
            }
        };
        let previous = self.last_seen.replace(Some(current));
        match previous {
            Some(seen) if seen != current => Some(current),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_file_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileSessionStore::new(dir.path().join("nested").join("session.bin"));

        assert_eq!(store.load().unwrap(), None);
        store.save(b"one").unwrap();
        store.save(b"two").unwrap();
        assert_eq!(store.load().unwrap(), Some(b"two".to_vec()));
        assert!(!tmp_path_for(store.path()).unwrap().exists());

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_tmp_path_keeps_full_name() {
        let dir = tempfile::tempdir().unwrap();
        let bin = tmp_path_for(&dir.path().join("state.bin")).unwrap();
        let json = tmp_path_for(&dir.path().join("state.json")).unwrap();

        assert_ne!(bin, json);
        assert_eq!(bin, dir.path().join("state.bin.tmp"));
        assert_eq!(
            tmp_path_for(&dir.path().join("state.tmp")).unwrap(),
            dir.path().join("state.tmp.tmp")
        );
        assert!(tmp_path_for(Path::new("/")).is_err());
    }

    #[test]
    fn test_sibling_stores_do_not_share_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = FileSessionStore::new(dir.path().join("state.bin"));
        let mut counter = FileCounterStore::new(dir.path().join("state.json"));
        let mut odd = FileSessionStore::new(dir.path().join("state.tmp"));

        session.save(b"snapshot").unwrap();
        counter.write(3).unwrap();
        odd.save(b"other").unwrap();
        session.save(b"snapshot2").unwrap();

        assert_eq!(session.load().unwrap(), Some(b"snapshot2".to_vec()));
        assert_eq!(counter.read().unwrap(), 3);
        assert_eq!(odd.load().unwrap(), Some(b"other".to_vec()));

        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, ["state.bin", "state.json", "state.tmp"]);
    }

    #[test]
    fn test_counter_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter.json");
        let mut counter = FileCounterStore::new(&path);

        assert_eq!(counter.read().unwrap(), 0);
        assert_eq!(counter.increment().unwrap(), 1);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["total_moves"], 1);
    }

    #[test]
    fn test_counter_detects_other_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter.json");
        let mut a = FileCounterStore::new(&path);
        let mut b = FileCounterStore::new(&path);

        a.write(5).unwrap();
        assert_eq!(b.read().unwrap(), 5);
        assert_eq!(b.take_external_change(), None);

        a.increment().unwrap();
        assert_eq!(b.take_external_change(), Some(6));
        assert_eq!(b.take_external_change(), None);
        assert_eq!(a.take_external_change(), None);
    }

    #[test]
    fn test_counter_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter.json");
        fs::write(&path, "not json").unwrap();

        let counter = FileCounterStore::new(&path);
        assert!(matches!(counter.read(), Err(StorageError::Format(_))));
    }

    #[test]
    fn test_counter_rejects_other_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("counter.json");
        fs::write(&path, r#"{"version": 9, "total_moves": 3}"#).unwrap();

        let counter = FileCounterStore::new(&path);
        assert!(matches!(counter.read(), Err(StorageError::Format(_))));
    }
}
