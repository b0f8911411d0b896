use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::PersistenceError;

/// Best time in effect while nothing has been recorded yet.
pub const NO_RECORD: u32 = 9999;

/// Where the fastest completed-game time is kept between sessions.
pub trait RecordStore: Debug + Send + Sync {
    /// The stored best time in seconds, `None` when there is no usable record.
    fn load(&self) -> Option<u32>;

    /// Replaces the stored best time.
    fn save(&self, secs: u32) -> Result<(), PersistenceError>;
}

/// Best time kept as a single plain-text integer in a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRecordStore {
    path: PathBuf,
}

impl FileRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordStore for FileRecordStore {
    fn load(&self) -> Option<u32> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                log::warn!("Cannot read best time from {}: {err}", self.path.display());
                return None;
            }
        };

        match text.trim().parse() {
            Ok(secs) => Some(secs),
            Err(_) => {
                log::warn!("Ignoring malformed best time in {}", self.path.display());
                None
            }
        }
    }

    fn save(&self, secs: u32) -> Result<(), PersistenceError> {
        fs::write(&self.path, format!("{secs}\n")).map_err(|source| {
            PersistenceError::WriteFailed {
                path: self.path.clone(),
                source,
            }
        })
    }
}

/// Best time kept in memory only, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    best: Mutex<Option<u32>>,
}

impl MemoryRecordStore {
    pub fn new(best: Option<u32>) -> Self {
        Self {
            best: Mutex::new(best),
        }
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self) -> Option<u32> {
        *self.best.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save(&self, secs: u32) -> Result<(), PersistenceError> {
        *self.best.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(secs);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sapper-{}-{name}", std::process::id()))
    }

    #[test]
    fn file_store_round_trips_and_tolerates_whitespace() {
        let path = temp_path("records-roundtrip.txt");
        let store = FileRecordStore::new(&path);

        store.save(42).unwrap();
        assert_eq!(store.load(), Some(42));

        fs::write(&path, "  17 \n\n").unwrap();
        assert_eq!(store.load(), Some(17));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_or_garbage_file_means_no_record() {
        let path = temp_path("records-garbage.txt");
        let store = FileRecordStore::new(&path);

        assert_eq!(store.load(), None);

        fs::write(&path, "fast").unwrap();
        assert_eq!(store.load(), None);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let path = temp_path("no-such-dir").join("best_time.txt");
        let store = FileRecordStore::new(&path);

        let err = store.save(5).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::WriteFailed { path: failed, .. } if failed == path
        ));
    }

    #[test]
    fn memory_store_keeps_last_save() {
        let store = MemoryRecordStore::default();
        assert_eq!(store.load(), None);

        store.save(30).unwrap();
        assert_eq!(store.load(), Some(30));
    }
}
