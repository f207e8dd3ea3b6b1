use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

/// Fixed key the whole state is stored under.
pub const STORAGE_KEY: &str = "arogyaSahayakData";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Snapshot must be a JSON object")]
    NotAnObject,
}

/// Where the serialized snapshot lives.
pub trait SnapshotStorage {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, StorageError>;

    fn save(&self, snapshot: &str) -> Result<(), StorageError>;
}

/// Snapshot kept as `<dir>/arogyaSahayakData.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&self.path)?))
    }

    fn save(&self, snapshot: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, snapshot)?;
        Ok(())
    }
}

/// In-process storage, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    snapshot: RefCell<Option<String>>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: &str) -> Self {
        Self {
            snapshot: RefCell::new(Some(snapshot.to_string())),
            writes: Cell::new(0),
        }
    }

    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.borrow().clone()
    }

    /// Number of successful saves.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.snapshot.borrow().clone())
    }

    fn save(&self, snapshot: &str) -> Result<(), StorageError> {
        *self.snapshot.borrow_mut() = Some(snapshot.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn file_storage_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let storage = FileStorage::new(&nested);
        storage.save("{}").unwrap();
        assert!(storage.path().ends_with("arogyaSahayakData.json"));
        assert_eq!(storage.load().unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn memory_storage_counts_writes() {
        let storage = MemoryStorage::new();
        storage.save("1").unwrap();
        storage.save("2").unwrap();
        assert_eq!(storage.writes(), 2);
        assert_eq!(storage.snapshot().as_deref(), Some("2"));
    }
}
