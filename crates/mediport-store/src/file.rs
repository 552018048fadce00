//! File-backed storage backend.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::{Storage, StorageError};

/// A [`Storage`] backend persisted as one JSON object file.
///
/// The whole map is loaded when the store is opened and rewritten on
/// every mutation — the two well-known keys are tiny, so rewriting beats
/// bookkeeping. Writes happen while the lock is held, which keeps the
/// file and the in-memory view consistent ("last write wins,
/// synchronously").
///
/// A file that exists but cannot be parsed is treated like an absent
/// file: the store starts empty and logs a warning. Stale credentials
/// are re-validated at bootstrap anyway, so self-healing here is safe.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    items: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Opens (or initializes) a store backed by `path`.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] if the file exists but cannot be
    /// read. A missing or unparseable file is not an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "storage file unreadable, starting empty"
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                HashMap::new()
            }
            Err(e) => return Err(StorageError::Io(e)),
        };

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    /// The file this store writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(
        &self,
        items: &HashMap<String, String>,
    ) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl Storage for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items =
            self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items =
            self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        self.persist(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items =
            self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        self.persist(&items)
    }
}
