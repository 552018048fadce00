//! Error types for the storage layer.

/// Errors that a storage backend can surface.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file's contents could not be parsed or re-encoded.
    #[error("storage encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Another thread panicked while holding the store's lock.
    #[error("storage lock poisoned")]
    Poisoned,
}
