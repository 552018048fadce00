//! Persisted storage abstraction for Mediport.
//!
//! Provides the [`Storage`] trait — the `getItem`/`setItem`/`removeItem`
//! surface the session layer persists credentials through — and two
//! backends:
//!
//! - [`MemoryStore`] (default) — ephemeral, for tests and hosts that
//!   manage persistence themselves
//! - [`FileStore`] — a single JSON file, surviving process restarts
//!
//! # Who writes what
//!
//! Storage holds exactly two well-known keys ([`TOKEN_KEY`] and
//! [`USER_KEY`]). Only the session manager and the gateway's 401
//! interceptor ever write them, always synchronously, so the discipline
//! is simply "last write wins". The backends still serialize internally
//! with a `Mutex` because the gateway reads the token from whatever task
//! a request runs on.

mod error;
mod file;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage key holding the bearer credential, verbatim.
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the signed-in user record, JSON-encoded.
pub const USER_KEY: &str = "user";

/// Simple key/value persistence scoped to the client installation.
///
/// # Trait bounds
///
/// - `Send + Sync` → the store is shared between the session manager and
///   the gateway, which may touch it from different async tasks.
/// - `'static` → it owns its data; it lives as long as the application.
///
/// All three methods are fallible, but callers in the session layer
/// treat persistence failures as non-fatal: they log and carry on, the
/// same way a browser client survives a broken `localStorage`.
pub trait Storage: Send + Sync + 'static {
    /// Reads the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
