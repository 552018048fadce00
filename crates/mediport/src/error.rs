//! Unified error type for the Mediport meta-crate.

use mediport_store::StorageError;
use mediport_types::{ApiError, TokenError};

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `mediport` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate. The
/// `#[from]` attribute on each variant auto-generates `From` impls, so
/// the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum MediportError {
    /// A gateway-level error (transport, API failure, 401, bad body).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A credential-inspection error (malformed token).
    #[error(transparent)]
    Token(#[from] TokenError),

    /// A storage-level error (I/O, encoding, poisoned lock).
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api_error() {
        let err = ApiError::Network("connection refused".into());
        let top: MediportError = err.into();
        assert!(matches!(top, MediportError::Api(_)));
        assert!(top.to_string().contains("connection refused"));
    }

    #[test]
    fn test_from_storage_error() {
        let err = StorageError::Poisoned;
        let top: MediportError = err.into();
        assert!(matches!(top, MediportError::Storage(_)));
    }
}
