//! Error types for the data layer.
//!
//! Each crate in Mediport defines its own error enum. [`ApiError`] lives
//! here rather than in the gateway crate because it is the error
//! *vocabulary* of the gateway contract — the session layer matches on
//! it without knowing which HTTP client produced it.

/// Errors that a gateway call can surface.
///
/// The variants follow the portal's error taxonomy: `Unauthorized` is
/// special-cased because a 401 forces a logout; everything else either
/// carries a server-provided message or collapses into a transport /
/// decode bucket that the session layer replaces with a generic
/// user-facing fallback.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the credential (HTTP 401). By the time a
    /// caller sees this, the gateway's interceptor has already cleared
    /// persisted credentials and signalled the session layer.
    #[error("unauthorized")]
    Unauthorized,

    /// The backend answered with a non-success status other than 401.
    /// `message` is the server's `{"message": ...}` body when it sent
    /// one, otherwise a status-derived fallback.
    #[error("request failed ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response: DNS, connect, TLS, or
    /// timeout failure. Carries the transport error's rendering; the
    /// user never sees this text directly.
    #[error("network error: {0}")]
    Network(String),

    /// The response arrived but its body didn't match the expected
    /// shape.
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

impl ApiError {
    /// The server-provided message, if this error carries one.
    ///
    /// The session layer shows this to the user verbatim and falls back
    /// to an operation-specific generic message for every other variant.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }

    /// `true` if this is the forced-logout (HTTP 401) case.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Errors from inspecting a bearer credential.
///
/// Callers doing an expiry check never see this directly — the check
/// treats any decode failure as "expired" — but the decode function is
/// public and keeps its failure cause for logging.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The credential is not a well-formed signed token, or lacks the
    /// claims an expiry check needs.
    #[error("malformed credential: {0}")]
    Malformed(#[from] jsonwebtoken::errors::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_only_for_api_variant() {
        let api = ApiError::Api {
            status: 400,
            message: "Invalid credentials".into(),
        };
        assert_eq!(api.server_message(), Some("Invalid credentials"));

        assert_eq!(ApiError::Unauthorized.server_message(), None);
        assert_eq!(
            ApiError::Network("connection refused".into()).server_message(),
            None
        );
    }

    #[test]
    fn test_is_unauthorized() {
        assert!(ApiError::Unauthorized.is_unauthorized());
        assert!(!ApiError::Decode("x".into()).is_unauthorized());
    }

    #[test]
    fn test_api_error_display_includes_status_and_message() {
        let err = ApiError::Api {
            status: 409,
            message: "email already registered".into(),
        };
        let text = err.to_string();
        assert!(text.contains("409"));
        assert!(text.contains("email already registered"));
    }
}
