//! Session types: the data structures that represent the signed-in state.
//!
//! A "session" is the client's record of who is signed in. It tracks:
//! - WHO the user is (role-tagged [`User`] record)
//! - WHAT credential proves it (the bearer token)
//! - WHERE an interrupted login stands (a pending second factor)

use mediport_types::{MfaChallenge, User};

// ---------------------------------------------------------------------------
// AuthState
// ---------------------------------------------------------------------------

/// The current authentication state.
///
/// This is a state machine with three mutually exclusive states:
///
/// ```text
///                    login (MFA marker)          verify_mfa
///   Anonymous ──────────────────────→ MfaPending ──────────→ Authenticated
///       │  ↑                               │                      │
///       │  └───── failed login/verify ─────┘ (verify failure      │
///       │            keeps the challenge — retryable)             │
///       │                                                         │
///       └────────────── login / register (no MFA) ───────────────→│
///       ↑                                                         │
///       └──────────── logout / expiry / 401 ─────────────────────┘
/// ```
///
/// Encoding the states as an enum makes the portal's session invariants
/// structural: an MFA-pending session *cannot* carry a user or token,
/// and an authenticated session *cannot* lack either.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Nobody is signed in. Login and registration are available.
    Anonymous,

    /// Primary credentials were accepted but a second factor is
    /// outstanding. The challenge holds everything needed to finish
    /// without re-sending the password. Nothing is persisted yet.
    MfaPending(MfaChallenge),

    /// A user is signed in with a live credential. Both halves are
    /// mirrored to persisted storage.
    Authenticated { user: User, token: String },
}

impl AuthState {
    /// Returns `true` if a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Returns `true` if a second factor is outstanding.
    pub fn is_mfa_pending(&self) -> bool {
        matches!(self, Self::MfaPending(_))
    }

    /// Returns `true` if nobody is signed in and no login is in flight.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

// ---------------------------------------------------------------------------
// LoginResult
// ---------------------------------------------------------------------------

/// What a login / verify / register operation reports back to the
/// caller.
///
/// The presentation layer branches on this to decide what to render
/// next: the destination page, the second-factor form, or an inline
/// error. The same message carried by `Failed` is also left in the
/// session's `error` field for reactive consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResult {
    /// The session is now fully authenticated.
    Success,

    /// Primary credentials accepted; the caller should show the
    /// second-factor form and call `verify_mfa`.
    MfaRequired,

    /// The operation failed; the message is ready for display.
    Failed(String),
}

// ---------------------------------------------------------------------------
// SessionEvent
// ---------------------------------------------------------------------------

/// Out-of-band signals from the session layer to the presentation layer.
///
/// These travel on an unbounded channel owned by the application root,
/// because they can originate outside any presentation-initiated call —
/// most importantly when the gateway's 401 interceptor kills the session
/// behind the UI's back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session ended (logout or credential expiry); the UI should
    /// navigate to the login entry point. No error message accompanies
    /// this — the login prompt itself is the message.
    NavigateToLogin,
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// A point-in-time copy of everything the presentation layer renders
/// from.
///
/// Cheap to clone and free of borrows, so reactive UI code can hold one
/// across its own await points without pinning the session manager.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// The signed-in user, if any.
    pub user: Option<User>,
    /// The live credential, if any.
    pub token: Option<String>,
    /// `true` while a second factor is outstanding.
    pub mfa_pending: bool,
    /// `true` only until bootstrap finishes.
    pub loading: bool,
    /// The last operation's error message, if it failed.
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediport_types::UserRole;

    fn challenge() -> MfaChallenge {
        MfaChallenge {
            temp_token: "X".into(),
            user_id: 5,
            user_type: UserRole::Client,
        }
    }

    #[test]
    fn test_auth_state_predicates_are_mutually_exclusive() {
        let states = [
            AuthState::Anonymous,
            AuthState::MfaPending(challenge()),
        ];
        for state in states {
            let flags = [
                state.is_anonymous(),
                state.is_mfa_pending(),
                state.is_authenticated(),
            ];
            assert_eq!(
                flags.iter().filter(|f| **f).count(),
                1,
                "exactly one predicate must hold for {state:?}"
            );
        }
    }
}
