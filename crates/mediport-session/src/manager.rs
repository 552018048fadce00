//! The session manager: the only legal way to mutate session state.
//!
//! This is the central piece of the crate. It's responsible for:
//! - Restoring a persisted session at startup (and rejecting stale ones)
//! - Driving the login → optional-MFA → authenticated flow
//! - Keeping persisted storage and in-memory state in lockstep
//! - Tearing the session down on logout or credential expiry
//!
//! # Concurrency note
//!
//! `SessionManager` is NOT internally synchronized — operations take
//! `&mut self` and suspend only at the gateway's network boundary. There
//! is one session per running client, mutated from one logical thread;
//! callers that need to share it wrap it in a mutex at a higher level.
//! Overlapping two mutating operations is a caller bug (the UI disables
//! its submit button while a request is in flight), not something this
//! type defends against with locks.

use std::sync::Arc;

use mediport_store::{Storage, TOKEN_KEY, USER_KEY};
use mediport_types::{
    ApiError, LoginResponse, MfaChallenge, MfaVerification, Registration,
    User, UserRole, token,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::{AuthGateway, AuthState, LoginResult, SessionEvent, SessionSnapshot};

/// Shown when a login fails for any reason the server didn't explain.
const LOGIN_FALLBACK: &str =
    "An error occurred during login. Please try again.";
/// Shown when a second-factor code is rejected without a server message.
const MFA_FALLBACK: &str = "Invalid MFA code. Please try again.";
/// Shown when a registration fails without a server message.
const REGISTER_FALLBACK: &str =
    "An error occurred during registration. Please try again.";

/// Owns the session and exposes its operations.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ initialize() ──→ login()/register() ──→ [Authenticated]
///   │            │                  │                    │
///   │       (restores a        (may detour via      current_user()
///   │        persisted          MfaPending +         refreshes, or
///   │        session)           verify_mfa())        logs out on 401
///   │                                                    │
///   └──────────────── logout() ←─────────────────────────┘
/// ```
///
/// Storage discipline: every transition into the authenticated state
/// writes both persisted keys before the in-memory state flips; every
/// transition out removes both. Reading back an expired or unparseable
/// credential clears both. The persisted pair and the in-memory pair
/// are therefore never observably out of sync.
pub struct SessionManager<G: AuthGateway> {
    gateway: G,
    storage: Arc<dyn Storage>,
    events: UnboundedSender<SessionEvent>,

    state: AuthState,
    loading: bool,
    error: Option<String>,
}

impl<G: AuthGateway> SessionManager<G> {
    /// Creates a manager in the pre-bootstrap state (`loading == true`,
    /// anonymous). Call [`initialize`](Self::initialize) before reading
    /// session state.
    pub fn new(
        gateway: G,
        storage: Arc<dyn Storage>,
        events: UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            gateway,
            storage,
            events,
            state: AuthState::Anonymous,
            loading: true,
            error: None,
        }
    }

    // -- Bootstrap ---------------------------------------------------------

    /// Restores a persisted session, once, at startup.
    ///
    /// If storage holds both a credential and a user record, the record
    /// parses, and the credential's expiry is still in the future, the
    /// session comes back authenticated — no network round trip. In
    /// every other case both keys are removed and the session stays
    /// anonymous.
    ///
    /// `loading` drops to `false` at the end, unconditionally, exactly
    /// once — it is the "safe to render" signal for the UI.
    pub fn initialize(&mut self) {
        let stored_token = self.read_item(TOKEN_KEY);
        let stored_user = self.read_item(USER_KEY).and_then(|raw| {
            match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "persisted user record unreadable"
                    );
                    None
                }
            }
        });

        match (stored_token, stored_user) {
            (Some(tok), Some(user)) if !token::is_expired(&tok) => {
                tracing::info!(role = %user.role, "restored persisted session");
                self.state = AuthState::Authenticated { user, token: tok };
            }
            _ => {
                // Missing, mismatched, or expired — clear both so no
                // half-session ever greets the next bootstrap.
                self.clear_persisted();
            }
        }

        self.loading = false;
    }

    // -- Sign-in flows -----------------------------------------------------

    /// Attempts a login with primary credentials.
    ///
    /// Email and password pass through uninterpreted — format checks
    /// belong to the presentation layer. Three outcomes:
    ///
    /// - [`LoginResult::Success`] — session authenticated and persisted.
    /// - [`LoginResult::MfaRequired`] — challenge stored in memory only;
    ///   nothing persisted until the second factor clears.
    /// - [`LoginResult::Failed`] — `error` set, session anonymous. A
    ///   failed attempt never leaves partial state, and it discards any
    ///   second-factor challenge left over from an earlier attempt.
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> LoginResult {
        self.error = None;

        match self.gateway.login(email, password, role).await {
            Ok(LoginResponse::Authenticated(grant)) => {
                let user = User {
                    role,
                    profile: grant.profile,
                };
                self.enter_authenticated(grant.token, user);
                LoginResult::Success
            }
            Ok(LoginResponse::MfaRequired(challenge)) => {
                tracing::info!(%role, "login accepted, second factor required");
                self.state = AuthState::MfaPending(challenge);
                LoginResult::MfaRequired
            }
            Err(err) => {
                self.state = AuthState::Anonymous;
                self.fail(err, LOGIN_FALLBACK)
            }
        }
    }

    /// Completes a pending second factor with an authenticator code.
    ///
    /// Only valid while a challenge is pending; calling it otherwise
    /// fails locally without touching the network. The code itself is
    /// not validated here — whatever the server says comes back as the
    /// result.
    ///
    /// On failure the challenge survives untouched, so the user can
    /// retry with the same `tempToken`.
    pub async fn verify_mfa(&mut self, code: &str) -> LoginResult {
        self.error = None;

        let challenge = match &self.state {
            AuthState::MfaPending(challenge) => challenge.clone(),
            _ => {
                let message = "No login is awaiting verification.".to_string();
                self.error = Some(message.clone());
                return LoginResult::Failed(message);
            }
        };

        let attempt = MfaVerification {
            user_id: challenge.user_id,
            user_type: challenge.user_type,
            token: code.to_string(),
            temp_token: challenge.temp_token,
        };

        match self.gateway.verify_mfa(&attempt).await {
            Ok(verified) => {
                self.enter_authenticated(verified.token, verified.user);
                LoginResult::Success
            }
            // Challenge stays in place — wrong codes are retryable.
            Err(err) => self.fail(err, MFA_FALLBACK),
        }
    }

    /// Creates an account and signs it in.
    ///
    /// Same contract shape as [`login`](Self::login) minus the MFA
    /// branch: registration is always a single round trip, and success
    /// is an implicit login.
    pub async fn register(
        &mut self,
        form: &Registration,
        role: UserRole,
    ) -> LoginResult {
        self.error = None;

        match self.gateway.register(form, role).await {
            Ok(grant) => {
                let user = User {
                    role,
                    profile: grant.profile,
                };
                self.enter_authenticated(grant.token, user);
                LoginResult::Success
            }
            Err(err) => {
                self.state = AuthState::Anonymous;
                self.fail(err, REGISTER_FALLBACK)
            }
        }
    }

    // -- Session upkeep ----------------------------------------------------

    /// Ends the session: clears both persisted keys, resets to
    /// anonymous (dropping any half-finished MFA challenge), and tells
    /// the UI to navigate to the login entry point.
    ///
    /// Never fails and makes no network call. Safe to call repeatedly.
    pub fn logout(&mut self) {
        self.clear_persisted();
        self.state = AuthState::Anonymous;
        self.error = None;
        // A dropped receiver just means nobody is listening anymore
        // (e.g. the app is shutting down) — not an error.
        let _ = self.events.send(SessionEvent::NavigateToLogin);
        tracing::info!("logged out");
    }

    /// Refreshes the signed-in user's canonical profile.
    ///
    /// Overwrites the persisted and in-memory user record (the token is
    /// untouched; the role is carried over from the current session).
    /// Returns the fresh record, or `None` if the session isn't
    /// authenticated or the request failed.
    ///
    /// A 401 here means the credential died server-side: the gateway's
    /// interceptor has already cleared storage and fired the navigation
    /// signal, so this method only mirrors the reset in memory — firing
    /// a second signal would double-navigate the UI. Any other failure
    /// leaves the session exactly as it was.
    pub async fn current_user(&mut self) -> Option<User> {
        let role = match &self.state {
            AuthState::Authenticated { user, .. } => user.role,
            _ => return None,
        };

        match self.gateway.current_user().await {
            Ok(profile) => {
                let user = User { role, profile };
                match serde_json::to_string(&user) {
                    Ok(raw) => self.write_item(USER_KEY, &raw),
                    Err(e) => tracing::warn!(
                        error = %e,
                        "could not encode refreshed user"
                    ),
                }
                if let AuthState::Authenticated { user: current, .. } =
                    &mut self.state
                {
                    *current = user.clone();
                }
                Some(user)
            }
            Err(err) if err.is_unauthorized() => {
                tracing::info!("credential rejected, resetting session");
                self.clear_persisted();
                self.state = AuthState::Anonymous;
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "profile refresh failed");
                None
            }
        }
    }

    // -- Views -------------------------------------------------------------

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    /// The live credential, if any.
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            AuthState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    /// `true` if a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// `true` while a second factor is outstanding.
    pub fn mfa_pending(&self) -> bool {
        self.state.is_mfa_pending()
    }

    /// The outstanding second-factor challenge, if any.
    pub fn mfa_challenge(&self) -> Option<&MfaChallenge> {
        match &self.state {
            AuthState::MfaPending(challenge) => Some(challenge),
            _ => None,
        }
    }

    /// `true` only until [`initialize`](Self::initialize) has run.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// The last operation's error message, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The full state, for callers that want to match on it.
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// A point-in-time copy of everything the UI renders from.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user().cloned(),
            token: self.token().map(str::to_string),
            mfa_pending: self.mfa_pending(),
            loading: self.loading,
            error: self.error.clone(),
        }
    }

    /// The gateway this session talks through. Lets the host reach
    /// gateway-only surfaces (MFA enrollment, auth logs) that share the
    /// session's credential but never mutate session state.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // -- Internals ---------------------------------------------------------

    /// Persists both halves of a fresh session and flips the state.
    fn enter_authenticated(&mut self, token: String, user: User) {
        self.write_item(TOKEN_KEY, &token);
        match serde_json::to_string(&user) {
            Ok(raw) => self.write_item(USER_KEY, &raw),
            Err(e) => {
                tracing::warn!(error = %e, "could not encode user record")
            }
        }
        tracing::info!(role = %user.role, "session authenticated");
        self.state = AuthState::Authenticated { user, token };
        self.error = None;
    }

    /// Records a failed operation: picks the server's message when there
    /// is one, the operation's generic fallback otherwise.
    fn fail(&mut self, err: ApiError, fallback: &str) -> LoginResult {
        let message = err
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string());
        tracing::warn!(error = %err, "authentication request failed");
        self.error = Some(message.clone());
        LoginResult::Failed(message)
    }

    fn read_item(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed");
                None
            }
        }
    }

    fn write_item(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set_item(key, value) {
            tracing::warn!(key, error = %e, "storage write failed");
        }
    }

    fn clear_persisted(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                tracing::warn!(key, error = %e, "storage remove failed");
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
