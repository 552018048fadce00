//! # Mediport
//!
//! Client-side session core for a patient/doctor healthcare portal.
//!
//! Mediport owns the authenticated-session state machine (login →
//! optional MFA → authenticated → expiry → logout) and its two seams: a
//! REST gateway to the portal backend and a persisted key/value store.
//! The host application renders from session snapshots and dispatches
//! user actions into the session manager.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mediport::{Portal, UserRole};
//!
//! # async fn run() -> Result<(), mediport::MediportError> {
//! let mut portal = Portal::builder("https://api.portal.example").build()?;
//! let mut events = portal.take_events().expect("first take");
//!
//! portal.session_mut().initialize();
//! portal
//!     .session_mut()
//!     .login("a@b.com", "pw123456", UserRole::Client)
//!     .await;
//! // events now delivers SessionEvent::NavigateToLogin on logout/expiry.
//! # Ok(())
//! # }
//! ```

mod error;
mod portal;
mod telemetry;

pub use error::MediportError;
pub use portal::{Portal, PortalBuilder};
pub use telemetry::init_tracing;

pub use mediport_gateway::{HttpGateway, HttpGatewayBuilder, UnauthorizedHook};
pub use mediport_session::{
    AuthGateway, AuthState, LoginResult, SessionEvent, SessionManager,
    SessionSnapshot,
};
pub use mediport_store::{
    FileStore, MemoryStore, Storage, StorageError, TOKEN_KEY, USER_KEY,
};
pub use mediport_types::{
    ApiError, AuthLogEntry, AuthPayload, LoginResponse, MfaChallenge,
    MfaSetup, MfaVerification, MfaVerifyResponse, Registration, TokenError,
    User, UserProfile, UserRole, token,
};
