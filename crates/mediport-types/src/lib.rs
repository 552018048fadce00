//! Shared data types for Mediport.
//!
//! This crate defines the "language" that the rest of the workspace
//! speaks:
//!
//! - **Types** ([`User`], [`UserRole`], [`MfaChallenge`], etc.) — the
//!   records that travel between the portal backend, the session layer,
//!   and persisted storage.
//! - **Token inspection** ([`token`]) — the pure expiry check over the
//!   opaque bearer credential the backend issues.
//! - **Errors** ([`ApiError`], [`TokenError`]) — what can go wrong when
//!   talking to the backend or inspecting a credential.
//!
//! # Architecture
//!
//! The types layer sits below everything else. It doesn't know about
//! HTTP, storage, or session state — it only knows the shapes of the
//! data and how to read an expiry claim out of a token.
//!
//! ```text
//! Session (state machine) → Types (records) ← Gateway (HTTP)
//! ```

mod error;
pub mod token;
mod types;

pub use error::{ApiError, TokenError};
pub use types::{
    AuthLogEntry, AuthPayload, LoginResponse, MfaChallenge, MfaSetup,
    MfaVerification, MfaVerifyResponse, Registration, User, UserProfile,
    UserRole,
};
