//! Authentication session management for Mediport.
//!
//! This crate owns the lifecycle of the signed-in user:
//!
//! 1. **Bootstrap** — restoring a persisted session at startup
//!    ([`SessionManager::initialize`]), including the token expiry check
//! 2. **Sign-in flows** — login, optional second factor, registration
//! 3. **Session upkeep** — profile refresh, forced logout on expiry
//!
//! # How it fits in the stack
//!
//! ```text
//! Presentation (above)  ← reads snapshots, dispatches operations
//!     ↕
//! Session layer (this crate)  ← the state machine and its invariants
//!     ↕
//! Gateway + storage (below)  ← network I/O and persistence
//! ```
//!
//! The network seam is the [`AuthGateway`] trait: production wires in an
//! HTTP client, tests wire in a scripted mock. Either way, the session
//! manager is the only code that mutates session state.

#![allow(async_fn_in_trait)]

mod gateway;
mod manager;
mod session;

pub use gateway::AuthGateway;
pub use manager::SessionManager;
pub use session::{AuthState, LoginResult, SessionEvent, SessionSnapshot};
