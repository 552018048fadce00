//! HTTP gateway for Mediport.
//!
//! Implements the session layer's [`AuthGateway`] contract over
//! `reqwest`, plus the gateway-only surfaces that ride the same client
//! (MFA enrollment, authentication logs).
//!
//! Two cross-cutting behaviors live here — implemented once, in the
//! request path, never per-call:
//!
//! - the persisted credential is attached to every outgoing request as
//!   the `x-auth-token` header;
//! - every HTTP 401 clears the persisted credentials and fires the
//!   `on_unauthorized` callback registered at construction, so the
//!   application can navigate to its login entry point no matter which
//!   call tripped the expiry.
//!
//! [`AuthGateway`]: mediport_session::AuthGateway

mod http;

pub use http::{HttpGateway, HttpGatewayBuilder, UnauthorizedHook};
