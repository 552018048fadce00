//! The gateway seam between the session layer and the network.
//!
//! The session manager doesn't speak HTTP — it speaks [`AuthGateway`].
//! Production wires in the reqwest-backed client from
//! `mediport-gateway`; tests wire in a scripted mock. Same state
//! machine, no network in unit tests.

use mediport_types::{
    ApiError, AuthPayload, LoginResponse, MfaVerification,
    MfaVerifyResponse, Registration, UserProfile, UserRole,
};

/// The four backend calls the session state machine depends on.
///
/// # Trait bounds
///
/// - `Send + Sync` → the gateway is called from whatever async task the
///   host runs session operations on.
/// - `'static` → it owns its connections and configuration; it lives as
///   long as the session manager that holds it.
///
/// # Contract
///
/// Implementations attach the persisted credential to every request and
/// run a global 401 interceptor (clear persisted credentials, signal the
/// application) *before* surfacing [`ApiError::Unauthorized`]. They
/// never retry: one call, one request, one result.
pub trait AuthGateway: Send + Sync + 'static {
    /// Exchanges primary credentials for a session — or for a
    /// second-factor challenge, if the account has MFA enabled.
    fn login(
        &self,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> impl std::future::Future<Output = Result<LoginResponse, ApiError>> + Send;

    /// Completes a pending second factor.
    fn verify_mfa(
        &self,
        attempt: &MfaVerification,
    ) -> impl std::future::Future<Output = Result<MfaVerifyResponse, ApiError>> + Send;

    /// Creates an account. Registration never produces an MFA
    /// challenge — a successful response is always a full session.
    fn register(
        &self,
        form: &Registration,
        role: UserRole,
    ) -> impl std::future::Future<Output = Result<AuthPayload, ApiError>> + Send;

    /// Fetches the signed-in account's canonical profile record.
    fn current_user(
        &self,
    ) -> impl std::future::Future<Output = Result<UserProfile, ApiError>> + Send;
}
