//! The reqwest-backed gateway client.
//!
//! One `HttpGateway` per application, built once and handed to the
//! session manager. Every endpoint method funnels through the same
//! `send` path, which is where the auth header and the 401 interceptor
//! live.

use std::sync::Arc;
use std::time::Duration;

use mediport_session::AuthGateway;
use mediport_store::{Storage, TOKEN_KEY, USER_KEY};
use mediport_types::{
    ApiError, AuthLogEntry, AuthPayload, LoginResponse, MfaChallenge,
    MfaSetup, MfaVerification, MfaVerifyResponse, Registration,
    UserProfile, UserRole,
};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// The header the backend reads the bearer credential from.
const AUTH_HEADER: &str = "x-auth-token";

/// Default per-request timeout. The session layer enforces none of its
/// own — this is the only clock on a request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Callback invoked (after storage is cleared) whenever any response
/// comes back 401. Registered once at construction; the application
/// root typically wires it to a session-event channel.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`HttpGateway`].
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use mediport_gateway::HttpGateway;
/// use mediport_store::MemoryStore;
///
/// let storage = Arc::new(MemoryStore::new());
/// let gateway = HttpGateway::builder("https://api.portal.example", storage)
///     .on_unauthorized(|| eprintln!("session expired"))
///     .build()
///     .expect("client should build");
/// ```
pub struct HttpGatewayBuilder {
    base_url: String,
    timeout: Duration,
    storage: Arc<dyn Storage>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl HttpGatewayBuilder {
    /// Sets the per-request timeout (default 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registers the global 401 callback.
    pub fn on_unauthorized(
        mut self,
        hook: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_unauthorized = Some(Arc::new(hook));
        self
    }

    /// Builds the gateway.
    ///
    /// # Errors
    /// Returns [`ApiError::Network`] if the underlying HTTP client
    /// cannot be constructed (e.g. no TLS backend available).
    pub fn build(self) -> Result<HttpGateway, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpGateway {
            http,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            storage: self.storage,
            on_unauthorized: self.on_unauthorized,
        })
    }
}

// ---------------------------------------------------------------------------
// HttpGateway
// ---------------------------------------------------------------------------

/// The production gateway: a thin, retry-free REST client.
///
/// Shares the [`Storage`] instance with the session manager — that's how
/// the auth header always reflects the credential the session persisted,
/// with no copy to fall out of sync.
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<dyn Storage>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl HttpGateway {
    /// Creates a builder. `base_url` is the API root (no trailing
    /// slash needed); `storage` must be the same store the session
    /// manager uses.
    pub fn builder(
        base_url: impl Into<String>,
        storage: Arc<dyn Storage>,
    ) -> HttpGatewayBuilder {
        HttpGatewayBuilder {
            base_url: base_url.into(),
            timeout: REQUEST_TIMEOUT,
            storage,
            on_unauthorized: None,
        }
    }

    // -- Gateway-only surfaces (settings page) -----------------------------

    /// Begins MFA enrollment for the signed-in account.
    ///
    /// Returns the shared secret and a QR code for the authenticator
    /// app. Enrollment completes when the user proves the app works by
    /// submitting a first code through the verify endpoint.
    pub async fn enable_mfa(&self) -> Result<MfaSetup, ApiError> {
        let response = self
            .send(self.http.post(self.endpoint("/auth/enhanced/mfa/enable")))
            .await?;
        read_json(response).await
    }

    /// Turns MFA off for the signed-in account. `code` is a current
    /// authenticator code, proving possession of the second factor.
    pub async fn disable_mfa(&self, code: &str) -> Result<(), ApiError> {
        self.send(
            self.http
                .post(self.endpoint("/auth/enhanced/mfa/disable"))
                .json(&serde_json::json!({ "token": code })),
        )
        .await?;
        Ok(())
    }

    /// Fetches the account's recent authentication events.
    pub async fn auth_logs(&self) -> Result<Vec<AuthLogEntry>, ApiError> {
        let response = self
            .send(self.http.get(self.endpoint("/auth/enhanced/logs")))
            .await?;
        read_json(response).await
    }

    // -- Request plumbing --------------------------------------------------

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn stored_token(&self) -> Option<String> {
        match self.storage.get_item(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored credential");
                None
            }
        }
    }

    /// The single choke point every request goes through: attaches the
    /// auth header, sends, and routes the response past the 401
    /// interceptor and the error translator.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let request = match self.stored_token() {
            Some(token) => request.header(AUTH_HEADER, token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "transport failure");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.intercept_unauthorized();
            return Err(ApiError::Unauthorized);
        }
        if status.is_success() {
            return Ok(response);
        }

        // Prefer the server's own words; fall back to the status line.
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                format!("request failed with status {}", status.as_u16())
            });
        tracing::debug!(status = status.as_u16(), %message, "api error");
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// The global 401 interceptor: clear both persisted keys, then let
    /// the application know. Storage first — even if nobody registered
    /// a hook, a dead credential must not survive to the next bootstrap.
    fn intercept_unauthorized(&self) {
        tracing::info!("unauthorized response, clearing persisted session");
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                tracing::warn!(key, error = %e, "storage clear failed");
            }
        }
        if let Some(hook) = &self.on_unauthorized {
            hook();
        }
    }
}

impl AuthGateway for HttpGateway {
    async fn login(
        &self,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<LoginResponse, ApiError> {
        let response = self
            .send(
                self.http
                    .post(self.endpoint(&format!("/auth/enhanced/login/{role}")))
                    .json(&serde_json::json!({
                        "email": email,
                        "password": password,
                    })),
            )
            .await?;
        let raw: RawAuthBody = read_json(response).await?;
        raw.into_login_response(role)
    }

    async fn verify_mfa(
        &self,
        attempt: &MfaVerification,
    ) -> Result<MfaVerifyResponse, ApiError> {
        let response = self
            .send(
                self.http
                    .post(self.endpoint("/auth/enhanced/mfa/verify"))
                    .json(attempt),
            )
            .await?;
        read_json(response).await
    }

    async fn register(
        &self,
        form: &Registration,
        role: UserRole,
    ) -> Result<AuthPayload, ApiError> {
        let response = self
            .send(
                self.http
                    .post(
                        self.endpoint(&format!("/auth/basic/register/{role}")),
                    )
                    .json(form),
            )
            .await?;
        // Registration has no MFA branch: only the authenticated shape
        // is accepted here.
        let raw: RawAuthBody = read_json(response).await?;
        raw.into_payload(role)
    }

    async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let response = self
            .send(self.http.get(self.endpoint("/auth/basic/user")))
            .await?;
        read_json(response).await
    }
}

// ---------------------------------------------------------------------------
// Wire shapes private to the client
// ---------------------------------------------------------------------------

/// The raw body of login and register responses.
///
/// The backend keys the account record by role (`"doctor"` / `"client"`)
/// and signals an outstanding second factor with `mfaRequired`. This
/// struct accepts the union of both shapes; conversion picks the branch
/// and reports anything missing as a decode error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuthBody {
    #[serde(default)]
    mfa_required: bool,
    temp_token: Option<String>,
    user_id: Option<i64>,
    user_type: Option<UserRole>,
    token: Option<String>,
    doctor: Option<UserProfile>,
    client: Option<UserProfile>,
}

impl RawAuthBody {
    fn into_login_response(
        self,
        role: UserRole,
    ) -> Result<LoginResponse, ApiError> {
        if self.mfa_required {
            let challenge = MfaChallenge {
                temp_token: self.temp_token.ok_or_else(|| {
                    ApiError::Decode("MFA response missing tempToken".into())
                })?,
                user_id: self.user_id.ok_or_else(|| {
                    ApiError::Decode("MFA response missing userId".into())
                })?,
                user_type: self.user_type.ok_or_else(|| {
                    ApiError::Decode("MFA response missing userType".into())
                })?,
            };
            return Ok(LoginResponse::MfaRequired(challenge));
        }
        Ok(LoginResponse::Authenticated(self.into_payload(role)?))
    }

    fn into_payload(self, role: UserRole) -> Result<AuthPayload, ApiError> {
        let token = self.token.ok_or_else(|| {
            ApiError::Decode("response missing token".into())
        })?;
        let profile = match role {
            UserRole::Doctor => self.doctor,
            UserRole::Client => self.client,
        }
        .ok_or_else(|| {
            ApiError::Decode(format!("response missing {role} record"))
        })?;
        Ok(AuthPayload { token, profile })
    }
}

/// The backend's error envelope, as far as the client cares.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    response
        .json()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
