//! `Portal` builder and facade.
//!
//! This is the application root's entry point. It ties the layers
//! together: storage → gateway → session, plus the event channel that
//! carries out-of-band signals (forced logout on 401) back to the UI.

use std::sync::Arc;
use std::time::Duration;

use mediport_gateway::HttpGateway;
use mediport_session::{SessionEvent, SessionManager};
use mediport_store::{MemoryStore, Storage};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::MediportError;

/// Builder for configuring and wiring a [`Portal`].
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use mediport::{FileStore, Portal};
///
/// # fn run() -> Result<(), mediport::MediportError> {
/// let store = Arc::new(FileStore::open("session.json")?);
/// let portal = Portal::builder("https://api.portal.example")
///     .storage(store)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct PortalBuilder {
    base_url: String,
    timeout: Option<Duration>,
    storage: Option<Arc<dyn Storage>>,
}

impl PortalBuilder {
    /// Creates a builder pointing at the given API root.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            storage: None,
        }
    }

    /// Sets the gateway's per-request timeout (default 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the persistence backend. Defaults to an in-memory store,
    /// which means sessions do not survive a restart — pass a
    /// [`FileStore`](mediport_store::FileStore) for the browser-like
    /// "stay signed in" behavior.
    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Wires everything up.
    ///
    /// The gateway's 401 interceptor is bound here: storage clearing
    /// happens inside the gateway, and the hook forwards exactly one
    /// [`SessionEvent::NavigateToLogin`] per intercepted response onto
    /// the portal's event channel.
    ///
    /// # Errors
    /// Returns [`MediportError::Api`] if the HTTP client cannot be
    /// constructed.
    pub fn build(self) -> Result<Portal, MediportError> {
        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let hook_tx = events_tx.clone();
        let mut gateway_builder =
            HttpGateway::builder(self.base_url, Arc::clone(&storage))
                .on_unauthorized(move || {
                    let _ = hook_tx.send(SessionEvent::NavigateToLogin);
                });
        if let Some(timeout) = self.timeout {
            gateway_builder = gateway_builder.timeout(timeout);
        }
        let gateway = gateway_builder.build()?;

        let session = SessionManager::new(gateway, storage, events_tx);
        tracing::debug!("portal wired: storage, gateway, session, events");

        Ok(Portal {
            session,
            events: Some(events_rx),
        })
    }
}

/// One running client's session core.
///
/// Owns the [`SessionManager`] (and through it the gateway) plus the
/// receiving half of the session event channel. The host keeps exactly
/// one of these for the lifetime of the process; there is no teardown
/// beyond dropping it.
pub struct Portal {
    session: SessionManager<HttpGateway>,
    events: Option<UnboundedReceiver<SessionEvent>>,
}

impl Portal {
    /// Creates a new builder.
    pub fn builder(base_url: impl Into<String>) -> PortalBuilder {
        PortalBuilder::new(base_url)
    }

    /// Read access to the session.
    pub fn session(&self) -> &SessionManager<HttpGateway> {
        &self.session
    }

    /// The session's operations (`initialize`, `login`, `logout`, …).
    pub fn session_mut(&mut self) -> &mut SessionManager<HttpGateway> {
        &mut self.session
    }

    /// The gateway, for surfaces that bypass session state (MFA
    /// enrollment, auth logs).
    pub fn gateway(&self) -> &HttpGateway {
        self.session.gateway()
    }

    /// Takes the event receiver. The first caller gets it; subsequent
    /// calls return `None`. Hand it to whatever task drives navigation.
    pub fn take_events(&mut self) -> Option<UnboundedReceiver<SessionEvent>> {
        self.events.take()
    }
}
