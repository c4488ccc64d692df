//! Client session state
//!
//! A [`Session`] is the opaque bearer token issued by the backend, plus a
//! little bookkeeping. [`SessionManager`] ties the stored session to the
//! [`ApiClient`]'s outgoing `Authorization` header and broadcasts
//! [`SessionEvent`]s when the user logs in or out.
//!
//! There is no refresh, rotation or expiry handling: a session lasts until
//! logout or until the backend starts rejecting it.

pub mod store;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::api::ApiClient;
use crate::error::Result;

pub use store::{
    store_for, FileSessionStore, KeyringSessionStore, MemorySessionStore, SessionStore,
};

/// Capacity of the session event channel
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// A stored bearer credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque token issued by the backend
    pub token: String,

    /// Email of the logged-in user, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// When the token was acquired
    pub acquired_at: DateTime<Utc>,
}

impl Session {
    /// New session acquired now.
    pub fn new(token: impl Into<String>, email: Option<String>) -> Self {
        Self {
            token: token.into(),
            email,
            acquired_at: Utc::now(),
        }
    }
}

/// Global notifications about the session lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A session was established
    LoggedIn {
        /// Email of the user, when known
        email: Option<String>,
    },
    /// The session was cleared
    LoggedOut,
}

/// Owns the active session and keeps the API client in sync with it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use linkrec::api::ApiClient;
/// use linkrec::session::{MemorySessionStore, SessionManager};
///
/// # async fn example() -> linkrec::error::Result<()> {
/// let client = ApiClient::new("http://localhost:8000", Duration::from_secs(5))?;
/// let manager = SessionManager::new(client, Arc::new(MemorySessionStore::default()));
/// assert!(manager.restore().await?.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionManager {
    client: ApiClient,
    store: Arc<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Create a manager over `client` and `store`.
    pub fn new(client: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            client,
            store,
            events,
        }
    }

    /// The API client whose header this manager controls
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Load a previously stored session and attach its token.
    pub async fn restore(&self) -> Result<Option<Session>> {
        let session = self.store.load().await?;
        if let Some(session) = &session {
            tracing::debug!(email = ?session.email, "Restored stored session");
            self.client.set_token(Some(session.token.clone())).await;
        }
        Ok(session)
    }

    /// Persist a freshly issued token and attach it to outgoing requests.
    pub async fn establish(&self, token: &str, email: Option<String>) -> Result<Session> {
        let session = Session::new(token, email);
        self.store.save(&session).await?;
        self.client.set_token(Some(session.token.clone())).await;
        tracing::info!(email = ?session.email, "Session established");
        Ok(session)
    }

    /// Broadcast `event` to all subscribers.
    ///
    /// Having no subscribers is not an error.
    pub fn notify(&self, event: SessionEvent) {
        let receivers = self.events.send(event).unwrap_or(0);
        tracing::trace!(receivers, "Session event broadcast");
    }

    /// Forget the session everywhere and broadcast [`SessionEvent::LoggedOut`].
    pub async fn clear(&self) -> Result<()> {
        self.store.clear().await?;
        self.client.set_token(None).await;
        self.notify(SessionEvent::LoggedOut);
        tracing::info!("Session cleared");
        Ok(())
    }
}
