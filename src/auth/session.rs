//! In-memory session storage and the basic session strategy

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::request::RequestAccessor;
use super::strategy::AuthStrategy;

/// What the in-memory map holds for a session id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    /// User owning the session
    pub user_id: String,
    /// Set by strategies that enforce expiry
    pub created_at: Option<DateTime<Utc>>,
}

/// Shared in-memory map from session id to [`SessionEntry`].
///
/// Clones share the same map, so one store built at startup and handed to
/// every strategy makes sessions visible to every request handler.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl SessionStore {
    /// Create an empty session store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `session_id`
    pub async fn insert(&self, session_id: String, entry: SessionEntry) {
        self.sessions.write().await.insert(session_id, entry);
    }

    /// Entry for `session_id`
    pub async fn get(&self, session_id: &str) -> Option<SessionEntry> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Remove the entry for `session_id`, returning whether one existed
    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Get session count
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Cookie sessions held in memory, never expiring
#[derive(Debug, Clone)]
pub struct BasicSessionAuth {
    store: SessionStore,
    cookie_name: String,
}

impl BasicSessionAuth {
    /// Create a strategy over a shared store
    pub fn new(store: SessionStore, cookie_name: impl Into<String>) -> Self {
        Self {
            store,
            cookie_name: cookie_name.into(),
        }
    }

    /// The backing store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Allocate a fresh session id for `user_id` and record it without a
    /// creation time
    pub(crate) async fn issue(&self, user_id: &str) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.store
            .insert(
                session_id.clone(),
                SessionEntry {
                    user_id: user_id.to_string(),
                    created_at: None,
                },
            )
            .await;
        tracing::debug!("Opened session for user {}", user_id);
        session_id
    }
}

#[async_trait]
impl AuthStrategy for BasicSessionAuth {
    fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    async fn create_session(&self, user_id: Option<&str>) -> Option<String> {
        Some(self.issue(user_id?).await)
    }

    async fn user_id_for_session_id(&self, session_id: Option<&str>) -> Option<String> {
        self.store.get(session_id?).await.map(|entry| entry.user_id)
    }

    async fn destroy_session(&self, request: Option<&dyn RequestAccessor>) -> bool {
        destroy_resolvable(self, request).await
    }
}

/// Remove the request's session from the in-memory store, but only when
/// `strategy` can still resolve it to a user
pub(crate) async fn destroy_resolvable<S>(
    strategy: &S,
    request: Option<&dyn RequestAccessor>,
) -> bool
where
    S: AuthStrategy + AsRef<SessionStore> + ?Sized,
{
    let Some(token) = strategy.extract_token(request) else {
        return false;
    };
    if strategy.user_id_for_session_id(Some(&token)).await.is_none() {
        return false;
    }
    strategy.as_ref().remove(&token).await
}

impl AsRef<SessionStore> for BasicSessionAuth {
    fn as_ref(&self) -> &SessionStore {
        &self.store
    }
}
