//! Sessions persisted to a durable collection

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::expiring::{ExpiringSessionAuth, SessionDuration};
use super::models::UserSession;
use super::request::RequestAccessor;
use super::session::SessionStore;
use super::strategy::AuthStrategy;
use crate::error::Result;
use crate::storage::Collection;

/// Sessions that survive restarts.
///
/// Creation still goes through the expiring strategy, so the in-memory map
/// mirrors every session, but lookups and destruction consult the
/// persisted collection only. Expiry is recomputed from the stored
/// creation time on every lookup.
pub struct DurableSessionAuth {
    inner: ExpiringSessionAuth,
    sessions: Arc<dyn Collection<UserSession>>,
}

impl DurableSessionAuth {
    pub fn new(inner: ExpiringSessionAuth, sessions: Arc<dyn Collection<UserSession>>) -> Self {
        Self { inner, sessions }
    }

    pub fn duration(&self) -> SessionDuration {
        self.inner.duration()
    }

    pub fn store(&self) -> &SessionStore {
        self.inner.store()
    }

    /// Persisted record for `session_id`, reloading the collection first
    pub async fn find_record(&self, session_id: &str) -> Result<Option<UserSession>> {
        self.sessions.load_all().await?;
        let found = self.sessions.search(&[("session_id", session_id)]).await?;
        Ok(found.into_iter().next())
    }

    /// Resolve `session_id` against the persisted records as of `now`
    pub async fn try_user_id_at(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<String>> {
        let Some(record) = self.find_record(session_id).await? else {
            return Ok(None);
        };
        if self.duration().is_expired(record.created_at, now) {
            tracing::debug!("Durable session expired for user {}", record.user_id);
            return Ok(None);
        }
        Ok(Some(record.user_id))
    }

    /// Remove the persisted session `session_id`, surfacing storage errors
    pub async fn try_destroy_session(&self, session_id: &str) -> Result<bool> {
        let found = self.sessions.search(&[("session_id", session_id)]).await?;
        let Some(record) = found.into_iter().next() else {
            return Ok(false);
        };
        let removed = self.sessions.remove(&record.id).await?;
        self.store().remove(session_id).await;
        if removed {
            tracing::info!("Closed session for user {}", record.user_id);
        }
        Ok(removed)
    }

    /// Delete every persisted session whose window has closed
    pub async fn purge_expired(&self) -> Result<usize> {
        if self.duration().never_expires() {
            return Ok(0);
        }
        let now = Utc::now();
        let mut purged = 0;
        for record in self.sessions.load_all().await? {
            if self.duration().is_expired(record.created_at, now)
                && self.sessions.remove(&record.id).await?
            {
                self.store().remove(&record.session_id).await;
                purged += 1;
            }
        }
        if purged > 0 {
            tracing::info!("Purged {} expired sessions", purged);
        }
        Ok(purged)
    }
}

#[async_trait]
impl AuthStrategy for DurableSessionAuth {
    fn cookie_name(&self) -> &str {
        self.inner.cookie_name()
    }

    async fn create_session(&self, user_id: Option<&str>) -> Option<String> {
        let user_id = user_id?;
        let session_id = self.inner.create_session(Some(user_id)).await?;
        match self.sessions.save(UserSession::new(user_id, &session_id)).await {
            Ok(_) => Some(session_id),
            Err(e) => {
                tracing::warn!("Failed to persist session for user {}: {}", user_id, e);
                None
            }
        }
    }

    async fn user_id_for_session_id(&self, session_id: Option<&str>) -> Option<String> {
        self.try_user_id_at(session_id?, Utc::now())
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Session lookup failed: {}", e);
                None
            })
    }

    async fn destroy_session(&self, request: Option<&dyn RequestAccessor>) -> bool {
        let Some(token) = self.extract_token(request) else {
            return false;
        };
        self.try_destroy_session(&token).await.unwrap_or_else(|e| {
            tracing::warn!("Failed to destroy session: {}", e);
            false
        })
    }
}
