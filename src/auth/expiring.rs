//! Session expiration policy

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::fmt;

use super::request::RequestAccessor;
use super::session::{destroy_resolvable, BasicSessionAuth, SessionEntry, SessionStore};
use super::strategy::AuthStrategy;
use crate::error::{Error, Result};

/// How long a session stays valid after it is created. Zero means forever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct SessionDuration(u64);

impl SessionDuration {
    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn never_expires(&self) -> bool {
        self.0 == 0
    }

    /// Parse a duration in whole seconds. Negative values mean "never
    /// expire" and map to zero.
    pub fn parse(value: &str) -> Result<Self> {
        let secs: i64 = value
            .trim()
            .parse()
            .map_err(|_| Error::InvalidDuration(value.to_string()))?;
        Ok(Self(secs.max(0) as u64))
    }

    /// Instant after which a session created at `created_at` is no longer
    /// valid, or `None` when sessions never expire
    pub fn deadline(&self, created_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.never_expires() {
            return None;
        }
        let secs = i64::try_from(self.0).unwrap_or(i64::MAX);
        Some(
            Duration::try_seconds(secs)
                .and_then(|ttl| created_at.checked_add_signed(ttl))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    /// Whether a session created at `created_at` has expired by `now`.
    /// The deadline itself is still inside the window.
    pub fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.deadline(created_at)
            .is_some_and(|deadline| deadline < now)
    }
}

impl fmt::Display for SessionDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.never_expires() {
            write!(f, "never")
        } else {
            write!(f, "{}s", self.0)
        }
    }
}

/// In-memory sessions with a time-to-live
#[derive(Debug, Clone)]
pub struct ExpiringSessionAuth {
    inner: BasicSessionAuth,
    duration: SessionDuration,
}

impl ExpiringSessionAuth {
    pub fn new(inner: BasicSessionAuth, duration: SessionDuration) -> Self {
        Self { inner, duration }
    }

    pub fn duration(&self) -> SessionDuration {
        self.duration
    }

    pub fn store(&self) -> &SessionStore {
        self.inner.store()
    }

    /// Resolve `session_id` as of `now`
    pub async fn user_id_at(&self, session_id: &str, now: DateTime<Utc>) -> Option<String> {
        let entry = self.store().get(session_id).await?;
        if self.duration.never_expires() {
            return Some(entry.user_id);
        }
        let created_at = entry.created_at?;
        if self.duration.is_expired(created_at, now) {
            tracing::debug!("Session expired for user {}", entry.user_id);
            return None;
        }
        Some(entry.user_id)
    }
}

#[async_trait]
impl AuthStrategy for ExpiringSessionAuth {
    fn cookie_name(&self) -> &str {
        self.inner.cookie_name()
    }

    async fn create_session(&self, user_id: Option<&str>) -> Option<String> {
        let user_id = user_id?;
        let session_id = self.inner.create_session(Some(user_id)).await?;
        self.store()
            .insert(
                session_id.clone(),
                SessionEntry {
                    user_id: user_id.to_string(),
                    created_at: Some(Utc::now()),
                },
            )
            .await;
        Some(session_id)
    }

    async fn user_id_for_session_id(&self, session_id: Option<&str>) -> Option<String> {
        self.user_id_at(session_id?, Utc::now()).await
    }

    async fn destroy_session(&self, request: Option<&dyn RequestAccessor>) -> bool {
        destroy_resolvable(self, request).await
    }
}

impl AsRef<SessionStore> for ExpiringSessionAuth {
    fn as_ref(&self) -> &SessionStore {
        self.store()
    }
}
