//! Persistence for users and durable sessions

mod json;

pub use json::JsonStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// A persisted record with a stable identifier
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;

    /// Stamp the record as modified at `now`
    fn touch(&mut self, now: DateTime<Utc>);
}

/// Attribute filter used by [`Collection::search`]: every `(field, value)`
/// pair must equal the record's string field of that name
pub type Attributes<'a> = &'a [(&'a str, &'a str)];

/// A collection of records that can be reloaded, searched and mutated
#[async_trait]
pub trait Collection<T: Record>: Send + Sync {
    /// Reload from the backing store and return every record
    async fn load_all(&self) -> Result<Vec<T>>;

    /// Every record currently held, without reloading
    async fn all(&self) -> Vec<T>;

    /// Record with the given id
    async fn get(&self, id: &str) -> Option<T>;

    /// Records matching all `attributes`; an empty filter matches everything
    async fn search(&self, attributes: Attributes<'_>) -> Result<Vec<T>>;

    /// Insert or replace `record`, stamping it as updated
    async fn save(&self, record: T) -> Result<T>;

    /// Remove the record with the given id, returning whether it existed
    async fn remove(&self, id: &str) -> Result<bool>;

    async fn count(&self) -> usize;
}
