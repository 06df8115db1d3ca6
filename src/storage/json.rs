//! JSON file backed collection

use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::{Attributes, Collection, Record};
use crate::error::{Error, Result};

/// Records of one type kept in memory and mirrored to a JSON file.
///
/// The whole file is rewritten on every mutation. Mutations hold the write
/// lock across the file write so concurrent saves cannot interleave.
#[derive(Debug)]
pub struct JsonStore<T> {
    path: PathBuf,
    records: RwLock<Vec<T>>,
}

impl<T> JsonStore<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    /// Open the store at `path`, loading any records already there
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = read_file(&path).await?;
        tracing::debug!("Loaded {} records from {}", records.len(), path.display());
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

async fn read_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(Error::Storage(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

fn matches<T: Serialize>(record: &T, attributes: Attributes<'_>) -> Result<bool> {
    if attributes.is_empty() {
        return Ok(true);
    }
    let value = serde_json::to_value(record)?;
    Ok(attributes.iter().all(|(field, expected)| {
        value.get(*field).and_then(|v| v.as_str()) == Some(*expected)
    }))
}

#[async_trait]
impl<T> Collection<T> for JsonStore<T>
where
    T: Record + Serialize + DeserializeOwned,
{
    async fn load_all(&self) -> Result<Vec<T>> {
        let fresh: Vec<T> = read_file(&self.path).await?;
        let mut records = self.records.write().await;
        *records = fresh;
        Ok(records.clone())
    }

    async fn all(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    async fn get(&self, id: &str) -> Option<T> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    async fn search(&self, attributes: Attributes<'_>) -> Result<Vec<T>> {
        let records = self.records.read().await;
        let mut found = Vec::new();
        for record in records.iter() {
            if matches(record, attributes)? {
                found.push(record.clone());
            }
        }
        Ok(found)
    }

    async fn save(&self, mut record: T) -> Result<T> {
        record.touch(Utc::now());
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.persist(&records).await?;
        Ok(record)
    }

    async fn remove(&self, id: &str) -> Result<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.persist(&records).await?;
        Ok(true)
    }

    async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}
