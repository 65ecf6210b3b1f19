//! Key/value profile store behind a pluggable trait.
//!
//! Backends: `RedisStore` (production) and `MemoryStore` (tests, local runs
//! without `REDIS_URL`). `AppState` holds an `Arc<dyn KvStore>`.
//!
//! Handlers never touch raw keys: `SessionStore` namespaces every key by
//! session and decodes blobs into typed records. A blob that fails to decode
//! reads as absent.

pub mod locks;
pub mod memory;
pub mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::assessment::AssessmentRecord;
use crate::models::profile::{Profile, Requirements};

pub use self::locks::SessionLocks;
pub use self::memory::MemoryStore;
pub use self::redis_store::RedisStore;

pub const PROFILE_KEY: &str = "userProfile";
pub const REQUIREMENTS_KEY: &str = "userRequirements";

pub fn assessment_key(target_id: u32) -> String {
    format!("assessment_{target_id}")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The narrow interface the service needs from a durable key/value store.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Typed, session-scoped view over a `KvStore`.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<dyn KvStore>,
    namespace: String,
}

impl SessionStore {
    pub fn new(inner: Arc<dyn KvStore>, prefix: &str, session_id: &str) -> Self {
        Self {
            inner,
            namespace: format!("{prefix}:{session_id}"),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn physical_key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    /// Presence only: contents are not decoded. Empty strings count as absent.
    pub async fn is_present(&self, key: &str) -> Result<bool, StoreError> {
        let value = self.inner.get(&self.physical_key(key)).await?;
        Ok(value.is_some_and(|v| !v.trim().is_empty()))
    }

    /// Loads and decodes a blob. Malformed JSON is logged and read as `None`.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let physical = self.physical_key(key);
        let Some(raw) = self.inner.get(&physical).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Ignoring malformed blob at {physical}: {e}");
                Ok(None)
            }
        }
    }

    pub async fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let physical = self.physical_key(key);
        let encoded = serde_json::to_string(value)?;
        self.inner.set(&physical, &encoded).await?;
        debug!("Stored {} bytes at {physical}", encoded.len());
        Ok(())
    }

    pub async fn profile(&self) -> Result<Option<Profile>, StoreError> {
        self.load(PROFILE_KEY).await
    }

    pub async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.save(PROFILE_KEY, profile).await
    }

    pub async fn requirements(&self) -> Result<Option<Requirements>, StoreError> {
        self.load(REQUIREMENTS_KEY).await
    }

    pub async fn save_requirements(&self, requirements: &Requirements) -> Result<(), StoreError> {
        self.save(REQUIREMENTS_KEY, requirements).await
    }

    pub async fn assessment(&self, target_id: u32) -> Result<Option<AssessmentRecord>, StoreError> {
        self.load(&assessment_key(target_id)).await
    }

    pub async fn save_assessment(
        &self,
        target_id: u32,
        record: &AssessmentRecord,
    ) -> Result<(), StoreError> {
        self.save(&assessment_key(target_id), record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessment::CompletionStatus;

    fn session(store: &Arc<MemoryStore>, id: &str) -> SessionStore {
        SessionStore::new(store.clone(), "test", id)
    }

    #[tokio::test]
    async fn test_keys_are_namespaced_per_session() {
        let store = Arc::new(MemoryStore::new());
        let alice = session(&store, "alice");
        let bob = session(&store, "bob");

        alice.save_profile(&Profile::default()).await.unwrap();

        assert!(alice.is_present(PROFILE_KEY).await.unwrap());
        assert!(!bob.is_present(PROFILE_KEY).await.unwrap());
        assert!(store.get("test:alice:userProfile").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_malformed_blob_reads_as_absent() {
        let store = Arc::new(MemoryStore::new());
        store.set("test:s1:assessment_3", "{not json").await.unwrap();

        let loaded = session(&store, "s1").assessment(3).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_presence_ignores_contents_but_not_emptiness() {
        let store = Arc::new(MemoryStore::new());
        store.set("test:s1:userProfile", "garbage").await.unwrap();
        store.set("test:s1:userRequirements", "").await.unwrap();

        let s = session(&store, "s1");
        assert!(s.is_present(PROFILE_KEY).await.unwrap());
        assert!(!s.is_present(REQUIREMENTS_KEY).await.unwrap());
    }

    #[tokio::test]
    async fn test_assessment_round_trips_through_store() {
        let store = Arc::new(MemoryStore::new());
        let s = session(&store, "s1");
        let mut record = AssessmentRecord::default();
        record.sop.status = CompletionStatus::Completed;

        s.save_assessment(7, &record).await.unwrap();

        assert_eq!(s.assessment(7).await.unwrap(), Some(record));
        assert!(s.assessment(8).await.unwrap().is_none());
    }
}
