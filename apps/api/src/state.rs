use std::sync::Arc;

use tokio::sync::OwnedMutexGuard;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::session::Session;
use crate::store::{KvStore, SessionLocks, SessionStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable blob store. Default: RedisStore, MemoryStore when REDIS_URL is unset.
    pub store: Arc<dyn KvStore>,
    pub catalog: Arc<Catalog>,
    pub config: Config,
    /// Serializes read-modify-write updates within one session.
    pub session_locks: Arc<SessionLocks>,
}

impl AppState {
    pub fn new(store: Arc<dyn KvStore>, catalog: Arc<Catalog>, config: Config) -> Self {
        Self {
            store,
            catalog,
            config,
            session_locks: Arc::new(SessionLocks::new()),
        }
    }

    /// The session's view of the store; `None` for sessions without an id.
    pub fn session_store(&self, session: &Session) -> Option<SessionStore> {
        session.id.map(|id| {
            SessionStore::new(
                self.store.clone(),
                &self.config.store_key_prefix,
                &id.to_string(),
            )
        })
    }

    /// Held across a load, merge and save of the session's blobs.
    pub async fn lock_session(&self, store: &SessionStore) -> OwnedMutexGuard<()> {
        self.session_locks.acquire(store.namespace()).await
    }
}
