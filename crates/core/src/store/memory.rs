//! In-memory option and transient store.
//!
//! Uses HashMaps behind tokio RwLocks. Suitable for a single process;
//! nothing survives a restart.

use super::clock::{Clock, SystemClock, expires_after};
use super::{OptionStore, TransientStore};
use crate::Error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cached value with its expiry instant.
#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Process-local store implementing both storage contracts.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    options: Arc<RwLock<HashMap<String, Value>>>,
    transients: Arc<RwLock<HashMap<String, Entry>>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            options: Arc::new(RwLock::new(HashMap::new())),
            transients: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Drop expired transients. Returns how many were removed.
    pub async fn cleanup_expired(&self) -> u64 {
        let now = self.clock.now();
        let mut transients = self.transients.write().await;
        let before = transients.len();
        transients.retain(|_, entry| !entry.is_expired(now));
        (before - transients.len()) as u64
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OptionStore for MemoryStore {
    async fn get_option(&self, key: &str) -> Result<Option<Value>, Error> {
        Ok(self.options.read().await.get(key).cloned())
    }

    async fn set_option(&self, key: &str, value: &Value) -> Result<(), Error> {
        self.options.write().await.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn delete_option(&self, key: &str) -> Result<bool, Error> {
        Ok(self.options.write().await.remove(key).is_some())
    }
}

#[async_trait]
impl TransientStore for MemoryStore {
    async fn get_transient(&self, key: &str) -> Result<Option<Value>, Error> {
        let now = self.clock.now();
        let transients = self.transients.read().await;
        Ok(transients
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set_transient(&self, key: &str, value: &Value, ttl_seconds: i64) -> Result<(), Error> {
        let entry = Entry { value: value.clone(), expires_at: expires_after(self.clock.now(), ttl_seconds)? };
        self.transients.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete_transient(&self, key: &str) -> Result<bool, Error> {
        Ok(self.transients.write().await.remove(key).is_some())
    }
}
