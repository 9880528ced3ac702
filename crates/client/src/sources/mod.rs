//! Remote script-source list with a TTL cache.
//!
//! ### Cache slot
//! One transient entry under [`SCRIPT_SOURCES_KEY`] holds the last fetched
//! list. Reads within its TTL return it untouched, empty lists included.
//!
//! ### Miss or expiry
//! Exactly one GET to the endpoint:
//! - `200 OK` with a JSON array: its string entries are cached for the
//!   success TTL (300s)
//! - transport error, other status, invalid JSON, or non-array JSON:
//!   an empty list is cached for the failure TTL (60s)
//!
//! Callers never see an error; every failure resolves to an empty list.
//! Concurrent misses may each fetch; the last write wins.

use std::sync::Arc;

use adunblock_core::Error;
use adunblock_core::config::AppConfig;
use adunblock_core::settings::SCRIPT_SOURCES_KEY;
use adunblock_core::store::TransientStore;
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use crate::fetch::{FetchClient, parse_http_url};

/// Source of the script-source list.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetch and decode the current list.
    async fn fetch_sources(&self) -> Result<Vec<String>, Error>;
}

/// Decode an endpoint payload: any JSON array is a valid list.
///
/// Non-string entries are dropped; invalid JSON and non-array JSON are malformed.
pub fn parse_sources(body: &[u8]) -> Result<Vec<String>, Error> {
    let value: Value = serde_json::from_slice(body).map_err(|e| Error::MalformedSources(format!("invalid JSON: {e}")))?;

    let Value::Array(items) = value else {
        return Err(Error::MalformedSources("expected a JSON array".into()));
    };

    let total = items.len();
    let sources: Vec<String> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect();

    if sources.len() < total {
        tracing::warn!(dropped = total - sources.len(), "ignoring non-string script source entries");
    }

    Ok(sources)
}

/// Fetches the list from the fixed endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSourceFetcher {
    client: FetchClient,
    endpoint: Url,
}

impl HttpSourceFetcher {
    pub fn new(client: FetchClient, endpoint: &str) -> Result<Self, Error> {
        let endpoint = parse_http_url(endpoint).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SourceFetcher for HttpSourceFetcher {
    async fn fetch_sources(&self) -> Result<Vec<String>, Error> {
        let body = self.client.fetch(&self.endpoint).await?;
        parse_sources(&body)
    }
}

/// Cache lifetimes in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub success_ttl_secs: i64,
    pub failure_ttl_secs: i64,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self { success_ttl_secs: 300, failure_ttl_secs: 60 }
    }
}

impl From<&AppConfig> for CachePolicy {
    fn from(config: &AppConfig) -> Self {
        Self { success_ttl_secs: config.success_ttl_secs, failure_ttl_secs: config.failure_ttl_secs }
    }
}

/// Script sources backed by a transient slot and a fetcher.
#[derive(Clone)]
pub struct ScriptSourceCache {
    store: Arc<dyn TransientStore>,
    fetcher: Arc<dyn SourceFetcher>,
    policy: CachePolicy,
}

impl ScriptSourceCache {
    pub fn new(store: Arc<dyn TransientStore>, fetcher: Arc<dyn SourceFetcher>, policy: CachePolicy) -> Self {
        Self { store, fetcher, policy }
    }

    /// Current script sources; empty when the endpoint is failing.
    pub async fn get_script_sources(&self) -> Vec<String> {
        if let Some(cached) = self.cached().await {
            tracing::debug!(count = cached.len(), "script sources cache hit");
            return cached;
        }

        match self.fetcher.fetch_sources().await {
            Ok(sources) => {
                tracing::debug!(count = sources.len(), ttl = self.policy.success_ttl_secs, "script sources fetched");
                self.remember(&sources, self.policy.success_ttl_secs).await;
                sources
            }
            Err(e) => {
                tracing::warn!(error = %e, ttl = self.policy.failure_ttl_secs, "script sources unavailable; caching empty list");
                self.remember(&[], self.policy.failure_ttl_secs).await;
                Vec::new()
            }
        }
    }

    /// Drop the cached slot so the next read fetches.
    pub async fn invalidate(&self) -> Result<bool, Error> {
        self.store.delete_transient(SCRIPT_SOURCES_KEY).await
    }

    async fn cached(&self) -> Option<Vec<String>> {
        let value = match self.store.get_transient(SCRIPT_SOURCES_KEY).await {
            Ok(value) => value?,
            Err(e) => {
                tracing::warn!(error = %e, "script sources cache read failed");
                return None;
            }
        };

        match serde_json::from_value(value) {
            Ok(sources) => Some(sources),
            Err(e) => {
                tracing::warn!(error = %e, "cached script sources are unreadable; refetching");
                None
            }
        }
    }

    async fn remember(&self, sources: &[String], ttl_seconds: i64) {
        let value = Value::from(sources.to_vec());
        if let Err(e) = self.store.set_transient(SCRIPT_SOURCES_KEY, &value, ttl_seconds).await {
            tracing::warn!(error = %e, "script sources cache write failed");
        }
    }
}
