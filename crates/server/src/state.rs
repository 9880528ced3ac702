//! Shared state behind the MCP tools.

use std::sync::Arc;

use adunblock_client::{
    CachePolicy, FetchClient, FetchConfig, HeadInjector, HttpSourceFetcher, ScriptSourceCache, SourceFetcher,
};
use adunblock_core::config::{AppConfig, StorageBackend};
use adunblock_core::{CacheDb, Error, MemoryStore, OptionStore, SettingsStore, TransientStore};

/// Stores and the injector wired over them.
#[derive(Clone)]
pub struct AppState {
    pub injector: HeadInjector,
    pub options: Arc<dyn OptionStore>,
    pub transients: Arc<dyn TransientStore>,
}

impl AppState {
    /// Wire the injector over the given stores and endpoint fetcher.
    pub fn new(
        options: Arc<dyn OptionStore>, transients: Arc<dyn TransientStore>, fetcher: Arc<dyn SourceFetcher>,
        policy: CachePolicy,
    ) -> Self {
        let sources = ScriptSourceCache::new(transients.clone(), fetcher, policy);
        let injector = HeadInjector::new(SettingsStore::new(options.clone()), sources);
        Self { injector, options, transients }
    }

    /// Open the configured storage backend and the HTTP fetcher.
    ///
    /// Expired transients left by a previous run are purged on open.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let (options, transients): (Arc<dyn OptionStore>, Arc<dyn TransientStore>) = match config.storage {
            StorageBackend::Sqlite => {
                let db = CacheDb::open(&config.db_path).await?;
                let purged = db.purge_expired_transients().await?;
                tracing::info!(path = %config.db_path.display(), purged, "opened sqlite store");
                (Arc::new(db.clone()), Arc::new(db))
            }
            StorageBackend::Memory => {
                tracing::info!("using in-memory store; settings will not persist");
                let store = MemoryStore::new();
                (Arc::new(store.clone()), Arc::new(store))
            }
        };

        let client = FetchClient::new(FetchConfig::from(config))?;
        let fetcher = HttpSourceFetcher::new(client, &config.endpoint)?;
        tracing::info!(endpoint = %fetcher.endpoint(), "script sources endpoint");

        Ok(Self::new(options, transients, Arc::new(fetcher), CachePolicy::from(config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_config_memory() {
        let config = AppConfig { storage: StorageBackend::Memory, ..Default::default() };
        let state = AppState::from_config(&config).await.unwrap();
        assert_eq!(state.injector.settings().verification_code().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_from_config_rejects_bad_endpoint() {
        let config = AppConfig { storage: StorageBackend::Memory, endpoint: "ftp://x/y.json".into(), ..Default::default() };
        assert!(matches!(AppState::from_config(&config).await, Err(Error::InvalidUrl(_))));
    }
}
