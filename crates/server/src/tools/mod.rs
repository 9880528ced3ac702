//! MCP tool implementations.
//!
//! This module contains all tools exposed by the adunblock server.

pub mod page;
pub mod reset;
pub mod settings;
pub mod sources;

use adunblock_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

pub use page::PageParams;
pub use settings::UpdateSettingsParams;
pub use sources::ScriptSourcesParams;

/// Pretty JSON text content, the shape every tool returns.
fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use adunblock_client::{CachePolicy, SourceFetcher};
    use adunblock_core::{Error, MemoryStore};
    use async_trait::async_trait;
    use rmcp::model::CallToolResult;
    use serde::de::DeserializeOwned;

    use crate::state::AppState;

    pub struct FixedFetcher {
        pub sources: Vec<String>,
        pub calls: AtomicUsize,
    }

    impl FixedFetcher {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SourceFetcher for FixedFetcher {
        async fn fetch_sources(&self) -> Result<Vec<String>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.sources.clone())
        }
    }

    pub fn state(sources: &[&str]) -> (AppState, MemoryStore, Arc<FixedFetcher>) {
        let store = MemoryStore::new();
        let fetcher = Arc::new(FixedFetcher {
            sources: sources.iter().map(|s| s.to_string()).collect(),
            calls: AtomicUsize::new(0),
        });
        let state = AppState::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            fetcher.clone(),
            CachePolicy::default(),
        );
        (state, store, fetcher)
    }

    pub fn decode<T: DeserializeOwned>(result: &CallToolResult) -> T {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }
}
