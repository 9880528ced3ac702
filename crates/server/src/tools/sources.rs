//! script_sources tool implementation.
//!
//! Reads through the same TTL cache the render path uses.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::state::AppState;

/// Parameters for the script_sources tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScriptSourcesParams {
    /// Drop the cached list first, forcing a fetch from the endpoint.
    #[serde(default)]
    pub refresh: bool,
}

/// Output from the script_sources tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScriptSourcesOutput {
    /// Current list; empty while the endpoint is failing.
    pub sources: Vec<String>,
    /// Whether a cached list was dropped before reading.
    pub invalidated: bool,
}

/// Implementation of the script_sources tool.
pub async fn sources_impl(state: &AppState, params: ScriptSourcesParams) -> Result<CallToolResult, McpError> {
    let cache = state.injector.sources();
    let invalidated = if params.refresh { cache.invalidate().await? } else { false };
    let sources = cache.get_script_sources().await;

    json_result(&ScriptSourcesOutput { sources, invalidated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{decode, state};

    #[tokio::test]
    async fn test_sources_cached_until_refresh() {
        let (state, _store, fetcher) = state(&["https://cdn.example/s1.js", "https://cdn.example/s2.js"]);

        let output: ScriptSourcesOutput = decode(&sources_impl(&state, ScriptSourcesParams::default()).await.unwrap());
        assert_eq!(output.sources, vec!["https://cdn.example/s1.js", "https://cdn.example/s2.js"]);
        assert!(!output.invalidated);

        sources_impl(&state, ScriptSourcesParams::default()).await.unwrap();
        assert_eq!(fetcher.calls(), 1);

        let output: ScriptSourcesOutput =
            decode(&sources_impl(&state, ScriptSourcesParams { refresh: true }).await.unwrap());
        assert!(output.invalidated);
        assert_eq!(output.sources.len(), 2);
        assert_eq!(fetcher.calls(), 2);
    }
}
