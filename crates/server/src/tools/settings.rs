//! get_settings and update_settings tool implementations.

use adunblock_core::{Error, PageRulesInput};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;
use crate::state::AppState;

/// Parameters for the update_settings tool. Omitted fields are left as stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct UpdateSettingsParams {
    /// Verification code issued by the ad-recovery service. Tags and
    /// surrounding whitespace are stripped before storing.
    #[serde(default)]
    pub verification_code: Option<String>,

    /// Page rules as an admin form would submit them.
    #[serde(default)]
    pub page_rules: Option<PageRulesInput>,
}

/// Implementation of the get_settings tool.
pub async fn get_impl(state: &AppState) -> Result<CallToolResult, McpError> {
    let settings = state.injector.settings().settings().await?;
    json_result(&settings)
}

/// Implementation of the update_settings tool.
pub async fn update_impl(state: &AppState, params: UpdateSettingsParams) -> Result<CallToolResult, McpError> {
    if params.verification_code.is_none() && params.page_rules.is_none() {
        return Err(Error::InvalidInput("At least one of verification_code or page_rules must be specified".into()).into());
    }

    let settings = state.injector.settings();

    if let Some(raw) = &params.verification_code {
        let code = settings.save_verification_code(raw).await?;
        tracing::info!(empty = code.is_empty(), "verification code updated");
    }

    if let Some(input) = &params.page_rules {
        let rules = settings.save_page_rules(input).await?;
        tracing::info!(all_pages = rules.all_pages.is_yes(), patterns = rules.url_patterns.lines().count(), "page rules updated");
    }

    json_result(&settings.settings().await?)
}
