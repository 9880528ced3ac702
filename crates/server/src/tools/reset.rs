//! reset tool implementation.
//!
//! Clears the verification code, the page rules and the cached sources,
//! as an uninstall would.

use adunblock_core::settings::uninstall;
use rmcp::{ErrorData as McpError, model::CallToolResult};

use super::json_result;
use crate::state::AppState;

/// Implementation of the reset tool.
pub async fn reset_impl(state: &AppState) -> Result<CallToolResult, McpError> {
    let report = uninstall(state.options.as_ref(), state.transients.as_ref()).await?;
    json_result(&report)
}
