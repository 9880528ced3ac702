//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::state::AppState;
use crate::tools::{self, PageParams, ScriptSourcesParams, UpdateSettingsParams};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for adunblock.
#[derive(Clone)]
pub struct AdUnblockServer {
    state: AppState,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl AdUnblockServer {
    /// Create a new server handler over the given state.
    pub fn new(state: AppState) -> Self {
        Self { state, tool_router: Self::tool_router() }
    }

    /// Render the head markup for one page view.
    ///
    /// Emits the verification meta tag and one async script tag when a code is set,
    /// a rule enables the page, and the source list is non-empty. Otherwise emits nothing.
    #[tool(description = "Render the ad-recovery head markup for a page view. Returns empty html when nothing should be injected.")]
    async fn render_head(&self, params: Parameters<PageParams>) -> Result<CallToolResult, McpError> {
        tools::page::render_head_impl(&self.state, params.0).await
    }

    /// Evaluate the stored page rules without touching the script sources.
    #[tool(description = "Check whether the stored page rules enable a page, and which rule matched first.")]
    async fn check_page(&self, params: Parameters<PageParams>) -> Result<CallToolResult, McpError> {
        tools::page::check_page_impl(&self.state, params.0).await
    }

    #[tool(description = "Get the stored verification code and page rules.")]
    async fn get_settings(&self) -> Result<CallToolResult, McpError> {
        tools::settings::get_impl(&self.state).await
    }

    /// Sanitize and persist settings. Omitted fields are left unchanged.
    #[tool(description = "Update the verification code and/or page rules. Values are sanitized before storing.")]
    async fn update_settings(&self, params: Parameters<UpdateSettingsParams>) -> Result<CallToolResult, McpError> {
        tools::settings::update_impl(&self.state, params.0).await
    }

    #[tool(description = "Get the current script-source list (cached for 5 minutes, 1 minute after a failure).")]
    async fn script_sources(&self, params: Parameters<ScriptSourcesParams>) -> Result<CallToolResult, McpError> {
        tools::sources::sources_impl(&self.state, params.0).await
    }

    /// Remove every stored setting and the cached source list.
    #[tool(description = "Clear the verification code, page rules, and cached script sources.")]
    async fn reset(&self) -> Result<CallToolResult, McpError> {
        tools::reset::reset_impl(&self.state).await
    }
}

impl ServerHandler for AdUnblockServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "adunblock-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
