//! adunblock-mcp server entry point.
//!
//! Boots the MCP server on stdio transport over the configured stores.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use adunblock_core::config::AppConfig;
use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod state;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(storage = ?config.storage, "Starting adunblock-mcp server on stdio transport");

    let state = state::AppState::from_config(&config).await?;
    let handler = handler::AdUnblockServer::new(state);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
