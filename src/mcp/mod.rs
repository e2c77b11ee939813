//! MCP (Model Context Protocol) server.
//!
//! Exposes the [`ToolRegistry`] to MCP clients over stdio. Every tool call
//! resolves to a single text block; tool failures are readable text rather
//! than protocol errors, so a client always has something to show the user.

use std::sync::Arc;

use anyhow::Result;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::transport::stdio;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, ServiceExt};
use serde_json::Value;
use tracing::{error, info};

use crate::tools::{ToolContext, ToolRegistry};
use crate::wiki::WikiApi;

const INSTRUCTIONS: &str = "Look things up on the EVE University Wiki. Use search_eve_wiki to \
find pages, get_eve_wiki_page or get_eve_wiki_summary to read them, browse_eve_wiki_category \
and get_related_pages to explore, and generate_newbro_mining_plan for a cited starter mining plan.";

#[derive(Clone)]
pub struct WikiMcpServer {
    registry: Arc<ToolRegistry>,
    wiki: Arc<dyn WikiApi>,
}

impl WikiMcpServer {
    pub fn new(registry: Arc<ToolRegistry>, wiki: Arc<dyn WikiApi>) -> Self {
        Self { registry, wiki }
    }

    /// Tool descriptors as advertised to clients.
    pub fn tool_descriptors(&self) -> Vec<rmcp::model::Tool> {
        self.registry
            .tools()
            .map(|tool| {
                rmcp::model::Tool::new(
                    tool.name().to_string(),
                    tool.description().to_string(),
                    Arc::new(schema_object(tool.parameters_schema())),
                )
            })
            .collect()
    }

    /// Run one tool and wrap its text for the wire.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> Result<String> {
        let params = arguments.map(Value::Object).unwrap_or(Value::Null);
        let ctx = ToolContext::new(self.wiki.as_ref());
        self.registry.execute(name, params, &ctx).await
    }
}

fn schema_object(schema: Value) -> JsonObject {
    match schema {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    }
}

impl ServerHandler for WikiMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tool_descriptors()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        info!("MCP tool call: {}", request.name);
        match self.dispatch(&request.name, request.arguments).await {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(e) => {
                error!("Tool {} failed: {}", request.name, e);
                Err(McpError::internal_error(e.to_string(), None))
            }
        }
    }
}

/// Serve MCP over stdin/stdout until the client disconnects.
pub async fn serve_stdio(registry: Arc<ToolRegistry>, wiki: Arc<dyn WikiApi>) -> Result<()> {
    info!("Starting MCP server on stdio");
    let service = WikiMcpServer::new(registry, wiki).serve(stdio()).await?;
    service.waiting().await?;
    info!("MCP client disconnected");
    Ok(())
}
