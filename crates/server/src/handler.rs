//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::cache_purge::{CachePurgeParams, purge_impl};
use crate::tools::find_relevant::{FindRelevantParams, find_relevant_impl};

use docscout_core::LookupService;
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

/// The main MCP server handler for docscout.
#[derive(Clone)]
pub struct DocScoutServer {
    tool_router: ToolRouter<Self>,
    service: LookupService,
}

#[tool_router]
impl DocScoutServer {
    /// Create a new server handler around a lookup service.
    pub fn new(service: LookupService) -> Self {
        Self { tool_router: Self::tool_router(), service }
    }

    /// Find the pages of a documentation site relevant to a question.
    ///
    /// Discovered page lists are cached per root URL and page limit; the
    /// relevance filter runs on every call.
    #[tool(
        description = "Discover the pages of a documentation site and return the ones relevant to a question. \
                       Returns a summary followed by one URL per item."
    )]
    async fn find_relevant_doc_pages(
        &self, params: Parameters<FindRelevantParams>,
    ) -> Result<CallToolResult, McpError> {
        find_relevant_impl(&self.service, params.0).await
    }

    /// Remove expired cache entries, or everything with `all`.
    #[tool(description = "Purge the page cache. Removes expired entries, or every entry when all=true.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(self.service.cache(), params.0).await
    }
}

impl ServerHandler for DocScoutServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "docscout".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Use find_relevant_doc_pages with a documentation root URL and a question \
                 to get the pages worth reading."
                    .into(),
            ),
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
