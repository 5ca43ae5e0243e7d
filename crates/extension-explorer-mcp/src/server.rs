use std::sync::Arc;

use extension_explorer_core::{Config, Explorer, HttpSource};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;

const INSTRUCTIONS: &str = "Explore IntelliJ Platform extension points from the JetBrains \
Marketplace. Use intellij_extension_list or intellij_extension_search to find an extension \
point, then intellij_extension_detail to see real plugins implementing it with source links.";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchRequest {
    /// Keyword to search for in extension point names. Examples: 'contributor',
    /// 'completion.contributor', 'action', 'inspection'
    pub search: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DetailRequest {
    /// The fully qualified extension point name, e.g. 'com.intellij.completion.contributor'
    pub extension: String,
}

/// MCP handler wrapping a shared [`Explorer`]
#[derive(Clone)]
pub struct ExplorerServer {
    explorer: Arc<Explorer<HttpSource>>,
    tool_router: ToolRouter<Self>,
}

impl ExplorerServer {
    pub fn new(config: Config) -> Self {
        Self {
            explorer: Arc::new(Explorer::from_config(config)),
            tool_router: Self::tool_router(),
        }
    }

    /// Run an explorer call on a dedicated OS thread.
    ///
    /// The blocking HTTP client owns an internal runtime that must be created
    /// and dropped outside the async executor.
    async fn run<F>(&self, call: F) -> Result<CallToolResult, McpError>
    where
        F: FnOnce(&Explorer<HttpSource>) -> String + Send + 'static,
    {
        let explorer = Arc::clone(&self.explorer);
        let (tx, rx) = tokio::sync::oneshot::channel();

        std::thread::spawn(move || {
            let _ = tx.send(call(&explorer));
        });

        let text = rx
            .await
            .map_err(|_| McpError::internal_error("explorer worker exited unexpectedly", None))?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_router]
impl ExplorerServer {
    #[tool(
        name = "intellij_extension_list",
        description = "Lists all available IntelliJ Platform extension points from the JetBrains Marketplace.

USE THIS TOOL WHEN:
- You need to discover what extension points are available in the IntelliJ Platform
- You want to find out how to extend IntelliJ IDEA functionality
- You're starting plugin development and need to explore extensibility options

RETURNS: A list of all extension point names (e.g., 'com.intellij.completion.contributor', 'com.intellij.psi.referenceContributor')

NEXT STEPS: After getting the list, use 'intellij_extension_search' to filter by keyword or 'intellij_extension_detail' to get implementation examples."
    )]
    async fn extension_list(&self) -> Result<CallToolResult, McpError> {
        tracing::info!("listing extension points");
        self.run(|explorer| explorer.list()).await
    }

    #[tool(
        name = "intellij_extension_search",
        description = "Searches for IntelliJ Platform extension points by keyword from the JetBrains Marketplace.

USE THIS TOOL WHEN:
- You know a partial name of an extension point (e.g., 'completion.contributor', 'reference')

EXAMPLES:
- Search 'contributor' to find all contributor-based extension points
- Search 'completion' to find code completion related extensions

RETURNS: Filtered list of matching extension point names

NEXT STEPS: Use 'intellij_extension_detail' with a specific extension name to see real-world implementation examples with source code links."
    )]
    async fn extension_search(
        &self,
        Parameters(SearchRequest { search }): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(query = %search, "searching extension points");
        self.run(move |explorer| explorer.search(&search)).await
    }

    #[tool(
        name = "intellij_extension_detail",
        description = "Retrieves real-world implementation examples for a specific IntelliJ Platform extension point.

USE THIS TOOL WHEN:
- You have identified an extension point and want to see how it's implemented in practice
- You need source code examples from existing plugins
- You want to learn common patterns for implementing a specific extension

PROVIDES:
- Plugin names that implement this extension point, mixing popular, recently updated and verified vendors
- Direct links to source code repositories (GitHub, GitLab, etc.)
- GitHub code search links scoped to each repository

EXAMPLE USAGE:
- intellij_extension_detail('com.intellij.psi.referenceContributor') - see reference resolution implementations"
    )]
    async fn extension_detail(
        &self,
        Parameters(DetailRequest { extension }): Parameters<DetailRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(extension = %extension, "loading extension point detail");
        self.run(move |explorer| explorer.detail(&extension)).await
    }
}

#[tool_handler]
impl ServerHandler for ExplorerServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_schema() {
        let schema = serde_json::to_value(schemars::schema_for!(SearchRequest)).unwrap();
        assert_eq!(schema["required"], serde_json::json!(["search"]));
        assert_eq!(schema["properties"]["search"]["type"], "string");
    }

    #[test]
    fn test_detail_request_deserialize() {
        let request: DetailRequest =
            serde_json::from_str(r#"{"extension":"com.intellij.completion.contributor"}"#).unwrap();
        assert_eq!(request.extension, "com.intellij.completion.contributor");
    }

    #[test]
    fn test_server_info_enables_tools() {
        let server = ExplorerServer::new(Config::default());
        let info = server.get_info();

        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("intellij_extension_detail"));
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query_without_network() {
        let server = ExplorerServer::new(Config::default());
        let result = server
            .extension_search(Parameters(SearchRequest {
                search: String::new(),
            }))
            .await
            .unwrap();

        let text = serde_json::to_string(&result.content).unwrap();
        assert!(text.contains("search query must not be empty"));
    }
}
