//! MCP server handler.
//!
//! The server only exposes tools. Tool routes are built in
//! `domains/tools/router.rs`; the HTTP transport dispatches through the
//! `ToolRegistry` instead.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;

use super::config::Config;
use crate::domains::tools::build_tool_router;

#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, ToolRegistry};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration, shared with every tool route.
    config: Arc<Config>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        Self {
            tool_router: build_tool_router::<Self>(config.clone()),
            config,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Usage notes sent to clients on initialization.
    pub fn instructions(&self) -> String {
        let roots: Vec<String> = self
            .config
            .security
            .permitted_roots
            .iter()
            .map(|root| root.display().to_string())
            .collect();

        format!(
            "Read-only metadata for image and video files. Use get_images_info and \
             get_videos_info with a list of file paths; each path is answered \
             independently and in order. Only files inside these directories can be read: {}",
            roots.join(", ")
        )
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema,
                    "annotations": t.annotations
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// Tools stat, decode and spawn processes, so they run on the blocking pool.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let registry = ToolRegistry::new(self.config.clone());
        let name = name.to_string();

        tokio::task::spawn_blocking(move || registry.call_tool(&name, arguments))
            .await
            .map_err(|e| ToolError::internal(format!("Task execution failed: {}", e)))?
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.instructions()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn server() -> McpServer {
        McpServer::new(Config::default().with_permitted_roots([PathBuf::from("/srv/media")]))
    }

    #[test]
    fn test_lists_both_tools() {
        let tools = server().list_tools();
        let names: Vec<_> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"get_images_info"));
        assert!(names.contains(&"get_videos_info"));
    }

    #[test]
    fn test_get_info_only_advertises_tools() {
        let info = server().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
        assert_eq!(info.server_info.name, "media-info-mcp");
    }

    #[test]
    fn test_instructions_name_permitted_roots() {
        assert!(server().instructions().contains("/srv/media"));
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_call_unknown_tool() {
        let result = server()
            .call_tool("get_audio_info", serde_json::json!({}))
            .await;
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }
}
