//! MCP tool implementations.
//!
//! Each tool:
//! 1. Parses and validates its input before touching the network
//! 2. Calls the knowledge base lookup layer
//! 3. Serializes the result as pretty-printed JSON

mod articles;
mod collections;

pub use articles::*;
pub use collections::*;

use std::sync::Arc;

use crate::error::ToolResult;
use crate::knowledge_base::KnowledgeBase;

/// Tool execution context.
#[derive(Clone)]
pub struct ToolContext {
    /// Knowledge base lookups (owns the client and the cache).
    pub kb: Arc<KnowledgeBase>,
}

impl ToolContext {
    /// Create a new tool context.
    #[must_use]
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }
}

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "get-article").
    fn name(&self) -> &'static str;

    /// Tool description for LLM.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// What the tool was doing, used in failure text ("Error getting article: ...").
    fn action(&self) -> &'static str;

    /// Execute the tool with given input.
    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String>;
}

/// Register all tools.
#[must_use]
pub fn register_all_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        Box::new(articles::GetArticleTool),
        Box::new(collections::GetCollectionTool),
        Box::new(articles::GetAllArticlesTool),
        Box::new(articles::SearchTool),
    ]
}
