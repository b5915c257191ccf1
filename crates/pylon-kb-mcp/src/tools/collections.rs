//! Collection tools: get-collection.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::error::ToolResult;
use crate::models::{GetCollectionInput, parse_input};

/// Collection metadata plus its article listing.
pub struct GetCollectionTool;

#[async_trait::async_trait]
impl McpTool for GetCollectionTool {
    fn name(&self) -> &'static str {
        "get-collection"
    }

    fn description(&self) -> &'static str {
        "Get collection metadata and articles from the Pylon knowledge base"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Collection ID"
                }
            },
            "required": ["id"]
        })
    }

    fn action(&self) -> &'static str {
        "getting collection"
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: GetCollectionInput = parse_input(input)?;
        params.validate()?;

        let collection = ctx.kb.get_collection(&params.id).await?;
        Ok(serde_json::to_string_pretty(&collection)?)
    }
}
