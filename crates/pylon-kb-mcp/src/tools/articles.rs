//! Article tools: get-article, get-all-articles, search.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::error::ToolResult;
use crate::formatters;
use crate::models::{
    GetAllArticlesInput, GetArticleInput, MAX_SEARCH_LIMIT, SearchInput, SearchParams, parse_input,
};

/// Single article lookup by ID or slug.
pub struct GetArticleTool;

#[async_trait::async_trait]
impl McpTool for GetArticleTool {
    fn name(&self) -> &'static str {
        "get-article"
    }

    fn description(&self) -> &'static str {
        "Get a specific article from the Amplemarket knowledge base by ID or slug. \
         Returns the HTML body and a plain-text rendering."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "Article ID (provide either id or slug)"
                },
                "slug": {
                    "type": "string",
                    "description": "Article slug (provide either id or slug)"
                }
            },
            "additionalProperties": false
        })
    }

    fn action(&self) -> &'static str {
        "getting article"
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: GetArticleInput = parse_input(input)?;
        let reference = params.validate()?;

        let article = ctx.kb.get_article(&reference).await?;
        Ok(serde_json::to_string_pretty(&article)?)
    }
}

/// Metadata listing of every article, split by publish status.
pub struct GetAllArticlesTool;

#[async_trait::async_trait]
impl McpTool for GetAllArticlesTool {
    fn name(&self) -> &'static str {
        "get-all-articles"
    }

    fn description(&self) -> &'static str {
        "Get all articles from the Amplemarket knowledge base, separated by publish status. \
         Returns metadata only (titles, IDs, slugs, publish status). \
         Use get-article to read the content of a specific article."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    }

    fn action(&self) -> &'static str {
        "getting Amplemarket articles"
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let _: GetAllArticlesInput = parse_input(input)?;

        let set = ctx.kb.all_articles().await?;
        Ok(serde_json::to_string_pretty(&formatters::all_articles_report(&set))?)
    }
}

/// Substring search over titles and content.
pub struct SearchTool;

#[async_trait::async_trait]
impl McpTool for SearchTool {
    fn name(&self) -> &'static str {
        "search"
    }

    fn description(&self) -> &'static str {
        "Search articles in the Amplemarket knowledge base. Matches the query against \
         article titles and content, case-insensitively."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Text to look for in article titles and content"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_SEARCH_LIMIT,
                    "default": SearchParams::DEFAULT_LIMIT,
                    "description": "Maximum number of results to return"
                }
            },
            "required": ["query"]
        })
    }

    fn action(&self) -> &'static str {
        "searching articles"
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params: SearchInput = parse_input(input)?;
        params.validate()?;

        let mut search = SearchParams::new(params.query.clone());
        if let Some(limit) = params.limit.and_then(|l| usize::try_from(l).ok()) {
            search = search.with_limit(limit);
        }

        let results = ctx.kb.search_articles(&search).await?;

        Ok(serde_json::to_string_pretty(&json!({
            "query": params.query,
            "totalResults": results.len(),
            "articles": results
        }))?)
    }
}
