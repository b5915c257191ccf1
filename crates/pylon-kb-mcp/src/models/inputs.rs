//! Input models for MCP tool parameters.
//!
//! Each input parses leniently with serde and is then checked by `validate`,
//! so shape errors surface before any upstream call.

use serde::{Deserialize, Serialize};

use crate::error::{ToolError, ToolResult};

/// Largest `limit` a caller may request from `search`.
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Input for `get-article`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetArticleInput {
    /// Article ID (takes precedence over `slug`).
    #[serde(default)]
    pub id: Option<String>,

    /// Article slug.
    #[serde(default)]
    pub slug: Option<String>,
}

/// How a caller identified an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleRef {
    Id(String),
    Slug(String),
}

impl GetArticleInput {
    /// Resolve to an ID or slug; empty strings count as absent.
    pub fn validate(&self) -> ToolResult<ArticleRef> {
        let non_empty = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

        if let Some(id) = non_empty(&self.id) {
            Ok(ArticleRef::Id(id))
        } else if let Some(slug) = non_empty(&self.slug) {
            Ok(ArticleRef::Slug(slug))
        } else {
            Err(ToolError::validation("id", "Either 'id' or 'slug' must be provided"))
        }
    }
}

/// Input for `get-collection`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCollectionInput {
    /// Collection ID.
    pub id: String,
}

impl GetCollectionInput {
    pub fn validate(&self) -> ToolResult<()> {
        if self.id.is_empty() {
            return Err(ToolError::validation("id", "Collection ID cannot be empty"));
        }
        Ok(())
    }
}

/// Input for `search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchInput {
    /// Search query (matched against titles and content).
    pub query: String,

    /// Maximum number of results (1-100, default 10).
    #[serde(default)]
    pub limit: Option<i64>,
}

impl SearchInput {
    pub fn validate(&self) -> ToolResult<()> {
        if self.query.is_empty() {
            return Err(ToolError::validation("query", "Query cannot be empty"));
        }
        if let Some(limit) = self.limit {
            if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
                return Err(ToolError::validation(
                    "limit",
                    format!("must be between 1 and {MAX_SEARCH_LIMIT}, got {limit}"),
                ));
            }
        }
        Ok(())
    }
}

/// Input for `get-all-articles` (takes no parameters).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetAllArticlesInput {}

/// Deserialize tool arguments, reporting shape errors as validation failures.
pub fn parse_input<T>(input: serde_json::Value) -> ToolResult<T>
where
    T: serde::de::DeserializeOwned,
{
    let input = if input.is_null() { serde_json::json!({}) } else { input };
    serde_json::from_value(input).map_err(|e| ToolError::validation("arguments", e.to_string()))
}
