//! `pylon-article://` resources.
//!
//! `pylon-article://help` returns usage text; any other host is treated as an
//! article ID (when it looks like a UUID) or slug and resolves to the
//! article's plain text. Failures here are protocol errors, unlike tool
//! failures which come back as results flagged `isError`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::error::ToolError;
use crate::knowledge_base::KnowledgeBase;
use crate::models::ArticleRef;

/// URI scheme for article resources.
pub const SCHEME: &str = "pylon-article";

/// Well-known identifier that returns usage text.
pub const HELP_IDENTIFIER: &str = "help";

const TEXT_PLAIN: &str = "text/plain";

const HELP_TEXT: &str = "Pylon KB MCP Server Resources

Use the pylon-article:// scheme to access articles:
- pylon-article://<article-id> - Get article by ID
- pylon-article://<article-slug> - Get article by slug

Examples:
- pylon-article://123e4567-e89b-12d3-a456-426614174000
- pylon-article://getting-started-guide

The resource will return the plain text content of the article.
Use the search tool to find article IDs and slugs.";

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("UUID pattern compiles")
});

/// Entry in a `resources/list` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInfo {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

/// Entry in a `resources/read` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

/// What a resource URI points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceTarget {
    Help,
    Article(ArticleRef),
}

/// Errors from resource reads.
#[derive(thiserror::Error, Debug)]
pub enum ResourceError {
    #[error("Invalid resource URI '{uri}': {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported protocol: {0}:")]
    UnsupportedScheme(String),

    #[error("Missing article identifier in '{0}'")]
    MissingIdentifier(String),

    #[error("Failed to fetch article \"{identifier}\": {source}")]
    Fetch {
        identifier: String,
        #[source]
        source: ToolError,
    },
}

impl ResourceError {
    /// JSON-RPC error code for this failure.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::InvalidUri { .. } | Self::UnsupportedScheme(_) | Self::MissingIdentifier(_) => {
                -32602
            }
            Self::Fetch { .. } => -32603,
        }
    }
}

/// Resources advertised by `resources/list`.
#[must_use]
pub fn list_resources() -> Vec<ResourceInfo> {
    vec![ResourceInfo {
        uri: format!("{SCHEME}://{HELP_IDENTIFIER}"),
        name: "Pylon KB Resource Help".to_string(),
        description: "Information about available Pylon KB resources".to_string(),
        mime_type: TEXT_PLAIN.to_string(),
    }]
}

/// Work out what `uri` refers to without touching the network.
pub fn parse_target(uri: &str) -> Result<ResourceTarget, ResourceError> {
    let parsed =
        Url::parse(uri).map_err(|source| ResourceError::InvalidUri { uri: uri.to_string(), source })?;

    if parsed.scheme() != SCHEME {
        return Err(ResourceError::UnsupportedScheme(parsed.scheme().to_string()));
    }

    let identifier = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ResourceError::MissingIdentifier(uri.to_string()))?;

    Ok(if identifier == HELP_IDENTIFIER {
        ResourceTarget::Help
    } else if UUID_PATTERN.is_match(identifier) {
        ResourceTarget::Article(ArticleRef::Id(identifier.to_string()))
    } else {
        ResourceTarget::Article(ArticleRef::Slug(identifier.to_string()))
    })
}

/// Read a `pylon-article://` resource.
pub async fn read_resource(kb: &KnowledgeBase, uri: &str) -> Result<ResourceContents, ResourceError> {
    let text = match parse_target(uri)? {
        ResourceTarget::Help => HELP_TEXT.to_string(),
        ResourceTarget::Article(reference) => {
            let identifier = match &reference {
                ArticleRef::Id(id) => id.clone(),
                ArticleRef::Slug(slug) => slug.clone(),
            };
            kb.get_article(&reference)
                .await
                .map_err(|source| ResourceError::Fetch { identifier, source })?
                .text
        }
    };

    Ok(ResourceContents { uri: uri.to_string(), mime_type: TEXT_PLAIN.to_string(), text })
}
