//! Error types for the Pylon knowledge base MCP server.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

/// Errors raised while building the server configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The bearer token for the Pylon API is missing or empty.
    #[error("{var} environment variable is required")]
    MissingCredential {
        /// Name of the environment variable that was checked
        var: &'static str,
    },

    /// A configured URL could not be parsed.
    #[error("Invalid URL for {field}: {source}")]
    InvalidUrl {
        /// Configuration field holding the URL
        field: &'static str,
        /// Parser error
        #[source]
        source: url::ParseError,
    },
}

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("Pylon API error: {status}")]
    Upstream {
        /// HTTP status code
        status: u16,
    },

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint path could not be appended to the base URL.
    #[error("Cannot build request URL for '{endpoint}'")]
    Endpoint {
        /// Relative endpoint path
        endpoint: String,
    },
}

impl ClientError {
    /// Create an upstream status error.
    #[must_use]
    pub const fn upstream(status: u16) -> Self {
        Self::Upstream { status }
    }

    /// HTTP status code reported by the upstream, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from knowledge base lookups and MCP tool execution.
#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    /// Error from the API client
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Article or collection absent from the knowledge base
    #[error("{what} not found in Amplemarket knowledge base")]
    NotFound {
        /// Description of the missing entity
        what: String,
    },

    /// Input validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Returns true if this error was raised before any network call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Convert to a user-friendly error message for MCP response.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
