//! Pylon Knowledge Base MCP Server
//!
//! A Model Context Protocol (MCP) server exposing the Amplemarket knowledge
//! base, hosted on Pylon, to LLM agents as tools and `pylon-article://`
//! resources.
//!
//! # Features
//!
//! - **4 MCP Tools**: get-article, get-collection, get-all-articles, search
//! - **Resources**: article plain text by ID or slug
//! - **Cached**: 60-second TTL cache; the full article list is walked at most once per TTL
//!
//! # Example
//!
//! ```no_run
//! use pylon_kb_mcp::{config::Config, knowledge_base::KnowledgeBase};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let kb = KnowledgeBase::new(&config)?;
//!
//!     let article = kb.get_article_by_slug("getting-started-guide").await?;
//!     println!("{}", article.text);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod knowledge_base;
pub mod models;
pub mod resources;
pub mod server;
pub mod tools;

pub use cache::ResponseCache;
pub use client::PylonClient;
pub use config::Config;
pub use error::{ClientError, ConfigError, ToolError};
pub use knowledge_base::KnowledgeBase;
