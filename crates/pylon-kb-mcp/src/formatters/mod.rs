//! Output formatting for MCP tool results.

pub mod json;
pub mod text;

pub use json::{all_articles_report, compact_article};
pub use text::html_to_text;
