//! Data models for Pylon knowledge base entities.
//!
//! Upstream shapes keep Pylon's snake_case names; the views handed to MCP
//! clients use camelCase.

mod article;
mod inputs;

pub use article::{
    Article, ArticlePage, ArticleSearchResult, ArticleSet, Collection, CollectionMetadata,
    CollectionResponse, KnowledgeBaseArticle, Pagination, SearchParams,
};
pub use inputs::*;
