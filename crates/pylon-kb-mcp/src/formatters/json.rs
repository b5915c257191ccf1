//! JSON output for article listings.
//!
//! Listings never carry article bodies; `get-article` is the way to read content.

use serde_json::{Value, json};

use crate::models::{ArticleSet, KnowledgeBaseArticle};

/// Display name of the knowledge base in listings.
pub const KNOWLEDGE_BASE_NAME: &str = "Amplemarket Knowledge Base";

/// Metadata-only view of an article.
#[must_use]
pub fn compact_article(article: &KnowledgeBaseArticle) -> Value {
    json!({
        "id": article.id,
        "title": article.title,
        "slug": article.slug,
        "identifier": article.identifier,
        "is_published": article.is_published,
        "last_published_at": article.last_published_at,
    })
}

/// Listing of every article, split by publish status.
#[must_use]
pub fn all_articles_report(set: &ArticleSet) -> Value {
    let (published, unpublished): (Vec<&KnowledgeBaseArticle>, Vec<&KnowledgeBaseArticle>) =
        set.articles.iter().partition(|a| a.is_published);

    json!({
        "summary": {
            "total": set.len(),
            "published_count": published.len(),
            "unpublished_count": unpublished.len(),
            "knowledge_base": KNOWLEDGE_BASE_NAME,
            "truncated": set.truncated,
        },
        "published_articles": published.into_iter().map(compact_article).collect::<Vec<_>>(),
        "unpublished_articles": unpublished.into_iter().map(compact_article).collect::<Vec<_>>(),
        "note": "Full article content not included - use get-article for specific article content",
    })
}
