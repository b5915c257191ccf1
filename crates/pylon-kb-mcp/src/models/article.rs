//! Article and collection models matching the Pylon API schema.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// An article exactly as the knowledge base list endpoint returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBaseArticle {
    /// Unique article ID (UUID).
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    /// Article title.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// URL slug.
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,

    /// Numeric identifier used in public article URLs.
    #[serde(default, deserialize_with = "null_as_default")]
    pub identifier: String,

    /// Whether the article is currently published.
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_published: bool,

    /// Published HTML body.
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_published_content_html: String,

    /// Last publication timestamp (RFC 3339).
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_published_at: String,
}

impl KnowledgeBaseArticle {
    /// Public URL of this article under `base`.
    #[must_use]
    pub fn public_url(&self, base: &str) -> String {
        format!("{}/{}-{}", base.trim_end_matches('/'), self.identifier, self.slug)
    }

    /// Case-insensitive substring match against title or HTML body.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.current_published_content_html.to_lowercase().contains(needle)
    }
}

/// Pagination block of a list response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    /// Whether another page follows.
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_next_page: bool,

    /// Opaque continuation token.
    #[serde(default)]
    pub cursor: Option<String>,
}

impl Pagination {
    /// Cursor for the next page, if the upstream says there is one.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_next_page {
            self.cursor.as_deref().filter(|c| !c.is_empty())
        } else {
            None
        }
    }
}

/// One page of `GET knowledge-bases/{id}/articles`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticlePage {
    /// Articles on this page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<KnowledgeBaseArticle>,

    /// Continuation info; absent means last page.
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl ArticlePage {
    /// Cursor for the next page, if any.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.pagination.as_ref().and_then(Pagination::next_cursor)
    }
}

/// Every article of a knowledge base, in the order the pages arrived.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleSet {
    /// Raw articles.
    pub articles: Vec<KnowledgeBaseArticle>,

    /// Set when the walk hit the safety cap before the upstream ran out of pages.
    #[serde(default)]
    pub truncated: bool,
}

impl ArticleSet {
    /// Find an article by ID.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&KnowledgeBaseArticle> {
        self.articles.iter().find(|a| a.id == id)
    }

    /// Find an article by slug.
    #[must_use]
    pub fn find_by_slug(&self, slug: &str) -> Option<&KnowledgeBaseArticle> {
        self.articles.iter().find(|a| a.slug == slug)
    }

    /// Number of articles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Full article view returned by `get-article`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub collection_id: String,
    pub html: String,
    /// Plain-text rendering of `html`.
    pub text: String,
    pub updated_at: String,
    pub url: String,
}

/// Article listing entry without the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSearchResult {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub collection_id: String,
    pub url: String,
    pub updated_at: String,
}

/// Collection metadata as returned by `GET collections/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Envelope of `GET collections/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionResponse {
    pub collection: CollectionMetadata,
}

/// Collection view returned by `get-collection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<ArticleSearchResult>>,
}

/// Parameters of an article search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Substring to look for; empty matches everything.
    pub query: String,

    /// Maximum results (defaults to 10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Accepted for API compatibility; every article lives in the one knowledge base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
}

impl SearchParams {
    /// Default result limit.
    pub const DEFAULT_LIMIT: usize = 10;

    /// Search for `query` with the default limit.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), limit: None, collection_id: None }
    }

    /// Set the result limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Tag the search with a collection.
    #[must_use]
    pub fn in_collection(mut self, id: impl Into<String>) -> Self {
        self.collection_id = Some(id.into());
        self
    }

    /// Effective limit.
    #[must_use]
    pub fn effective_limit(&self) -> usize {
        self.limit.filter(|&l| l > 0).unwrap_or(Self::DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_article_nulls_become_defaults() {
        let article: KnowledgeBaseArticle = serde_json::from_value(json!({
            "id": "a1",
            "title": "Draft",
            "slug": "draft",
            "identifier": "42",
            "is_published": false,
            "current_published_content_html": null,
            "last_published_at": null
        }))
        .unwrap();

        assert_eq!(article.current_published_content_html, "");
        assert_eq!(article.last_published_at, "");
        assert!(!article.is_published);
    }

    #[test]
    fn test_public_url() {
        let article = KnowledgeBaseArticle {
            identifier: "1178113824".to_string(),
            slug: "the-checkout-conversion-testing-program-faq".to_string(),
            ..Default::default()
        };
        assert_eq!(
            article.public_url("https://knowledge.amplemarket.com/articles/"),
            "https://knowledge.amplemarket.com/articles/1178113824-the-checkout-conversion-testing-program-faq"
        );
    }

    #[test]
    fn test_page_cursor_requires_next_page_flag() {
        let page: ArticlePage = serde_json::from_value(json!({
            "data": [],
            "pagination": {"has_next_page": false, "cursor": "abc"}
        }))
        .unwrap();
        assert_eq!(page.next_cursor(), None);

        let page: ArticlePage = serde_json::from_value(json!({
            "data": [],
            "pagination": {"has_next_page": true, "cursor": "abc"}
        }))
        .unwrap();
        assert_eq!(page.next_cursor(), Some("abc"));

        let page: ArticlePage = serde_json::from_value(json!({
            "pagination": {"has_next_page": true}
        }))
        .unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.next_cursor(), None);
    }

    #[test]
    fn test_collection_omits_absent_fields() {
        let collection = Collection {
            id: "c1".to_string(),
            name: "Getting started".to_string(),
            description: None,
            articles: None,
        };
        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value, json!({"id": "c1", "name": "Getting started"}));
    }

    #[test]
    fn test_search_params_effective_limit() {
        assert_eq!(SearchParams::new("x").effective_limit(), 10);
        assert_eq!(SearchParams::new("x").with_limit(3).effective_limit(), 3);
        assert_eq!(SearchParams::new("x").with_limit(0).effective_limit(), 10);
    }
}
