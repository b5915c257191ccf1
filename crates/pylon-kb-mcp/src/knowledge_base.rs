//! Article lookup and search over a single knowledge base.
//!
//! The full article list is fetched once per cache TTL and is the only
//! source for lookups by ID or slug. Assembled articles, searches and
//! collections are cached separately on top of it.

use serde_json::json;

use crate::cache::ResponseCache;
use crate::client::PylonClient;
use crate::config::Config;
use crate::error::{ToolError, ToolResult};
use crate::formatters::html_to_text;
use crate::models::{
    Article, ArticleRef, ArticleSearchResult, ArticleSet, Collection, KnowledgeBaseArticle,
    SearchParams,
};

/// Limit used when listing a collection's articles.
const COLLECTION_ARTICLE_LIMIT: usize = 100;

/// Cached, read-only view of one knowledge base.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    client: PylonClient,
    cache: ResponseCache,
    knowledge_base_id: String,
    article_base_url: String,
}

impl KnowledgeBase {
    /// Build the client and cache described by `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = PylonClient::new(config)?;
        let cache = ResponseCache::new(config.cache_ttl);
        Ok(Self::from_parts(
            client,
            cache,
            config.knowledge_base_id.clone(),
            config.article_base_url.clone(),
        ))
    }

    /// Assemble from an existing client and cache.
    #[must_use]
    pub fn from_parts(
        client: PylonClient,
        cache: ResponseCache,
        knowledge_base_id: String,
        article_base_url: String,
    ) -> Self {
        Self { client, cache, knowledge_base_id, article_base_url }
    }

    /// ID of the knowledge base every lookup runs against.
    #[must_use]
    pub fn knowledge_base_id(&self) -> &str {
        &self.knowledge_base_id
    }

    /// Underlying response cache.
    #[must_use]
    pub const fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Every article of `knowledge_base_id`, walking all pages on a cache miss.
    pub async fn knowledge_base_articles(&self, knowledge_base_id: &str) -> ToolResult<ArticleSet> {
        let key =
            ResponseCache::make_key("kb_articles", &json!({ "knowledgeBaseId": knowledge_base_id }));

        self.cache
            .memoize(key, || async {
                let set = self.client.fetch_knowledge_base_articles(knowledge_base_id).await?;
                Ok::<_, ToolError>(set)
            })
            .await
    }

    /// Every article of the configured knowledge base.
    pub async fn all_articles(&self) -> ToolResult<ArticleSet> {
        self.knowledge_base_articles(&self.knowledge_base_id).await
    }

    /// Resolve an article by ID.
    pub async fn get_article_by_id(&self, id: &str) -> ToolResult<Article> {
        let key = ResponseCache::make_key("article", &json!({ "id": id }));

        self.cache
            .memoize(key, || async {
                let articles = self.all_articles().await?;
                let raw = articles
                    .find_by_id(id)
                    .ok_or_else(|| ToolError::not_found(format!("Article with ID \"{id}\"")))?;
                Ok::<_, ToolError>(self.assemble_article(raw))
            })
            .await
    }

    /// Resolve an article by slug, sharing the by-ID cache entry.
    pub async fn get_article_by_slug(&self, slug: &str) -> ToolResult<Article> {
        let articles = self.all_articles().await?;
        let id = articles
            .find_by_slug(slug)
            .map(|a| a.id.clone())
            .ok_or_else(|| ToolError::not_found(format!("Article with slug \"{slug}\"")))?;

        self.get_article_by_id(&id).await
    }

    /// Resolve an article however the caller identified it.
    pub async fn get_article(&self, reference: &ArticleRef) -> ToolResult<Article> {
        match reference {
            ArticleRef::Id(id) => self.get_article_by_id(id).await,
            ArticleRef::Slug(slug) => self.get_article_by_slug(slug).await,
        }
    }

    /// Case-insensitive substring search over titles and HTML bodies.
    ///
    /// An empty query matches every article. `collection_id` does not narrow
    /// the results since all articles belong to the one knowledge base.
    pub async fn search_articles(&self, params: &SearchParams) -> ToolResult<Vec<ArticleSearchResult>> {
        let key = ResponseCache::make_key("search", params);

        self.cache
            .memoize(key, || async {
                let articles = self.all_articles().await?;
                let needle = params.query.to_lowercase();

                let results = articles
                    .articles
                    .iter()
                    .filter(|a| a.matches(&needle))
                    .take(params.effective_limit())
                    .map(|a| self.search_result(a))
                    .collect::<Vec<_>>();

                tracing::debug!(query = %params.query, results = results.len(), "Searched articles");
                Ok::<_, ToolError>(results)
            })
            .await
    }

    /// Collection metadata merged with the articles listed under it.
    pub async fn get_collection(&self, id: &str) -> ToolResult<Collection> {
        let key = ResponseCache::make_key("collection", &json!({ "id": id }));

        self.cache
            .memoize(key, || async {
                let metadata = self.client.get_collection(id).await?.collection;

                let params =
                    SearchParams::new("").in_collection(id).with_limit(COLLECTION_ARTICLE_LIMIT);
                let articles = self.search_articles(&params).await?;

                Ok::<_, ToolError>(Collection {
                    id: metadata.id,
                    name: metadata.name,
                    description: metadata.description,
                    articles: Some(articles),
                })
            })
            .await
    }

    fn assemble_article(&self, raw: &KnowledgeBaseArticle) -> Article {
        Article {
            id: raw.id.clone(),
            title: raw.title.clone(),
            slug: raw.slug.clone(),
            collection_id: self.knowledge_base_id.clone(),
            html: raw.current_published_content_html.clone(),
            text: html_to_text(&raw.current_published_content_html),
            updated_at: raw.last_published_at.clone(),
            url: raw.public_url(&self.article_base_url),
        }
    }

    fn search_result(&self, raw: &KnowledgeBaseArticle) -> ArticleSearchResult {
        ArticleSearchResult {
            id: raw.id.clone(),
            title: raw.title.clone(),
            slug: raw.slug.clone(),
            collection_id: self.knowledge_base_id.clone(),
            url: raw.public_url(&self.article_base_url),
            updated_at: raw.last_published_at.clone(),
        }
    }
}
