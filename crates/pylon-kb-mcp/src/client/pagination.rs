//! Cursor pagination over a knowledge base's article list.

use super::PylonClient;
use crate::error::ClientResult;
use crate::models::ArticleSet;

impl PylonClient {
    /// Fetch every article of a knowledge base.
    ///
    /// Follows `pagination.cursor` while `has_next_page` is set. Articles are
    /// returned in page arrival order. The walk stops early once more than
    /// the configured cap has been collected, in which case the set is
    /// flagged `truncated`. A failed page fails the whole walk.
    ///
    /// # Errors
    ///
    /// Returns error if any page request fails.
    pub async fn fetch_knowledge_base_articles(
        &self,
        knowledge_base_id: &str,
    ) -> ClientResult<ArticleSet> {
        let mut set = ArticleSet::default();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.list_articles_page(knowledge_base_id, cursor.as_deref()).await?;
            pages += 1;

            let next = page.next_cursor().map(str::to_string);
            set.articles.extend(page.data);

            let Some(next) = next else {
                break;
            };

            if set.articles.len() > self.max_articles {
                tracing::warn!(
                    knowledge_base_id,
                    collected = set.articles.len(),
                    cap = self.max_articles,
                    "Article walk hit safety cap; results truncated"
                );
                set.truncated = true;
                break;
            }

            cursor = Some(next);
        }

        tracing::debug!(knowledge_base_id, pages, articles = set.articles.len(), "Fetched articles");
        Ok(set)
    }
}
