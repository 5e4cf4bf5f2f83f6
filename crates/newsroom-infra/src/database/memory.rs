//! In-memory article store - used when no database is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use newsroom_core::domain::{Article, ArticlePatch, ArticleStatus};
use newsroom_core::error::RepoError;
use newsroom_core::ports::{ArticleQuery, ArticleRepository};

/// In-memory article store using a HashMap behind an async RwLock.
///
/// Each operation holds the write lock across its check and its write, which
/// makes compare-and-swap and the view increment atomic per article.
/// Note: Data is lost on process restart.
pub struct InMemoryArticleRepository {
    store: RwLock<HashMap<Uuid, Article>>,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryArticleRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, RepoError> {
        let store = self.store.read().await;
        Ok(store.get(&id).cloned())
    }

    async fn insert(&self, article: Article) -> Result<Article, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&article.id) {
            return Err(RepoError::Constraint(format!(
                "article {} already exists",
                article.id
            )));
        }

        store.insert(article.id, article.clone());
        Ok(article)
    }

    async fn compare_and_swap(
        &self,
        id: Uuid,
        expected: ArticleStatus,
        patch: ArticlePatch,
    ) -> Result<Article, RepoError> {
        let mut store = self.store.write().await;
        let stored = store.get_mut(&id).ok_or(RepoError::NotFound)?;

        if stored.status != expected {
            return Err(RepoError::StatusMismatch {
                expected,
                actual: stored.status,
            });
        }

        stored.apply(&patch);
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        store.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<Option<Article>, RepoError> {
        let mut store = self.store.write().await;
        Ok(store.get_mut(&id).map(|article| {
            article.view_count = article.view_count.saturating_add(1);
            article.clone()
        }))
    }

    async fn query(&self, query: &ArticleQuery) -> Result<Vec<Article>, RepoError> {
        let store = self.store.read().await;
        let mut articles: Vec<Article> = store
            .values()
            .filter(|article| query.matches(article))
            .cloned()
            .collect();

        articles.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use newsroom_core::domain::{ArticleChanges, NewArticle, Role, Subject};

    use super::*;

    fn article(author: &Subject, title: &str) -> Article {
        Article::new(
            author,
            NewArticle {
                title: title.to_string(),
                content: "Body".to_string(),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryArticleRepository::new();
        let author = Subject::new(Uuid::now_v7(), Role::Writer);
        let saved = repo.insert(article(&author, "First")).await.unwrap();

        let found = repo.find_by_id(saved.id).await.unwrap();
        assert_eq!(found, Some(saved.clone()));

        let duplicate = repo.insert(saved).await;
        assert!(matches!(duplicate, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_compare_and_swap_checks_status() {
        let repo = InMemoryArticleRepository::new();
        let author = Subject::new(Uuid::now_v7(), Role::Writer);
        let saved = repo.insert(article(&author, "First")).await.unwrap();
        let patch = saved.submit(Utc::now(), true).unwrap();

        let result = repo
            .compare_and_swap(saved.id, ArticleStatus::Pending, patch.clone())
            .await;
        assert!(matches!(
            result,
            Err(RepoError::StatusMismatch {
                expected: ArticleStatus::Pending,
                actual: ArticleStatus::Draft,
            })
        ));

        let swapped = repo
            .compare_and_swap(saved.id, ArticleStatus::Draft, patch.clone())
            .await
            .unwrap();
        assert_eq!(swapped.status, ArticleStatus::Pending);

        let gone = repo
            .compare_and_swap(Uuid::now_v7(), ArticleStatus::Draft, patch)
            .await;
        assert!(matches!(gone, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_compare_and_swap_only_writes_patched_fields() {
        let repo = InMemoryArticleRepository::new();
        let author = Subject::new(Uuid::now_v7(), Role::Writer);
        let saved = repo.insert(article(&author, "First")).await.unwrap();
        repo.increment_view_count(saved.id).await.unwrap();

        let submit = saved.submit(Utc::now(), true).unwrap();
        let edit = saved
            .edit(
                ArticleChanges {
                    title: Some("Edited".to_string()),
                    ..Default::default()
                },
                Utc::now() + TimeDelta::seconds(10),
            )
            .unwrap();

        let edited = repo
            .compare_and_swap(saved.id, ArticleStatus::Draft, edit)
            .await
            .unwrap();
        let submitted = repo
            .compare_and_swap(saved.id, ArticleStatus::Draft, submit)
            .await
            .unwrap();

        assert_eq!(submitted.title, "Edited");
        assert_eq!(submitted.status, ArticleStatus::Pending);
        assert_eq!(submitted.view_count, 1);
        assert_eq!(submitted.author_id, author.id);
        assert!(submitted.updated_at > edited.updated_at);
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let repo = InMemoryArticleRepository::new();
        let id = Uuid::now_v7();

        assert_eq!(repo.increment_view_count(id).await.unwrap(), None);
        assert!(matches!(repo.delete(id).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_query_orders_newest_first() {
        let repo = InMemoryArticleRepository::new();
        let author = Subject::new(Uuid::now_v7(), Role::Writer);

        let mut older = article(&author, "Older");
        older.created_at -= TimeDelta::minutes(5);
        let older = repo.insert(older).await.unwrap();
        let newer = repo.insert(article(&author, "Newer")).await.unwrap();

        let all = repo.query(&ArticleQuery::default()).await.unwrap();
        let ids: Vec<Uuid> = all.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);

        let published = repo.query(&ArticleQuery::published()).await.unwrap();
        assert!(published.is_empty());
    }
}
