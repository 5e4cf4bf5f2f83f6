use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use newsroom_core::domain::{ArticlePatch, ArticleStatus};
use newsroom_core::error::RepoError;
use newsroom_core::ports::{ArticleQuery, ArticleRepository};

use crate::database::entity::article;
use crate::database::postgres_repo::PostgresArticleRepository;

fn model(id: Uuid, status: &str, view_count: i64) -> article::Model {
    let now = Utc::now();
    article::Model {
        id,
        title: "Zero-copy parsing".to_owned(),
        content: "Content".to_owned(),
        excerpt: "Content".to_owned(),
        tags: serde_json::json!(["rust", "parsing"]),
        cover_image: None,
        author_id: Uuid::now_v7(),
        author_name: "ada".to_owned(),
        status: status.to_owned(),
        view_count,
        rejection_reason: None,
        published_at: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

#[tokio::test]
async fn test_find_article_by_id() {
    let id = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model(id, "draft", 3)]])
        .into_connection();
    let repo = PostgresArticleRepository::new(db);

    let article = repo.find_by_id(id).await.unwrap().unwrap();

    assert_eq!(article.id, id);
    assert_eq!(article.status, ArticleStatus::Draft);
    assert_eq!(article.view_count, 3);
    assert_eq!(article.tags, vec!["rust".to_string(), "parsing".to_string()]);
}

#[tokio::test]
async fn test_unknown_status_is_a_query_error() {
    let id = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model(id, "archived", 0)]])
        .into_connection();
    let repo = PostgresArticleRepository::new(db);

    assert!(matches!(repo.find_by_id(id).await, Err(RepoError::Query(_))));
}

fn approval() -> ArticlePatch {
    let mut patch = ArticlePatch::at(Utc::now());
    patch.status = Some(ArticleStatus::Published);
    patch.publish = true;
    patch
}

#[tokio::test]
async fn test_compare_and_swap_returns_the_row_it_wrote() {
    let id = Uuid::now_v7();
    let mut written = model(id, "published", 4);
    written.content = "Edited while pending".to_owned();

    // A single result set: a follow-up read would hit an empty mock buffer.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![written]])
        .into_connection();
    let repo = PostgresArticleRepository::new(db);

    let article = repo
        .compare_and_swap(id, ArticleStatus::Pending, approval())
        .await
        .unwrap();

    assert_eq!(article.status, ArticleStatus::Published);
    assert_eq!(article.content, "Edited while pending");
    assert_eq!(article.view_count, 4);
}

#[tokio::test]
async fn test_compare_and_swap_reports_lost_race() {
    let id = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<article::Model>::new(), vec![model(id, "rejected", 0)]])
        .into_connection();
    let repo = PostgresArticleRepository::new(db);

    let result = repo
        .compare_and_swap(id, ArticleStatus::Pending, approval())
        .await;

    assert!(matches!(
        result,
        Err(RepoError::StatusMismatch {
            expected: ArticleStatus::Pending,
            actual: ArticleStatus::Rejected,
        })
    ));
}

#[tokio::test]
async fn test_compare_and_swap_on_missing_article() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<article::Model>::new(), Vec::<article::Model>::new()])
        .into_connection();
    let repo = PostgresArticleRepository::new(db);

    let result = repo
        .compare_and_swap(Uuid::now_v7(), ArticleStatus::Pending, approval())
        .await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_increment_view_count() {
    let id = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model(id, "published", 8)], Vec::new()])
        .into_connection();
    let repo = PostgresArticleRepository::new(db);

    let counted = repo.increment_view_count(id).await.unwrap().unwrap();
    assert_eq!(counted.view_count, 8);

    let missing = repo.increment_view_count(Uuid::now_v7()).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_negative_view_count_is_a_query_error() {
    let id = Uuid::now_v7();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![model(id, "published", -1)]])
        .into_connection();
    let repo = PostgresArticleRepository::new(db);

    assert!(matches!(repo.find_by_id(id).await, Err(RepoError::Query(_))));
}

#[tokio::test]
async fn test_delete_missing_article() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec(0)])
        .into_connection();
    let repo = PostgresArticleRepository::new(db);

    assert!(matches!(
        repo.delete(Uuid::now_v7()).await,
        Err(RepoError::NotFound)
    ));
}

#[tokio::test]
async fn test_query_maps_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            model(Uuid::now_v7(), "published", 1),
            model(Uuid::now_v7(), "published", 2),
        ]])
        .into_connection();
    let repo = PostgresArticleRepository::new(db);

    let articles = repo.query(&ArticleQuery::published()).await.unwrap();

    assert_eq!(articles.len(), 2);
    assert!(articles.iter().all(|a| a.status == ArticleStatus::Published));
}
