//! PostgreSQL article store.

use async_trait::async_trait;
use sea_orm::entity::prelude::{DateTimeWithTimeZone, Json};
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use newsroom_core::domain::{Article, ArticlePatch, ArticleStatus};
use newsroom_core::error::RepoError;
use newsroom_core::ports::{ArticleQuery, ArticleRepository};

use super::entity::article::{self, Column, Entity as ArticleEntity};

/// PostgreSQL article store.
///
/// Transitions are single conditional `UPDATE … RETURNING` statements that
/// set only the patched columns and filter on the expected status. Views are
/// counted with `view_count = view_count + 1`. The database serialises
/// concurrent writers, and every write reports the row it produced.
pub struct PostgresArticleRepository {
    db: DbConn,
}

impl PostgresArticleRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn db_err(e: DbErr) -> RepoError {
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(e.to_string()),
        other => {
            let msg = other.to_string();
            if msg.contains("duplicate") || msg.contains("unique") {
                RepoError::Constraint("Article already exists".to_string())
            } else {
                RepoError::Query(msg)
            }
        }
    }
}

/// `updated_at` for a patch, clamped so it never moves backwards.
fn update_stamp(patch: &ArticlePatch) -> SimpleExpr {
    Expr::cust_with_values(
        "GREATEST($1, updated_at + interval '1 microsecond')",
        [DateTimeWithTimeZone::from(patch.updated_at)],
    )
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, RepoError> {
        let result = ArticleEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        result.map(Article::try_from).transpose()
    }

    async fn insert(&self, article: Article) -> Result<Article, RepoError> {
        let model = article::ActiveModel::from(article)
            .insert(&self.db)
            .await
            .map_err(db_err)?;

        Article::try_from(model)
    }

    async fn compare_and_swap(
        &self,
        id: Uuid,
        expected: ArticleStatus,
        patch: ArticlePatch,
    ) -> Result<Article, RepoError> {
        let stamp = update_stamp(&patch);
        let mut update = ArticleEntity::update_many().col_expr(Column::UpdatedAt, stamp.clone());

        if let Some(title) = patch.title {
            update = update.col_expr(Column::Title, Expr::value(title));
        }
        if let Some(content) = patch.content {
            update = update.col_expr(Column::Content, Expr::value(content));
        }
        if let Some(excerpt) = patch.excerpt {
            update = update.col_expr(Column::Excerpt, Expr::value(excerpt));
        }
        if let Some(tags) = patch.tags {
            update = update.col_expr(Column::Tags, Expr::value(Json::from(tags)));
        }
        if let Some(cover_image) = patch.cover_image {
            update = update.col_expr(Column::CoverImage, Expr::value(cover_image));
        }
        if let Some(status) = patch.status {
            update = update.col_expr(Column::Status, Expr::value(status.as_str()));
        }
        if let Some(rejection_reason) = patch.rejection_reason {
            update = update.col_expr(Column::RejectionReason, Expr::value(rejection_reason));
        }
        if patch.publish {
            update = update.col_expr(Column::PublishedAt, stamp);
        }

        let written = update
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(expected.as_str()))
            .exec_with_returning(&self.db)
            .await
            .map_err(db_err)?;

        if let Some(model) = written.into_iter().next() {
            return Article::try_from(model);
        }

        // Nothing matched: tell a vanished row apart from a lost race.
        let current = self.find_by_id(id).await?.ok_or(RepoError::NotFound)?;
        tracing::debug!(article_id = %id, %expected, actual = %current.status, "Conditional update lost");
        Err(RepoError::StatusMismatch {
            expected,
            actual: current.status,
        })
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = ArticleEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<Option<Article>, RepoError> {
        let written = ArticleEntity::update_many()
            .col_expr(Column::ViewCount, Expr::col(Column::ViewCount).add(1))
            .filter(Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await
            .map_err(db_err)?;

        written.into_iter().next().map(Article::try_from).transpose()
    }

    async fn query(&self, query: &ArticleQuery) -> Result<Vec<Article>, RepoError> {
        let mut select = ArticleEntity::find();
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(author_id) = query.author_id {
            select = select.filter(Column::AuthorId.eq(author_id));
        }

        let models = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        models.into_iter().map(Article::try_from).collect()
    }
}
