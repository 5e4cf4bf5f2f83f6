//! Article entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use newsroom_core::domain::Article;
use newsroom_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text")]
    pub excerpt: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,
    pub cover_image: Option<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub status: String,
    pub view_count: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Article.
impl TryFrom<Model> for Article {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status = model.status.parse().map_err(RepoError::Query)?;
        let tags: Vec<String> =
            serde_json::from_value(model.tags).map_err(|e| RepoError::Query(e.to_string()))?;
        let view_count = u64::try_from(model.view_count)
            .map_err(|_| RepoError::Query(format!("negative view count {}", model.view_count)))?;

        Ok(Self {
            id: model.id,
            title: model.title,
            content: model.content,
            excerpt: model.excerpt,
            tags,
            cover_image: model.cover_image,
            author_id: model.author_id,
            author_name: model.author_name,
            status,
            view_count,
            rejection_reason: model.rejection_reason,
            published_at: model.published_at.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

/// Conversion from Domain Article to SeaORM ActiveModel.
impl From<Article> for ActiveModel {
    fn from(article: Article) -> Self {
        Self {
            id: Set(article.id),
            title: Set(article.title),
            content: Set(article.content),
            excerpt: Set(article.excerpt),
            tags: Set(Json::from(article.tags)),
            cover_image: Set(article.cover_image),
            author_id: Set(article.author_id),
            author_name: Set(article.author_name),
            status: Set(article.status.as_str().to_string()),
            view_count: Set(i64::try_from(article.view_count).unwrap_or(i64::MAX)),
            rejection_reason: Set(article.rejection_reason),
            published_at: Set(article.published_at.map(Into::into)),
            created_at: Set(article.created_at.into()),
            updated_at: Set(article.updated_at.into()),
        }
    }
}
