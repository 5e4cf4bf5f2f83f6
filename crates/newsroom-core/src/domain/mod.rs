//! Domain entities - the core business objects.

mod article;
mod subject;

pub use article::{
    Article, ArticleChanges, ArticlePatch, ArticleStatus, EXCERPT_LENGTH, NewArticle,
    ReviewDecision,
};
pub use subject::{Role, Subject};
