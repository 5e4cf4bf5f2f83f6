//! Article lifecycle handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use newsroom_core::domain::{Article, ArticleChanges, ArticleStatus, NewArticle, ReviewDecision};
use newsroom_core::services::ListFilter;
use newsroom_shared::ApiResponse;
use newsroom_shared::dto::{
    ArticleResponse, CreateArticleRequest, ListArticlesQuery, ReviewAction, ReviewArticleRequest,
    UpdateArticleRequest,
};

use crate::middleware::auth::Caller;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_response(article: Article) -> ArticleResponse {
    ArticleResponse {
        id: article.id.to_string(),
        title: article.title,
        content: article.content,
        excerpt: article.excerpt,
        tags: article.tags,
        cover_image: article.cover_image,
        author_id: article.author_id.to_string(),
        author_name: article.author_name,
        status: article.status.to_string(),
        view_count: article.view_count,
        rejection_reason: article.rejection_reason,
        published_at: article.published_at.map(|at| at.to_rfc3339()),
        created_at: article.created_at.to_rfc3339(),
        updated_at: article.updated_at.to_rfc3339(),
    }
}

/// GET /api/articles?status=&mine=
pub async fn list_articles(
    state: web::Data<AppState>,
    caller: Caller,
    query: web::Query<ListArticlesQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let status = query
        .status
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<ArticleStatus>())
        .transpose()
        .map_err(AppError::BadRequest)?;

    let filter = ListFilter {
        status,
        owner_only: query.mine,
    };
    let articles = state.articles.list_articles(caller.subject(), filter).await?;

    let body: Vec<ArticleResponse> = articles.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/articles
pub async fn create_article(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<CreateArticleRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let draft = NewArticle {
        title: req.title,
        content: req.content,
        excerpt: req.excerpt,
        tags: req.tags,
        cover_image: req.cover_image,
    };

    let article = state.articles.create_article(caller.subject(), draft).await?;
    Ok(HttpResponse::Created().json(to_response(article)))
}

/// GET /api/articles/{id} - counts a view
pub async fn get_article(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let article = state
        .articles
        .get_article(caller.subject(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(to_response(article)))
}

/// PUT /api/articles/{id}
pub async fn update_article(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
    body: web::Json<UpdateArticleRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = ArticleChanges {
        title: req.title,
        content: req.content,
        excerpt: req.excerpt,
        tags: req.tags,
        cover_image: req.cover_image,
    };

    let article = state
        .articles
        .update_article(caller.subject(), path.into_inner(), changes)
        .await?;
    Ok(HttpResponse::Ok().json(to_response(article)))
}

/// DELETE /api/articles/{id} - admin only
pub async fn delete_article(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .articles
        .delete_article(caller.subject(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::done("Article deleted")))
}

/// POST /api/articles/{id}/submit
pub async fn submit_article(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let article = state
        .articles
        .submit_article(caller.subject(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        to_response(article),
        "Article submitted for review",
    )))
}

/// POST /api/articles/{id}/review - admin only
pub async fn review_article(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
    body: web::Json<ReviewArticleRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let decision = match req.action {
        ReviewAction::Approve => ReviewDecision::Approve,
        ReviewAction::Reject => ReviewDecision::Reject {
            reason: req.rejection_reason.unwrap_or_default(),
        },
    };

    let article = state
        .articles
        .review_article(caller.subject(), path.into_inner(), decision)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_response(article))))
}
