//! HTTP handlers and route configuration.

mod articles;
mod health;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::NotFound(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Article lifecycle
            .service(
                web::scope("/articles")
                    .route("", web::get().to(articles::list_articles))
                    .route("", web::post().to(articles::create_article))
                    .route("/{id}", web::get().to(articles::get_article))
                    .route("/{id}", web::put().to(articles::update_article))
                    .route("/{id}", web::delete().to(articles::delete_article))
                    .route("/{id}/submit", web::post().to(articles::submit_article))
                    .route("/{id}/review", web::post().to(articles::review_article)),
            ),
    );
}
