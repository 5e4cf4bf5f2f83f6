//! Application state - shared across all handlers.

use std::sync::Arc;

use newsroom_core::error::RepoError;
use newsroom_core::ports::{ArticleRepository, IdentityProvider};
use newsroom_core::services::{ArticleService, LifecyclePolicy};
use newsroom_infra::{InMemoryArticleRepository, JwtIdentityProvider};

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use newsroom_infra::PostgresArticleRepository;
#[cfg(feature = "postgres")]
use newsroom_infra::database::connect;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub articles: Arc<ArticleService>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// Fails when a database is configured but cannot be reached.
    pub async fn new(config: &AppConfig) -> Result<Self, RepoError> {
        let repo = Self::article_store(config).await?;
        let identity: Arc<dyn IdentityProvider> =
            Arc::new(JwtIdentityProvider::new(config.jwt.clone()));

        tracing::info!(policy = ?config.policy, "Application state initialized");

        Ok(Self::with_parts(repo, identity, config.policy))
    }

    pub fn with_parts(
        repo: Arc<dyn ArticleRepository>,
        identity: Arc<dyn IdentityProvider>,
        policy: LifecyclePolicy,
    ) -> Self {
        Self {
            articles: Arc::new(ArticleService::new(repo, policy)),
            identity,
        }
    }

    #[cfg(feature = "postgres")]
    async fn article_store(config: &AppConfig) -> Result<Arc<dyn ArticleRepository>, RepoError> {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Arc::new(InMemoryArticleRepository::new()));
        };

        let conn = connect(db_config).await.map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            RepoError::Connection(e.to_string())
        })?;
        Ok(Arc::new(PostgresArticleRepository::new(conn)))
    }

    #[cfg(not(feature = "postgres"))]
    async fn article_store(_config: &AppConfig) -> Result<Arc<dyn ArticleRepository>, RepoError> {
        tracing::info!("Running without postgres feature - using in-memory article store");
        Ok(Arc::new(InMemoryArticleRepository::new()))
    }
}

#[cfg(test)]
mod tests {
    use newsroom_infra::{DatabaseConfig, JwtConfig};

    use super::*;

    fn config(database: Option<DatabaseConfig>) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            database,
            jwt: JwtConfig::default(),
            policy: LifecyclePolicy::default(),
        }
    }

    #[actix_web::test]
    async fn test_in_memory_store_without_database_url() {
        assert!(AppState::new(&config(None)).await.is_ok());
    }

    #[cfg(feature = "postgres")]
    #[actix_web::test]
    async fn test_unreachable_database_is_fatal() {
        let database = DatabaseConfig {
            url: "unsupported://newsroom".to_string(),
            max_connections: 1,
            min_connections: 0,
        };

        let result = AppState::new(&config(Some(database))).await;

        assert!(matches!(result, Err(RepoError::Connection(_))));
    }
}
