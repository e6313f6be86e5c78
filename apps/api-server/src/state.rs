//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{ContentGenerator, PostRepository};
use quill_core::service::{ContentService, PostService};
use quill_infra::database::InMemoryPostRepository;
use quill_infra::generator::OpenAiContentGenerator;

#[cfg(feature = "postgres")]
use quill_infra::database::{PostgresPostRepository, connect};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub content: ContentService,
}

impl AppState {
    /// Wire the services over explicit adapters.
    pub fn from_parts(
        repo: Arc<dyn PostRepository>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            posts: PostService::new(repo),
            content: ContentService::new(generator),
        }
    }

    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        if config.openai.api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set. Content generation requests will fail.");
        }
        let generator = OpenAiContentGenerator::new(config.openai.clone())
            .map_err(std::io::Error::other)?;
        tracing::info!(model = %generator.model(), "Content generator ready");

        // Initialize the post store if a database is configured
        #[cfg(feature = "postgres")]
        let repo: Arc<dyn PostRepository> = match &config.database {
            Some(db_config) => match connect(db_config).await {
                Ok(conn) => Arc::new(PostgresPostRepository::new(conn)),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Arc::new(InMemoryPostRepository::new())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Arc::new(InMemoryPostRepository::new())
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repo: Arc<dyn PostRepository> = {
            if config.database.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory repository");
            Arc::new(InMemoryPostRepository::new())
        };

        tracing::info!("Application state initialized");

        Ok(Self::from_parts(repo, Arc::new(generator)))
    }
}
