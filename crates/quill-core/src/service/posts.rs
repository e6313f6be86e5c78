use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostOrder};
use crate::error::{DomainError, RepoError};
use crate::ports::{PostRepository, PostStore};

/// Creates and reads posts on top of a [`PostRepository`].
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    /// Fetch a single post by slug.
    pub async fn get_post(&self, slug: &str) -> Result<Post, DomainError> {
        self.repo
            .find_by_slug(slug)
            .await
            .map_err(internal)?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Post",
                key: slug.to_string(),
            })
    }

    pub async fn list_posts(&self, order: PostOrder) -> Result<Vec<Post>, DomainError> {
        self.repo.list(order).await.map_err(internal)
    }
}

#[async_trait]
impl PostStore for PostService {
    async fn create_post(
        &self,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> Result<Post, DomainError> {
        let new_post = NewPost::from_draft(title, content)?;
        let slug = new_post.slug.clone();

        if !tags.is_empty() {
            tracing::debug!(slug = %slug, ?tags, "Tags are not persisted, ignoring");
        }

        match self.repo.insert(new_post).await {
            Ok(post) => {
                tracing::info!(post_id = post.id, slug = %post.slug, "Post created");
                Ok(post)
            }
            Err(RepoError::Constraint(msg)) => {
                tracing::warn!(slug = %slug, "Slug already taken: {}", msg);
                Err(DomainError::DuplicateSlug { slug })
            }
            Err(e) => Err(internal(e)),
        }
    }
}

fn internal(err: RepoError) -> DomainError {
    tracing::error!("Post repository error: {}", err);
    DomainError::Internal(err.to_string())
}
