use async_trait::async_trait;

use crate::domain::Post;
use crate::error::DomainError;

/// Publishes posts. Implemented by the server-side post service and by the
/// HTTP client the editor uses.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Create a post from a title and content. Tags are accepted but not persisted.
    async fn create_post(
        &self,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> Result<Post, DomainError>;
}
