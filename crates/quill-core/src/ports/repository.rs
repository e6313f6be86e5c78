use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostOrder};
use crate::error::RepoError;

/// Post repository. Create-only: there is no update or delete.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post and return the stored row with its assigned id.
    ///
    /// A slug that already exists must fail with [`RepoError::Constraint`]
    /// and leave the existing row untouched.
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Find a post by its slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// List all posts in the given order.
    async fn list(&self, order: PostOrder) -> Result<Vec<Post>, RepoError>;
}
