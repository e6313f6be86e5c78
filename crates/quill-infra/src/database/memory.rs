//! In-memory post store - used when no database is configured.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quill_core::domain::{NewPost, Post, PostOrder};
use quill_core::error::RepoError;
use quill_core::ports::PostRepository;

/// In-memory post repository using a Vec behind an async RwLock.
///
/// Enforces the same unique-slug rule as the `posts` table.
/// Note: Data is lost on process restart.
pub struct InMemoryPostRepository {
    store: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, new_post: NewPost) -> Result<Post, RepoError> {
        // Check and insert under one write lock so two inserts cannot share a slug
        let mut store = self.store.write().await;

        if store.iter().any(|p| p.slug == new_post.slug) {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates unique constraint on slug '{}'",
                new_post.slug
            )));
        }

        let id = i32::try_from(store.len() + 1)
            .map_err(|_| RepoError::Query("post id sequence exhausted".to_string()))?;
        let post = new_post.into_post(id, Utc::now());
        store.push(post.clone());

        Ok(post)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.iter().find(|p| p.slug == slug).cloned())
    }

    async fn list(&self, order: PostOrder) -> Result<Vec<Post>, RepoError> {
        let mut posts = self.store.read().await.clone();
        match order {
            PostOrder::Latest => posts.sort_by(|a, b| {
                b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
            }),
            PostOrder::Oldest => posts.sort_by(|a, b| {
                a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
            }),
        }
        Ok(posts)
    }
}
