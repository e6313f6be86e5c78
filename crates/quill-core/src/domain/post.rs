use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::slug::slugify;
use crate::error::DomainError;

/// Maximum length of a post title, in characters.
pub const TITLE_MAX_LEN: usize = 256;
/// Maximum length of a post slug, in characters.
pub const SLUG_MAX_LEN: usize = 256;

/// Post entity - a published blog article.
///
/// Posts are create-only: once stored they are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated post that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
}

impl NewPost {
    /// Validate a title/content pair and derive the slug from the title.
    pub fn from_draft(
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        let content = content.into();

        if title.trim().is_empty() {
            return Err(DomainError::Validation("Title is required".to_string()));
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "Title must be at most {TITLE_MAX_LEN} characters"
            )));
        }
        if content.trim().is_empty() {
            return Err(DomainError::Validation("Content is required".to_string()));
        }

        let slug = slugify(&title);
        if slug.is_empty() {
            return Err(DomainError::Validation(
                "Title must contain at least one letter or digit".to_string(),
            ));
        }
        if slug.len() > SLUG_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "Slug must be at most {SLUG_MAX_LEN} characters"
            )));
        }

        Ok(Self {
            title,
            slug,
            content,
            excerpt: None,
        })
    }

    /// Attach the assigned id and timestamps, producing the stored form.
    pub fn into_post(self, id: i32, created_at: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            slug: self.slug,
            content: self.content,
            excerpt: self.excerpt,
            created_at,
            updated_at: created_at,
        }
    }
}

/// Ordering for post listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostOrder {
    /// Newest first.
    #[default]
    Latest,
    /// Oldest first.
    Oldest,
}

impl PostOrder {
    /// Parse a `sort` query value; unknown values fall back to [`PostOrder::Latest`].
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("oldest") => Self::Oldest,
            _ => Self::Latest,
        }
    }
}
