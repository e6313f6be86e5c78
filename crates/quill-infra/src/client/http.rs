use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};

use quill_core::domain::{GenerationRequest, Post, slugify};
use quill_core::error::DomainError;
use quill_core::ports::{ContentGenerator, GenerationError, PostStore};
use quill_shared::ErrorResponse;
use quill_shared::dto::{
    CreatePostRequest, GenerateContentRequest, GenerateContentResponse, PostResponse,
};

/// Talks to a running API server. Implements both editor ports, so an editor
/// session can generate and publish through the same client.
#[derive(Clone)]
pub struct HttpBlogClient {
    client: Client,
    base_url: String,
}

impl HttpBlogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// The `error` member of a failure body, or the raw body when it is not a problem document.
async fn failure_message(response: Response) -> String {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorResponse>(&text)
        .map(|problem| problem.error)
        .unwrap_or(text)
}

fn into_post(response: PostResponse) -> Post {
    Post {
        id: response.id,
        title: response.title,
        slug: response.slug,
        content: response.content,
        excerpt: response.excerpt,
        created_at: response.created_at,
        updated_at: response.updated_at,
    }
}

#[async_trait]
impl ContentGenerator for HttpBlogClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            query: request.query.clone(),
            format: Some(request.format.as_str().to_string()),
        };

        let response = self
            .client
            .post(self.url("/api/generate-content"))
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body: failure_message(response).await,
            });
        }

        let generated: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        Ok(generated.content)
    }
}

#[async_trait]
impl PostStore for HttpBlogClient {
    async fn create_post(
        &self,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> Result<Post, DomainError> {
        let body = CreatePostRequest {
            title: title.to_string(),
            content: content.to_string(),
            tags: tags.to_vec(),
            published_at: Some(Utc::now().to_rfc3339()),
        };

        let response = self
            .client
            .post(self.url("/api/posts"))
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::Internal(format!("Request failed: {e}")))?;

        match response.status() {
            status if status.is_success() => {
                let created: PostResponse = response
                    .json()
                    .await
                    .map_err(|e| DomainError::Internal(format!("Invalid response: {e}")))?;
                Ok(into_post(created))
            }
            StatusCode::CONFLICT => Err(DomainError::DuplicateSlug {
                slug: slugify(title),
            }),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(DomainError::Validation(failure_message(response).await))
            }
            _ => Err(DomainError::Internal(failure_message(response).await)),
        }
    }
}
