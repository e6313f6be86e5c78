//! Error handling - RFC 7807 responses with a user-facing `error` member.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_core::error::DomainError;
use quill_shared::ErrorResponse;
use std::fmt;

/// Message returned for every failed generation, whatever the cause.
pub const GENERATION_FAILED: &str = "Failed to generate content";

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Validation(String),
    Generation(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Generation(msg) => write!(f, "Generation failed: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Generation(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(msg) => ErrorResponse::not_found(msg),
            AppError::BadRequest(msg) => ErrorResponse::bad_request(msg),
            AppError::Conflict(msg) => ErrorResponse::conflict(msg),
            AppError::Validation(msg) => ErrorResponse::unprocessable(msg),
            // Causes are logged where they occur and never leave the server
            AppError::Generation(_) => ErrorResponse::internal_error(GENERATION_FAILED),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error("Something went wrong")
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} '{}' not found", entity_type, key))
            }
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::DuplicateSlug { .. } => {
                AppError::Conflict("A post with this title already exists".to_string())
            }
            DomainError::Generation(e) => AppError::Generation(e.to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use quill_core::ports::GenerationError;

    #[actix_web::test]
    async fn test_generation_error_hides_cause() {
        let err: AppError = DomainError::Generation(GenerationError::Upstream {
            status: 401,
            body: "invalid api key sk-123".to_string(),
        })
        .into();

        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], GENERATION_FAILED);
        assert!(json.get("content").is_none());
        assert!(!String::from_utf8_lossy(&body).contains("sk-123"));
    }

    #[test]
    fn test_domain_error_statuses() {
        let cases = [
            (
                DomainError::Validation("Title is required".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DomainError::DuplicateSlug {
                    slug: "a".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                DomainError::NotFound {
                    entity_type: "Post",
                    key: "a".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::Internal("db down".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }
}
