//! Content generation handler.

use actix_web::{HttpResponse, web};

use quill_core::error::DomainError;
use quill_shared::dto::{GenerateContentRequest, GenerateContentResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/generate-content
pub async fn generate_content(
    state: web::Data<AppState>,
    body: web::Json<GenerateContentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let content = state
        .content
        .generate(&req.query, req.format.as_deref())
        .await
        .map_err(|e| match e {
            // A blank query is a malformed request, not a content problem
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            other => other.into(),
        })?;

    Ok(HttpResponse::Ok().json(GenerateContentResponse { content }))
}
