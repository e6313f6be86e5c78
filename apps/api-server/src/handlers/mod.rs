//! HTTP handlers and route configuration.

mod generate;
mod health;
mod pages;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::{HttpResponse, error::InternalError, web};
use quill_shared::ErrorResponse;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/generate-content", web::post().to(generate::generate_content))
            // Post routes
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/{slug}", web::get().to(posts::get_post)),
            ),
    )
    // Rendered pages
    .route("/posts", web::get().to(pages::index))
    .route("/posts/{slug}", web::get().to(pages::article));
}

/// JSON extractor config: malformed bodies become problem documents.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!("Rejected request body: {}", err);
        let body = ErrorResponse::bad_request("Invalid request body").with_detail(err.to_string());
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    })
}
