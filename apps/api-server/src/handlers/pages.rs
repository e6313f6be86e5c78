//! Server-rendered article pages.

use actix_web::{HttpResponse, http::header::ContentType, web};

use quill_core::domain::PostOrder;
use quill_core::render::{Neighbours, render_article, render_index};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /posts
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_posts(PostOrder::Latest).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_index(&posts)))
}

/// GET /posts/{slug}
pub async fn article(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_post(&path.into_inner()).await?;
    let posts = state.posts.list_posts(PostOrder::Latest).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_article(&post, Neighbours::within(&posts, &post.slug))))
}
