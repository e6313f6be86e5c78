//! Post handlers.

use actix_web::{HttpResponse, web};

use quill_core::domain::{Post, PostOrder};
use quill_core::ports::PostStore;
use quill_shared::dto::{CreatePostRequest, ListPostsQuery, PostResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if let Some(published_at) = &req.published_at {
        tracing::debug!(%published_at, "publishedAt supplied, creation time is used instead");
    }

    let post = state
        .posts
        .create_post(&req.title, &req.content, &req.tags)
        .await?;

    Ok(HttpResponse::Created().json(to_response(post)))
}

/// GET /api/posts?sort=latest|oldest
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let order = PostOrder::parse(query.sort.as_deref());
    let posts = state.posts.list_posts(order).await?;

    let body: Vec<PostResponse> = posts.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/{slug}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get_post(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(post)))
}

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        excerpt: post.excerpt,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}
