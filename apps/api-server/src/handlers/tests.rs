use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::{App, http::StatusCode, middleware::from_fn, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use quill_core::domain::{GenerationFormat, GenerationRequest};
use quill_core::editor::{EditorSession, EditorState};
use quill_core::ports::{ContentGenerator, GenerationError};
use quill_infra::database::InMemoryPostRepository;

use crate::observability::{self, REQUEST_ID_HEADER};
use crate::state::AppState;

const BLOG_FIXTURE: &str = r#"<h1>Next.js Routing</h1>
<p>The App Router maps folders to URL segments.</p>
<h2>Defining routes</h2>
<ul><li>page.tsx</li><li>layout.tsx</li></ul>
<pre><code class="language-tsx">// app/blog/page.tsx
export default function Page() { return <h1>Blog</h1>; }
</code></pre>
<h2>Conclusion</h2>
<p>Routing is file based.</p>"#;

struct StubGenerator {
    fail: bool,
    calls: AtomicUsize,
}

impl StubGenerator {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ContentGenerator for StubGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GenerationError::Upstream {
                status: 503,
                body: "overloaded".to_string(),
            });
        }
        match request.format {
            GenerationFormat::Blog => Ok(BLOG_FIXTURE.to_string()),
            GenerationFormat::Default => Ok(format!("<p>{}</p>", request.query)),
        }
    }
}

fn state_with(generator: Arc<StubGenerator>) -> AppState {
    AppState::from_parts(Arc::new(InMemoryPostRepository::new()), generator)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(from_fn(observability::request_id))
                .app_data(web::Data::new($state))
                .app_data(super::json_config())
                .configure(super::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_check() {
    let app = app!(state_with(StubGenerator::ok()));

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn test_request_id_is_echoed() {
    let app = app!(state_with(StubGenerator::ok()));

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header((REQUEST_ID_HEADER, "req-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "req-42");

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
}

#[actix_web::test]
async fn test_generate_blog_content() {
    let generator = StubGenerator::ok();
    let app = app!(state_with(generator.clone()));

    let req = test::TestRequest::post()
        .uri("/api/generate-content")
        .set_json(json!({"query": "Next.js routing", "format": "blog"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let content = body["content"].as_str().unwrap();
    assert!(content.contains("<h2>"));
    assert!(content.contains(r#"<pre><code class="language-"#));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn test_generate_failure_has_error_and_no_content() {
    let app = app!(state_with(StubGenerator::failing()));

    let req = test::TestRequest::post()
        .uri("/api/generate-content")
        .set_json(json!({"query": "Next.js routing", "format": "blog"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to generate content");
    assert!(body.get("content").is_none());
    assert!(!body.to_string().contains("overloaded"));
}

#[actix_web::test]
async fn test_generate_blank_query_is_rejected() {
    let generator = StubGenerator::ok();
    let app = app!(state_with(generator.clone()));

    let req = test::TestRequest::post()
        .uri("/api/generate-content")
        .set_json(json!({"query": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_malformed_body_is_problem_document() {
    let app = app!(state_with(StubGenerator::ok()));

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn test_create_and_fetch_post() {
    let app = app!(state_with(StubGenerator::ok()));

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({
            "title": "Hello, World!",
            "content": "<p>First post</p>",
            "tags": ["intro"],
            "publishedAt": "2025-03-10T00:00:00Z"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["slug"], "hello-world");
    assert!(created["id"].is_number());
    assert!(created["createdAt"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/posts/hello-world")
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["content"], "<p>First post</p>");
}

#[actix_web::test]
async fn test_duplicate_slug_is_conflict() {
    let app = app!(state_with(StubGenerator::ok()));

    for (title, expected) in [
        ("Rust Tips", StatusCode::CREATED),
        ("rust tips!", StatusCode::CONFLICT),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({"title": title, "content": "<p>x</p>"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected);
    }

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let posts: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts.len(), 1);
}

#[actix_web::test]
async fn test_empty_title_is_unprocessable() {
    let app = app!(state_with(StubGenerator::ok()));

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({"title": "", "content": "<p>x</p>"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn test_list_posts_sorting() {
    let app = app!(state_with(StubGenerator::ok()));

    for title in ["First", "Second"] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({"title": title, "content": "<p>x</p>"}))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let latest: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(latest[0]["slug"], "second");

    let req = test::TestRequest::get()
        .uri("/api/posts?sort=oldest")
        .to_request();
    let oldest: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(oldest[0]["slug"], "first");
}

#[actix_web::test]
async fn test_missing_post_is_not_found() {
    let app = app!(state_with(StubGenerator::ok()));

    let req = test::TestRequest::get().uri("/api/posts/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/posts/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_article_page_renders_html() {
    let app = app!(state_with(StubGenerator::ok()));

    for (title, content) in [
        ("Next.js routing", BLOG_FIXTURE),
        ("Server actions", "<p>Mutations</p>"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({"title": title, "content": content}))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/posts/nextjs-routing")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );

    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains(r#"id="defining-routes""#));
    assert!(html.contains("Back to all articles"));
    assert!(html.contains("Table of Contents"));
    assert!(html.contains("Next Article"));
    assert!(html.contains(r#"<a href="/posts/server-actions""#));
    assert!(!html.contains("Previous Article"));

    let req = test::TestRequest::get().uri("/posts").to_request();
    let index = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    assert!(index.contains(r#"href="/posts/nextjs-routing""#));
}

#[actix_web::test]
async fn test_compose_and_publish_flow() {
    let generator = StubGenerator::ok();
    let state = state_with(generator.clone());
    let app = app!(state.clone());

    let mut session = EditorSession::new();
    session.set_topic("Next.js routing");
    assert_eq!(session.generate(generator.as_ref()).await, EditorState::Editable);
    assert!(session.document().contains("<h2>"));
    assert_eq!(session.title(), "Next.js Routing");

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({"title": session.title(), "content": session.document()}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created["slug"], "nextjs-routing");

    // Publishing the same draft again must not create a second row
    assert_eq!(session.publish(&state.posts).await, EditorState::Error);

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let posts: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts.len(), 1);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}
