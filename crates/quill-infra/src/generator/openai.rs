//! OpenAI chat-completion content generator.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use quill_core::domain::{GENERATION_TEMPERATURE, GenerationRequest};
use quill_core::ports::{ContentGenerator, GenerationError};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Configuration for the chat-completion API.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Transport-level timeout for a single request.
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Generates post HTML with one chat-completion call per request.
pub struct OpenAiContentGenerator {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiContentGenerator {
    pub fn new(config: OpenAiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ContentGenerator for OpenAiContentGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::NotConfigured("OPENAI_API_KEY is not set".to_string()))?;

        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: &request.query,
                },
            ],
            temperature: GENERATION_TEMPERATURE,
        };

        tracing::debug!(model = %self.config.model, format = request.format.as_str(), "Calling chat completion API");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(GenerationError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::{BLOG_SYSTEM_PROMPT, GenerationFormat};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator(server: &MockServer, api_key: Option<&str>) -> OpenAiContentGenerator {
        OpenAiContentGenerator::new(OpenAiConfig {
            api_key: api_key.map(String::from),
            base_url: server.uri(),
            ..OpenAiConfig::default()
        })
        .unwrap()
    }

    fn blog_request(query: &str) -> GenerationRequest {
        GenerationRequest::new(query, GenerationFormat::Blog).unwrap()
    }

    #[tokio::test]
    async fn test_sends_system_and_user_messages() {
        let server = MockServer::start().await;
        let html = "<h1>Next.js Routing</h1>\n<h2>Pages</h2>\n<pre><code class=\"language-javascript\">// app/page.js\nexport default function Page() {}</code></pre>";

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "gpt-4",
                "temperature": 0.7,
                "messages": [
                    { "role": "system", "content": BLOG_SYSTEM_PROMPT },
                    { "role": "user", "content": "Next.js routing" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    { "index": 0, "message": { "role": "assistant", "content": html } },
                    { "index": 1, "message": { "role": "assistant", "content": "second" } }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let content = generator(&server, Some("test-key"))
            .generate(&blog_request("Next.js routing"))
            .await
            .unwrap();

        assert_eq!(content, html);
        assert!(content.contains("<h2>"));
        assert!(content.contains(r#"<pre><code class="language-"#));
    }

    #[tokio::test]
    async fn test_upstream_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&server)
            .await;

        let err = generator(&server, Some("test-key"))
            .generate(&blog_request("Rust"))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Upstream { status: 500, ref body } if body == "boom"));
    }

    #[tokio::test]
    async fn test_no_choices_is_empty_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = generator(&server, Some("test-key"))
            .generate(&blog_request("Rust"))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::EmptyCompletion));
    }

    #[tokio::test]
    async fn test_garbage_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = generator(&server, Some("test-key"))
            .generate(&blog_request("Rust"))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Decode(_)));
    }

    #[tokio::test]
    async fn test_missing_api_key_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = generator(&server, None)
            .generate(&blog_request("Rust"))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::NotConfigured(_)));
    }
}
