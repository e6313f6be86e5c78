//! Content generation request and the fixed instruction prompts.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Sampling temperature used for every generation call.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Instruction sent with `format = "blog"`.
pub const BLOG_SYSTEM_PROMPT: &str = r#"You are a professional technical blog writer. Write a complete, well-structured blog post about the topic provided by the user.

The post must include:
- An introductory section that explains what the reader will learn.
- Multiple sections using several heading levels: <h1> for the post title, <h2> for sections and <h3> for subsections.
- At least one bulleted (<ul>) or numbered (<ol>) list with <li> items.
- Runnable code examples wherever the topic involves code. Wrap every example in <pre><code class="language-X"></code></pre>, where X is the language name (for example language-javascript or language-rust), and add comments inside the code that explain what each part does.
- A closing section that summarises the key points.

Formatting rules:
- Express all structure with literal HTML tags only: <h1>, <h2>, <h3>, <p>, <ul>, <ol>, <li>, <blockquote>, <pre><code class="language-X">.
- Never use markdown syntax. No #, no *, no backticks, no fenced code blocks.
- Keep paragraphs concise and scannable.
- Return only the HTML of the post body, with no surrounding commentary."#;

/// Instruction sent for every other format.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful blog post writer. Create content about the provided topic.";

/// Which instruction template a generation request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationFormat {
    /// Structured HTML blog post.
    Blog,
    /// Free-form write-up.
    #[default]
    Default,
}

impl GenerationFormat {
    /// Map a wire value to a format. Only the exact string `"blog"` selects
    /// [`GenerationFormat::Blog`]; anything else, including no value, is `Default`.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("blog") => Self::Blog,
            _ => Self::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Default => "default",
        }
    }

    /// The system-role instruction for this format.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::Blog => BLOG_SYSTEM_PROMPT,
            Self::Default => DEFAULT_SYSTEM_PROMPT,
        }
    }
}

/// A request to draft content about a topic. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub query: String,
    pub format: GenerationFormat,
}

impl GenerationRequest {
    /// Build a request, rejecting a blank topic.
    pub fn new(query: impl Into<String>, format: GenerationFormat) -> Result<Self, DomainError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(DomainError::Validation("Query is required".to_string()));
        }
        Ok(Self { query, format })
    }

    pub fn system_prompt(&self) -> &'static str {
        self.format.system_prompt()
    }
}
