//! Editor session - the orchestration behind the authoring form.
//!
//! A session collects a topic, asks a [`ContentGenerator`] for a draft, lets
//! the author edit it and publishes it through a [`PostStore`]. Each action
//! issues at most one call and awaits it before the next transition.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{GenerationFormat, GenerationRequest, Post};
use crate::error::DomainError;
use crate::ports::{ContentGenerator, PostStore};
use crate::render::{escape_html, strip_tags};

/// Document shown after a successful publish.
pub const PUBLISHED_MESSAGE: &str = "<p>Post published successfully!</p>";

/// Maximum length of a title derived from generated content.
pub const DRAFT_TITLE_MAX_CHARS: usize = 50;

static MARKDOWN_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#+\s+").expect("heading marker pattern is valid"));

static BLOCK_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(?:h[1-6]|p|div|li|ul|ol|blockquote|pre|section|header)\s*>|<br\s*/?>")
        .expect("block end pattern is valid")
});

static HTTP_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://").expect("url pattern is valid"));

static YOUTUBE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://(?:www\.|m\.)?(?:youtube\.com/(?:watch\?(?:.*&)?v=|embed/|shorts/)|youtu\.be/)([A-Za-z0-9_-]{6,})",
    )
    .expect("youtube pattern is valid")
});

/// Where the session is in the generate/publish flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    Generating,
    Editable,
    Publishing,
    Published,
    Error,
}

/// Visibility and contents of the inline link/image/video inputs.
///
/// These are independent flags, not a state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineInputs {
    pub show_link_input: bool,
    pub show_image_input: bool,
    pub show_video_input: bool,
    pub link_url: String,
    pub image_url: String,
    /// Alt text for the image, shown as its caption when rendered.
    pub image_alt: String,
    pub video_url: String,
}

/// One authoring session.
#[derive(Debug, Default)]
pub struct EditorSession {
    state: EditorState,
    topic: String,
    title: String,
    document: String,
    last_error: Option<String>,
    published: Option<Post>,
    pub inputs: InlineInputs,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The document as HTML.
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Short user-facing message from the last failed action.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The post created by the last successful publish.
    pub fn published(&self) -> Option<&Post> {
        self.published.as_ref()
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the document with hand-edited HTML.
    pub fn set_document(&mut self, html: impl Into<String>) {
        self.document = html.into();
        if self.state == EditorState::Idle {
            self.state = EditorState::Editable;
        }
    }

    /// The document's visible text.
    pub fn text(&self) -> String {
        strip_tags(&self.document).trim().to_string()
    }

    /// Whether the author can still change the document.
    pub fn is_editable(&self) -> bool {
        !matches!(
            self.state,
            EditorState::Generating | EditorState::Publishing
        )
    }

    pub fn can_generate(&self) -> bool {
        self.is_editable() && !self.topic.trim().is_empty()
    }

    pub fn can_publish(&self) -> bool {
        self.is_editable() && !self.title.trim().is_empty() && !self.text().is_empty()
    }

    /// Draft a post for the current topic.
    ///
    /// Does nothing when the topic is blank. On success the generated HTML
    /// replaces the document and, if no title was typed, a draft title is
    /// taken from its first line. On failure the document is left as it was.
    pub async fn generate(&mut self, generator: &dyn ContentGenerator) -> EditorState {
        if !self.can_generate() {
            return self.state;
        }
        let Ok(request) = GenerationRequest::new(self.topic.clone(), GenerationFormat::Blog) else {
            return self.state;
        };

        self.state = EditorState::Generating;
        match generator.generate(&request).await {
            Ok(html) => {
                if self.title.trim().is_empty() {
                    self.title = draft_title(&html);
                }
                self.document = html;
                self.last_error = None;
                self.state = EditorState::Editable;
            }
            Err(e) => {
                tracing::warn!("Error generating content: {}", e);
                self.last_error = Some("Failed to generate content".to_string());
                self.state = EditorState::Error;
            }
        }
        self.state
    }

    /// Publish the document under the current title.
    ///
    /// Does nothing without a title and some document text. On success the
    /// topic and title are cleared and the document shows a confirmation.
    /// On failure everything the author typed is kept.
    pub async fn publish(&mut self, store: &dyn PostStore) -> EditorState {
        if !self.can_publish() {
            return self.state;
        }

        self.state = EditorState::Publishing;
        match store.create_post(&self.title, &self.document, &[]).await {
            Ok(post) => {
                self.topic.clear();
                self.title.clear();
                self.document = PUBLISHED_MESSAGE.to_string();
                self.published = Some(post);
                self.last_error = None;
                self.state = EditorState::Published;
            }
            Err(e) => {
                tracing::warn!("Error publishing post: {}", e);
                self.last_error = Some(publish_failure_message(&e));
                self.state = EditorState::Error;
            }
        }
        self.state
    }

    pub fn toggle_link_input(&mut self) {
        self.inputs.show_link_input = !self.inputs.show_link_input;
    }

    pub fn toggle_image_input(&mut self) {
        self.inputs.show_image_input = !self.inputs.show_image_input;
    }

    pub fn toggle_video_input(&mut self) {
        self.inputs.show_video_input = !self.inputs.show_video_input;
    }

    /// Append a link built from the link input. Only `http(s)` URLs are accepted.
    pub fn insert_link(&mut self) -> bool {
        let url = self.inputs.link_url.trim().to_string();
        if url.is_empty() || !HTTP_URL_RE.is_match(&url) {
            return false;
        }
        let url = escape_html(&url);
        self.append(&format!(r#"<p><a href="{url}">{url}</a></p>"#));
        self.inputs.link_url.clear();
        self.inputs.show_link_input = false;
        true
    }

    /// Append an image from the image input.
    pub fn insert_image(&mut self) -> bool {
        let url = self.inputs.image_url.trim().to_string();
        if url.is_empty() {
            return false;
        }
        let alt = self.inputs.image_alt.trim();
        let html = if alt.is_empty() {
            format!(r#"<img src="{}" />"#, escape_html(&url))
        } else {
            format!(r#"<img src="{}" alt="{}" />"#, escape_html(&url), escape_html(alt))
        };
        self.append(&html);
        self.inputs.image_url.clear();
        self.inputs.image_alt.clear();
        self.inputs.show_image_input = false;
        true
    }

    /// Append a privacy-enhanced YouTube embed from the video input.
    pub fn insert_video(&mut self) -> bool {
        let Some(embed) = youtube_embed_url(self.inputs.video_url.trim()) else {
            return false;
        };
        self.append(&format!(
            r#"<div data-youtube-video=""><iframe src="{embed}" width="640" height="480" allowfullscreen="true"></iframe></div>"#
        ));
        self.inputs.video_url.clear();
        self.inputs.show_video_input = false;
        true
    }

    fn append(&mut self, html: &str) {
        if self.document == PUBLISHED_MESSAGE {
            self.document.clear();
        }
        self.document.push_str(html);
        if self.state == EditorState::Idle || self.state == EditorState::Published {
            self.state = EditorState::Editable;
        }
    }
}

/// Derive a draft title from generated content: the first non-blank line,
/// without a markdown heading marker or tags, truncated to 50 characters.
///
/// The end of a block element counts as a line break, so a heading followed
/// by a paragraph on the same line still yields only the heading.
pub fn draft_title(content: &str) -> String {
    BLOCK_END_RE
        .replace_all(content, "\n")
        .lines()
        .map(|line| strip_tags(&MARKDOWN_HEADING_RE.replace(line.trim(), "")).trim().to_string())
        .find(|line| !line.is_empty())
        .map(|line| line.chars().take(DRAFT_TITLE_MAX_CHARS).collect())
        .unwrap_or_default()
}

/// `youtube-nocookie.com` embed URL for a YouTube watch/short/share link.
pub fn youtube_embed_url(url: &str) -> Option<String> {
    YOUTUBE_ID_RE
        .captures(url)
        .map(|caps| format!("https://www.youtube-nocookie.com/embed/{}", &caps[1]))
}

fn publish_failure_message(err: &DomainError) -> String {
    match err {
        DomainError::DuplicateSlug { .. } => "A post with this title already exists".to_string(),
        DomainError::Validation(msg) => msg.clone(),
        _ => "Failed to publish post".to_string(),
    }
}
