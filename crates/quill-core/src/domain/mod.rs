//! Domain entities - the core business objects.

mod generation;
mod post;
mod slug;

pub use generation::{
    BLOG_SYSTEM_PROMPT, DEFAULT_SYSTEM_PROMPT, GENERATION_TEMPERATURE, GenerationFormat,
    GenerationRequest,
};
pub use post::{NewPost, Post, PostOrder, SLUG_MAX_LEN, TITLE_MAX_LEN};
pub use slug::slugify;
