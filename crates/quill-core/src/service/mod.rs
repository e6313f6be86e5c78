//! Application services - orchestrate ports into the two core operations.

mod content;
mod posts;

pub use content::ContentService;
pub use posts::PostService;
