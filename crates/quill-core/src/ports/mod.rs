//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod generator;
mod repository;
mod store;

pub use generator::{ContentGenerator, GenerationError};
pub use repository::PostRepository;
pub use store::PostStore;
