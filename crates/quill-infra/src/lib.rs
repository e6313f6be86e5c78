//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the post store, the language-model client and the
//! HTTP client the editor uses to reach the API server.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory store only
//! - `postgres` - PostgreSQL post store via SeaORM
//! - `openai` - OpenAI chat-completion content generator
//! - `client` - HTTP client for the Quill API

pub mod database;

#[cfg(feature = "openai")]
pub mod generator;

#[cfg(feature = "client")]
pub mod client;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryPostRepository};

#[cfg(feature = "postgres")]
pub use database::PostgresPostRepository;

#[cfg(feature = "openai")]
pub use generator::{OpenAiConfig, OpenAiContentGenerator};

#[cfg(feature = "client")]
pub use client::HttpBlogClient;
