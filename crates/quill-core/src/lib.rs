//! # Quill Core
//!
//! The domain layer of the Quill blogging backend.
//! This crate holds posts, slugs, the generation prompt, the editor session
//! and article rendering. It has zero infrastructure dependencies; storage and
//! the language-model API are reached through the traits in [`ports`].

pub mod domain;
pub mod editor;
pub mod error;
pub mod ports;
pub mod render;
pub mod service;

pub use error::{DomainError, RepoError};
