//! HTTP client for the Quill API, used by the editor.

mod http;

pub use http::HttpBlogClient;
