//! Error response type (RFC 7807 problem details with an `error` member).

use serde::{Deserialize, Serialize};

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
///
/// The `error` extension member always carries a short message that is safe
/// to show to the author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// User-visible failure message.
    pub error: String,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            error: error.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    // Common error constructors
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(400, "Bad Request", error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(404, "Not Found", error)
    }

    pub fn conflict(error: impl Into<String>) -> Self {
        Self::new(409, "Conflict", error)
    }

    pub fn unprocessable(error: impl Into<String>) -> Self {
        Self::new(422, "Validation Failed", error)
    }

    pub fn internal_error(error: impl Into<String>) -> Self {
        Self::new(500, "Internal Server Error", error)
    }
}
