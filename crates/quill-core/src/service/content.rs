use std::sync::Arc;

use crate::domain::{GenerationFormat, GenerationRequest};
use crate::error::DomainError;
use crate::ports::ContentGenerator;

/// Shapes generation requests and forwards them to a [`ContentGenerator`].
#[derive(Clone)]
pub struct ContentService {
    generator: Arc<dyn ContentGenerator>,
}

impl ContentService {
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self { generator }
    }

    /// Generate HTML for a topic.
    ///
    /// A blank query is rejected without contacting the generator. Upstream
    /// failures are logged here and returned as [`DomainError::Generation`].
    pub async fn generate(&self, query: &str, format: Option<&str>) -> Result<String, DomainError> {
        let request = GenerationRequest::new(query, GenerationFormat::parse(format))?;

        tracing::debug!(format = request.format.as_str(), "Generating content");

        match self.generator.generate(&request).await {
            Ok(content) => {
                tracing::info!(
                    format = request.format.as_str(),
                    bytes = content.len(),
                    "Content generated"
                );
                Ok(content)
            }
            Err(e) => {
                tracing::error!(format = request.format.as_str(), "Error generating content: {}", e);
                Err(DomainError::Generation(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::GenerationError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentGenerator for EchoGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("<h1>{}</h1><p>{}</p>", request.query, request.format.as_str()))
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl ContentGenerator for FailingGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
            Err(GenerationError::Upstream {
                status: 503,
                body: "overloaded".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_generate_passes_format() {
        let service = ContentService::new(Arc::new(EchoGenerator {
            calls: AtomicUsize::new(0),
        }));
        let html = service.generate("Rust", Some("blog")).await.unwrap();
        assert_eq!(html, "<h1>Rust</h1><p>blog</p>");

        let html = service.generate("Rust", None).await.unwrap();
        assert_eq!(html, "<h1>Rust</h1><p>default</p>");
    }

    #[tokio::test]
    async fn test_identical_requests_are_not_cached() {
        let generator = Arc::new(EchoGenerator {
            calls: AtomicUsize::new(0),
        });
        let service = ContentService::new(generator.clone());
        service.generate("Rust", Some("blog")).await.unwrap();
        service.generate("Rust", Some("blog")).await.unwrap();
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_blank_query_skips_generator() {
        let generator = Arc::new(EchoGenerator {
            calls: AtomicUsize::new(0),
        });
        let service = ContentService::new(generator.clone());
        let err = service.generate("   ", Some("blog")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_maps_to_generation_error() {
        let service = ContentService::new(Arc::new(FailingGenerator));
        let err = service.generate("Rust", Some("blog")).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Generation(GenerationError::Upstream { status: 503, .. })
        ));
    }
}
