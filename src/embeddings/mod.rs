// Embedding service clients
// Text in, fixed-length vectors out; the model must stay the same between indexing and querying

pub mod ollama;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{EmbeddingConfig, Provider};
use crate::http::JsonClient;
use crate::{AdvisorError, Result};

pub use ollama::OllamaClient;
pub use openai::OpenAiEmbeddings;

/// A remote embedding model.
///
/// Implementations make exactly one request per call and report every
/// failure as `AdvisorError::EmbeddingService`.
pub trait Embedder: Send + Sync {
    fn model(&self) -> &str;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    #[inline]
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| AdvisorError::EmbeddingService("No embedding returned".to_string()))
    }
}

/// Build the client for the configured provider
#[inline]
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    config.validate()?;

    let client = JsonClient::new(
        config.base_url()?,
        Duration::from_secs(config.timeout_seconds),
    )
    .with_api_key(config.api_key()?);

    let embedder: Arc<dyn Embedder> = match config.provider {
        Provider::Ollama => Arc::new(OllamaClient::new(client, config.model.clone())),
        Provider::OpenAi => Arc::new(OpenAiEmbeddings::new(client, config.model.clone())),
    };

    Ok(embedder)
}

/// Check that the service answered with one vector per input
pub(crate) fn ensure_count(expected: usize, vectors: &[Vec<f32>]) -> Result<()> {
    if vectors.len() != expected {
        return Err(AdvisorError::EmbeddingService(format!(
            "Mismatch between request and response counts: {} vs {}",
            expected,
            vectors.len()
        )));
    }
    Ok(())
}
