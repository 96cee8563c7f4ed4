
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{Embedder, ensure_count};
use crate::http::JsonClient;
use crate::{AdvisorError, Result};

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: JsonClient,
    model: String,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub size: Option<u64>,
    pub digest: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

impl OllamaClient {
    #[inline]
    pub fn new(client: JsonClient, model: String) -> Self {
        Self { client, model }
    }

    /// Test connection to Ollama server and verify model availability
    #[inline]
    pub fn health_check(&self) -> Result<()> {
        debug!(
            "Performing health check for Ollama at {}",
            self.client.base_url()
        );

        self.validate_model()?;

        info!(
            "Health check passed for Ollama server at {} with model {}",
            self.client.base_url(),
            self.model
        );
        Ok(())
    }

    /// Validate that the configured model is available
    #[inline]
    pub fn validate_model(&self) -> Result<()> {
        debug!("Validating model: {}", self.model);

        let models = self.list_models()?;

        if models.iter().any(|m| m.name == self.model) {
            debug!("Model {} is available", self.model);
            Ok(())
        } else {
            let available_models: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
            warn!(
                "Model {} not found. Available models: {:?}",
                self.model, available_models
            );
            Err(AdvisorError::EmbeddingService(format!(
                "Model '{}' is not available. Available models: {:?}",
                self.model, available_models
            )))
        }
    }

    /// List all available models
    #[inline]
    pub fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response: ModelsResponse = self
            .client
            .get("/api/tags")
            .map_err(|e| AdvisorError::EmbeddingService(format!("Failed to list models: {}", e)))?;

        debug!("Found {} models", response.models.len());
        Ok(response.models)
    }
}

impl Embedder for OllamaClient {
    #[inline]
    fn model(&self) -> &str {
        &self.model
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating Ollama embeddings for {} texts", texts.len());

        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response: EmbedResponse = self.client.post("/api/embed", &request).map_err(|e| {
            AdvisorError::EmbeddingService(format!("Failed to generate embeddings: {}", e))
        })?;

        ensure_count(texts.len(), &response.embeddings)?;

        debug!(
            "Generated {} embeddings with {} dimensions",
            response.embeddings.len(),
            response.embeddings.first().map_or(0, Vec::len)
        );
        Ok(response.embeddings)
    }
}
