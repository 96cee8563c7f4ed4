
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Embedder, ensure_count};
use crate::http::JsonClient;
use crate::{AdvisorError, Result};

/// OpenAI-compatible `/v1/embeddings` client
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddings {
    client: JsonClient,
    model: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbeddings {
    #[inline]
    pub fn new(client: JsonClient, model: String) -> Self {
        Self { client, model }
    }
}

impl Embedder for OpenAiEmbeddings {
    #[inline]
    fn model(&self) -> &str {
        &self.model
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Requesting {} embeddings from {}", texts.len(), self.model);

        let request = EmbeddingsRequest {
            model: &self.model,
            input: texts,
        };

        let mut response: EmbeddingsResponse =
            self.client.post("/v1/embeddings", &request).map_err(|e| {
                AdvisorError::EmbeddingService(format!("Failed to generate embeddings: {}", e))
            })?;

        // Order by `index`, not by response position
        response.data.sort_by_key(|item| item.index);
        let vectors: Vec<Vec<f32>> = response
            .data
            .into_iter()
            .map(|item| item.embedding)
            .collect();

        ensure_count(texts.len(), &vectors)?;
        Ok(vectors)
    }
}
