// Retriever module
// Query text in, top-K stored sentences out


use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::debug;

use crate::Result;
use crate::database::lancedb::{ScoredPayload, VectorStore};
use crate::embeddings::Embedder;

/// Context handed to the agent when nothing similar has been indexed
pub const NO_RESULTS: &str = "No relevant historical data found.";

/// Hits from one similarity search, most similar first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievalResult {
    pub hits: Vec<ScoredPayload>,
}

impl RetrievalResult {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Hit texts joined by newlines, or [`NO_RESULTS`] when there are none
    #[inline]
    pub fn context(&self) -> String {
        if self.hits.is_empty() {
            return NO_RESULTS.to_string();
        }

        self.hits
            .iter()
            .map(|hit| hit.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<VectorStore>,
}

impl Retriever {
    #[inline]
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Embed `query` and return the `k` nearest documents in `collection`
    #[inline]
    pub async fn search(
        &self,
        query: &str,
        k: NonZeroUsize,
        collection: &str,
    ) -> Result<RetrievalResult> {
        debug!("Retrieving top {} for {:?} from {}", k, query, collection);

        let vector = self.embedder.embed(query)?;
        let hits = self.store.query(collection, &vector, k.get()).await?;

        debug!("Retrieved {} hits", hits.len());
        Ok(RetrievalResult { hits })
    }

    /// Retrieved context ready to paste into a prompt
    #[inline]
    pub async fn retrieve(&self, query: &str, k: NonZeroUsize, collection: &str) -> Result<String> {
        Ok(self.search(query, k, collection).await?.context())
    }
}
