// Indexer module
// Turns formatted documents into embedded rows of a vector store collection


use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::Result;
use crate::database::lancedb::{EmbeddedVector, VectorStore};
use crate::documents::Document;
use crate::embeddings::{Embedder, ensure_count};

pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Outcome of one indexing run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexReport {
    /// Documents appended to the collection
    pub count: usize,
}

/// Embeds documents batch by batch and appends them to a collection.
///
/// Rows are never deduplicated; indexing the same documents twice stores them twice.
pub struct Indexer {
    embedder: Arc<dyn Embedder>,
    store: Arc<VectorStore>,
    batch_size: usize,
    show_progress: bool,
}

impl Indexer {
    #[inline]
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<VectorStore>) -> Self {
        Self {
            embedder,
            store,
            batch_size: DEFAULT_BATCH_SIZE,
            show_progress: false,
        }
    }

    /// Number of texts sent per embedding request. Zero is treated as one.
    #[inline]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    #[inline]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Embed and store every document in `collection`.
    ///
    /// The first failing batch aborts the run. Batches stored before it stay in
    /// the collection.
    #[inline]
    pub async fn index(&self, documents: &[Document], collection: &str) -> Result<IndexReport> {
        if documents.is_empty() {
            debug!("Nothing to index into {}", collection);
            return Ok(IndexReport { count: 0 });
        }

        info!(
            "Indexing {} documents into {} with {}",
            documents.len(),
            collection,
            self.embedder.model()
        );

        let bar = self.progress_bar(documents.len());
        let mut count = 0;

        for batch in documents.chunks(self.batch_size) {
            let texts: Vec<String> = batch.iter().map(|doc| doc.text.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts)?;
            ensure_count(texts.len(), &vectors)?;

            let rows: Vec<EmbeddedVector> = batch
                .iter()
                .zip(vectors)
                .map(|(doc, vector)| EmbeddedVector::new(doc, vector))
                .collect();

            count += self.store.upsert(collection, rows).await?;
            bar.set_position(count as u64);
            debug!("Indexed batch of {} documents", batch.len());
        }

        bar.finish_and_clear();
        info!("Indexed {} documents into {}", count, collection);

        Ok(IndexReport { count })
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress || !console::user_attended_stderr() {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::with_template("{spinner} [{pos}/{len}] Embedding {wide_bar}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        ProgressBar::new(len as u64).with_style(style)
    }
}
