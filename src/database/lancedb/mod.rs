// LanceDB vector database module
// Each collection is one table of (vector, payload text, source) rows

#[cfg(test)]
mod tests;

pub mod vector_store;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::documents::{Document, DocumentSource};

pub use vector_store::VectorStore;

/// One row in a collection. Rows are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedVector {
    /// Unique identifier for this row
    pub id: String,
    /// The embedding; every row in a collection has the same length
    pub vector: Vec<f32>,
    /// Document text returned verbatim by similarity search
    pub text: String,
    /// Record the text was formatted from
    pub source: Option<DocumentSource>,
    /// RFC 3339 timestamp of insertion
    pub created_at: String,
}

impl EmbeddedVector {
    #[inline]
    pub fn new(document: &Document, vector: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            vector,
            text: document.text.clone(),
            source: document.source.clone(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// A search hit; higher scores are more similar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPayload {
    pub text: String,
    pub source: Option<DocumentSource>,
    pub score: f32,
}
