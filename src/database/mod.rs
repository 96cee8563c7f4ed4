// Database module
// Vector storage for embedded sales documents (LanceDB)

pub mod lancedb;

pub use self::lancedb::{EmbeddedVector, ScoredPayload, VectorStore};
