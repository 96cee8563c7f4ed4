use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdvisorError>;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed record in {source_name} at row {row}: {reason}")]
    MalformedRecord {
        source_name: String,
        row: u64,
        reason: String,
    },

    #[error("Sales Rep ID '{0}' not found")]
    RecordNotFound(String),

    #[error("Embedding service error: {0}")]
    EmbeddingService(String),

    #[error("Vector store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Agent runner error: {0}")]
    AgentRunner(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod advisor;
pub mod agent;
pub mod commands;
pub mod config;
pub mod database;
pub mod documents;
pub mod embeddings;
pub mod http;
pub mod indexer;
pub mod records;
pub mod retriever;
