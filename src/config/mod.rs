// Configuration management
// TOML file in the per-user config directory, validated on load and save

pub mod interactive;
pub mod settings;

pub use interactive::{run_interactive_config, show_config};
pub use settings::{
    Config, ConfigError, DataConfig, EmbeddingConfig, LlmConfig, Provider, RetrievalConfig,
    VectorStoreConfig,
};
