#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::records::RecordPaths;

pub const CONFIG_DIR_ENV: &str = "SALES_ADVISOR_CONFIG_DIR";
pub const DEFAULT_COLLECTION: &str = "sales_data";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub vector_store: VectorStoreConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Which HTTP dialect a service speaks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    Ollama,
}

impl Provider {
    pub const ALL: [Self; 2] = [Self::OpenAi, Self::Ollama];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: Provider,
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub model: String,
    pub batch_size: u32,
    pub timeout_seconds: u64,
    pub api_key_env: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            protocol: "https".to_string(),
            host: "api.openai.com".to_string(),
            port: 443,
            model: "text-embedding-3-large".to_string(),
            batch_size: 64,
            timeout_seconds: 30,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: Provider,
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAi,
            protocol: "https".to_string(),
            host: "api.openai.com".to_string(),
            port: 443,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            timeout_seconds: 120,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VectorStoreConfig {
    /// LanceDB URI; defaults to `<config dir>/vectors`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    pub collection: String,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            uri: None,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: u32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DataConfig {
    pub sales_reps: PathBuf,
    pub customers: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            sales_reps: PathBuf::from("sales_data.csv"),
            customers: PathBuf::from("customer_data.csv"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("Invalid port: {0} (must be between 1 and 65535)")]
    InvalidPort(u16),
    #[error("Invalid protocol: {0} (must be 'http' or 'https')")]
    InvalidProtocol(String),
    #[error("Invalid batch size: {0} (must be between 1 and 2048)")]
    InvalidBatchSize(u32),
    #[error("Invalid model name: {0} (cannot be empty)")]
    InvalidModel(String),
    #[error("Invalid timeout: {0} (must be between 1 and 600 seconds)")]
    InvalidTimeout(u64),
    #[error("Invalid temperature: {0} (must be between 0.0 and 2.0)")]
    InvalidTemperature(f32),
    #[error("Invalid collection name: '{0}' (letters, digits, '_' and '-' only)")]
    InvalidCollection(String),
    #[error("Invalid top_k: {0} (must be between 1 and 100)")]
    InvalidTopK(u32),
    #[error("Missing API key: environment variable {0} is not set")]
    MissingApiKey(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl From<ConfigError> for crate::AdvisorError {
    #[inline]
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl Config {
    /// Default configuration directory: `$SALES_ADVISOR_CONFIG_DIR`, else `~/.sales-advisor`
    #[inline]
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        dirs::home_dir()
            .map(|home| home.join(".sales-advisor"))
            .or_else(|| dirs::data_dir().map(|data| data.join("sales-advisor")))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Load `config.toml` from `config_dir`, falling back to defaults when absent
    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join("config.toml");

        if !config_path.exists() {
            return Ok(Self {
                base_dir: config_dir.as_ref().to_path_buf(),
                ..Self::default()
            });
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.base_dir = config_dir.as_ref().to_path_buf();

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = self.get_base_dir();

        fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = self.config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn get_base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.embedding.validate()?;
        self.llm.validate()?;
        self.vector_store.validate()?;
        self.retrieval.validate()?;
        Ok(())
    }

    #[inline]
    pub fn config_file_path(&self) -> PathBuf {
        self.get_base_dir().join("config.toml")
    }

    /// LanceDB URI: the configured one, or the `vectors` directory under the config dir
    #[inline]
    pub fn vector_store_uri(&self) -> String {
        self.vector_store.uri.clone().unwrap_or_else(|| {
            self.get_base_dir()
                .join("vectors")
                .to_string_lossy()
                .into_owned()
        })
    }

    /// CSV locations, with relative paths taken as given (relative to the working directory)
    #[inline]
    pub fn record_paths(&self) -> RecordPaths {
        RecordPaths {
            sales_reps: self.data.sales_reps.clone(),
            customers: self.data.customers.clone(),
        }
    }
}

fn validate_endpoint(protocol: &str, host: &str, port: u16) -> Result<Url, ConfigError> {
    if protocol != "http" && protocol != "https" {
        return Err(ConfigError::InvalidProtocol(protocol.to_string()));
    }

    if port == 0 {
        return Err(ConfigError::InvalidPort(port));
    }

    let url_str = format!("{}://{}:{}", protocol, host, port);
    Url::parse(&url_str).map_err(|_| ConfigError::InvalidUrl(url_str))
}

fn validate_model(model: &str) -> Result<(), ConfigError> {
    if model.trim().is_empty() {
        return Err(ConfigError::InvalidModel(model.to_string()));
    }
    Ok(())
}

fn validate_timeout(timeout_seconds: u64) -> Result<(), ConfigError> {
    if !(1..=600).contains(&timeout_seconds) {
        return Err(ConfigError::InvalidTimeout(timeout_seconds));
    }
    Ok(())
}

fn resolve_api_key(provider: Provider, api_key_env: &str) -> Result<Option<String>, ConfigError> {
    match provider {
        Provider::Ollama => Ok(None),
        Provider::OpenAi => std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Some)
            .ok_or_else(|| ConfigError::MissingApiKey(api_key_env.to_string())),
    }
}

impl EmbeddingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint(&self.protocol, &self.host, self.port)?;
        validate_model(&self.model)?;

        if self.batch_size == 0 || self.batch_size > 2048 {
            return Err(ConfigError::InvalidBatchSize(self.batch_size));
        }

        validate_timeout(self.timeout_seconds)
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        validate_endpoint(&self.protocol, &self.host, self.port)
    }

    /// API key from the environment; `None` for providers that need none
    pub fn api_key(&self) -> Result<Option<String>, ConfigError> {
        resolve_api_key(self.provider, &self.api_key_env)
    }

    pub fn set_provider(&mut self, provider: Provider) {
        if provider != self.provider {
            let defaults = provider_defaults(provider);
            self.protocol = defaults.protocol.to_string();
            self.host = defaults.host.to_string();
            self.port = defaults.port;
            self.model = defaults.embedding_model.to_string();
        }
        self.provider = provider;
    }

    pub fn set_model(&mut self, model: String) -> Result<(), ConfigError> {
        validate_model(&model)?;
        self.model = model;
        Ok(())
    }

    pub fn set_batch_size(&mut self, batch_size: u32) -> Result<(), ConfigError> {
        if batch_size == 0 || batch_size > 2048 {
            return Err(ConfigError::InvalidBatchSize(batch_size));
        }
        self.batch_size = batch_size;
        Ok(())
    }
}

impl LlmConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_endpoint(&self.protocol, &self.host, self.port)?;
        validate_model(&self.model)?;

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }

        validate_timeout(self.timeout_seconds)
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        validate_endpoint(&self.protocol, &self.host, self.port)
    }

    pub fn api_key(&self) -> Result<Option<String>, ConfigError> {
        resolve_api_key(self.provider, &self.api_key_env)
    }

    pub fn set_provider(&mut self, provider: Provider) {
        if provider != self.provider {
            let defaults = provider_defaults(provider);
            self.protocol = defaults.protocol.to_string();
            self.host = defaults.host.to_string();
            self.port = defaults.port;
            self.model = defaults.chat_model.to_string();
        }
        self.provider = provider;
    }

    pub fn set_model(&mut self, model: String) -> Result<(), ConfigError> {
        validate_model(&model)?;
        self.model = model;
        Ok(())
    }

    pub fn set_temperature(&mut self, temperature: f32) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidTemperature(temperature));
        }
        self.temperature = temperature;
        Ok(())
    }
}

impl VectorStoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_collection(&self.collection)
    }

    pub fn set_collection(&mut self, collection: String) -> Result<(), ConfigError> {
        validate_collection(&collection)?;
        self.collection = collection;
        Ok(())
    }
}

/// Collection names double as LanceDB table names
pub fn validate_collection(collection: &str) -> Result<(), ConfigError> {
    let valid = !collection.is_empty()
        && collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidCollection(collection.to_string()))
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.top_k) {
            return Err(ConfigError::InvalidTopK(self.top_k));
        }
        Ok(())
    }

    pub fn set_top_k(&mut self, top_k: u32) -> Result<(), ConfigError> {
        if !(1..=100).contains(&top_k) {
            return Err(ConfigError::InvalidTopK(top_k));
        }
        self.top_k = top_k;
        Ok(())
    }
}

struct ProviderDefaults {
    protocol: &'static str,
    host: &'static str,
    port: u16,
    embedding_model: &'static str,
    chat_model: &'static str,
}

fn provider_defaults(provider: Provider) -> ProviderDefaults {
    match provider {
        Provider::OpenAi => ProviderDefaults {
            protocol: "https",
            host: "api.openai.com",
            port: 443,
            embedding_model: "text-embedding-3-large",
            chat_model: "gpt-4o-mini",
        },
        Provider::Ollama => ProviderDefaults {
            protocol: "http",
            host: "localhost",
            port: 11434,
            embedding_model: "nomic-embed-text:latest",
            chat_model: "llama3.1:latest",
        },
    }
}
