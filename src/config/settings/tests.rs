use super::*;
use tempfile::TempDir;

#[test]
fn default_config() {
    let config = Config::default();
    assert_eq!(config.embedding.provider, Provider::OpenAi);
    assert_eq!(config.embedding.model, "text-embedding-3-large");
    assert_eq!(config.llm.model, "gpt-4o-mini");
    assert!((config.llm.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(config.vector_store.collection, "sales_data");
    assert_eq!(config.retrieval.top_k, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn config_validation() {
    let config = Config::default();

    let mut invalid_config = config.clone();
    invalid_config.embedding.protocol = "ftp".to_string();
    assert!(matches!(
        invalid_config.validate(),
        Err(ConfigError::InvalidProtocol(_))
    ));

    let mut invalid_config = config.clone();
    invalid_config.llm.port = 0;
    assert!(matches!(
        invalid_config.validate(),
        Err(ConfigError::InvalidPort(0))
    ));

    let mut invalid_config = config.clone();
    invalid_config.embedding.model = "  ".to_string();
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.embedding.batch_size = 0;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config.clone();
    invalid_config.llm.temperature = 2.5;
    assert!(matches!(
        invalid_config.validate(),
        Err(ConfigError::InvalidTemperature(_))
    ));

    let mut invalid_config = config.clone();
    invalid_config.retrieval.top_k = 0;
    assert!(matches!(
        invalid_config.validate(),
        Err(ConfigError::InvalidTopK(0))
    ));

    let mut invalid_config = config.clone();
    invalid_config.llm.timeout_seconds = 0;
    assert!(invalid_config.validate().is_err());

    let mut invalid_config = config;
    invalid_config.vector_store.collection = "sales data".to_string();
    assert!(matches!(
        invalid_config.validate(),
        Err(ConfigError::InvalidCollection(_))
    ));
}

#[test]
fn collection_names() {
    assert!(validate_collection("sales_data").is_ok());
    assert!(validate_collection("Sales").is_ok());
    assert!(validate_collection("q3-2024").is_ok());
    assert!(validate_collection("").is_err());
    assert!(validate_collection("drop;table").is_err());
}

#[test]
fn base_url_generation() {
    let config = Config::default();
    let url = config
        .embedding
        .base_url()
        .expect("should generate base url successfully");
    assert_eq!(url.as_str(), "https://api.openai.com/");

    let mut ollama = LlmConfig::default();
    ollama.set_provider(Provider::Ollama);
    let url = ollama.base_url().expect("should generate base url");
    assert_eq!(url.as_str(), "http://localhost:11434/");
}

#[test]
fn switching_provider_resets_endpoint_defaults() {
    let mut embedding = EmbeddingConfig::default();
    embedding.set_provider(Provider::Ollama);

    assert_eq!(embedding.protocol, "http");
    assert_eq!(embedding.port, 11434);
    assert_eq!(embedding.model, "nomic-embed-text:latest");

    embedding.model = "mxbai-embed-large".to_string();
    embedding.set_provider(Provider::Ollama);
    assert_eq!(embedding.model, "mxbai-embed-large");
}

#[test]
fn ollama_needs_no_api_key() {
    let mut llm = LlmConfig::default();
    llm.set_provider(Provider::Ollama);
    assert_eq!(llm.api_key().expect("ollama has no key"), None);
}

#[test]
fn missing_api_key_is_reported() {
    let embedding = EmbeddingConfig {
        api_key_env: "SALES_ADVISOR_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        ..EmbeddingConfig::default()
    };

    let err = embedding.api_key().expect_err("key is not set");
    assert!(err.to_string().contains("SALES_ADVISOR_TEST_KEY_THAT_IS_NEVER_SET"));
}

#[test]
fn setter_validation() {
    let mut llm = LlmConfig::default();
    assert!(llm.set_temperature(0.7).is_ok());
    assert!(llm.set_temperature(-0.1).is_err());
    assert!((llm.temperature - 0.7).abs() < f32::EPSILON);
    assert!(llm.set_model(String::new()).is_err());

    let mut embedding = EmbeddingConfig::default();
    assert!(embedding.set_batch_size(2049).is_err());
    assert!(embedding.set_batch_size(16).is_ok());
    assert_eq!(embedding.batch_size, 16);

    let mut retrieval = RetrievalConfig::default();
    assert!(retrieval.set_top_k(101).is_err());
    assert!(retrieval.set_top_k(5).is_ok());

    let mut store = VectorStoreConfig::default();
    assert!(store.set_collection("Sales".to_string()).is_ok());
    assert_eq!(store.collection, "Sales");
}

#[test]
fn toml_serialization() {
    let config = Config::default();
    let toml_str = toml::to_string(&config).expect("should serialize toml correctly");
    let parsed_config: Config = toml::from_str(&toml_str).expect("should parse toml correctly");
    assert_eq!(config, parsed_config);
}

#[test]
fn partial_config_with_defaults() {
    let partial_toml = r#"
        [llm]
        provider = "ollama"
        model = "llama3.1:8b"

        [vector_store]
        collection = "Sales"
    "#;

    let config: Config = toml::from_str(partial_toml).expect("partial config should parse");
    assert_eq!(config.llm.provider, Provider::Ollama);
    assert_eq!(config.llm.model, "llama3.1:8b");
    assert_eq!(config.vector_store.collection, "Sales");
    assert_eq!(config.embedding, EmbeddingConfig::default());
    assert_eq!(config.retrieval.top_k, 3);
}

#[test]
fn unknown_provider_is_rejected() {
    let result: Result<Config, toml::de::Error> = toml::from_str("[llm]\nprovider = \"cohere\"\n");
    assert!(result.is_err());
}

#[test]
fn load_without_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config = Config::load(temp_dir.path()).expect("should load defaults");

    assert_eq!(config.get_base_dir(), temp_dir.path());
    assert_eq!(config.embedding, EmbeddingConfig::default());
    assert_eq!(
        config.vector_store_uri(),
        temp_dir.path().join("vectors").to_string_lossy()
    );
}

#[test]
fn save_and_load_round_trip() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let mut config = Config::load(temp_dir.path()).expect("should load defaults");
    config.vector_store.uri = Some("/tmp/lance".to_string());
    config.retrieval.top_k = 7;
    config.llm.set_provider(Provider::Ollama);

    config.save().expect("should save config");
    assert!(config.config_file_path().exists());

    let loaded = Config::load(temp_dir.path()).expect("should reload config");
    assert_eq!(loaded, config);
    assert_eq!(loaded.vector_store_uri(), "/tmp/lance");
}

#[test]
fn load_rejects_invalid_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    std::fs::write(
        temp_dir.path().join("config.toml"),
        "[retrieval]\ntop_k = 0\n",
    )
    .expect("should write config");

    assert!(Config::load(temp_dir.path()).is_err());
}

#[test]
fn save_rejects_invalid_config() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let mut config = Config::load(temp_dir.path()).expect("should load defaults");
    config.embedding.batch_size = 0;

    assert!(config.save().is_err());
    assert!(!config.config_file_path().exists());
}
