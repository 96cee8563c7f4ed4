use super::load_existing_config as load_existing_config_impl;
use tempfile::TempDir;

#[test]
fn load_existing_config_falls_back_to_defaults() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config = load_existing_config_impl(temp_dir.path()).expect("config loaded successfully");

    assert_eq!(config.get_base_dir(), temp_dir.path());
    assert!(!config.embedding.model.is_empty());
    assert!(config.embedding.batch_size > 0);
    assert!(!config.vector_store.collection.is_empty());
}

#[test]
fn load_existing_config_ignores_broken_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    std::fs::write(temp_dir.path().join("config.toml"), "[llm\nmodel = ")
        .expect("should write broken config");

    let config = load_existing_config_impl(temp_dir.path()).expect("defaults are used");
    assert_eq!(config.llm.model, "gpt-4o-mini");
}
