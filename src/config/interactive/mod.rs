#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::path::Path;

use super::{Config, EmbeddingConfig, LlmConfig, Provider, RetrievalConfig, VectorStoreConfig};

#[inline]
pub fn run_interactive_config(config_dir: &Path) -> Result<()> {
    eprintln!("{}", style("🔧 Sales Advisor Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config(config_dir)?;

    eprintln!("{}", style("Embedding Service").bold().yellow());
    eprintln!("Used to vectorize sales records and queries.");
    configure_embedding(&mut config.embedding)?;

    eprintln!();
    eprintln!("{}", style("LLM Agent").bold().yellow());
    eprintln!("Generates the sales advisory from retrieved context.");
    configure_llm(&mut config.llm)?;

    eprintln!();
    eprintln!("{}", style("Vector Store & Retrieval").bold().yellow());
    configure_retrieval(&mut config.vector_store, &mut config.retrieval)?;

    for (name, provider, env) in [
        ("embedding", config.embedding.provider, &config.embedding.api_key_env),
        ("llm", config.llm.provider, &config.llm.api_key_env),
    ] {
        if provider == Provider::OpenAi && std::env::var(env).is_err() {
            eprintln!(
                "{}",
                style(format!(
                    "⚠ Warning: {} is not set; the {} provider will fail until it is",
                    env, name
                ))
                .yellow()
            );
        }
    }

    eprintln!();
    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());
        eprintln!(
            "Configuration saved to: {}",
            style(config.config_file_path().display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config(config_dir: &Path) -> Result<()> {
    let config = Config::load(config_dir).context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Embedding:").bold().yellow());
    eprintln!("  Provider: {}", style(config.embedding.provider).cyan());
    match config.embedding.base_url() {
        Ok(url) => eprintln!("  Endpoint: {}", style(url).cyan()),
        Err(e) => eprintln!("  Endpoint: {} ({})", style("Invalid").red(), e),
    }
    eprintln!("  Model: {}", style(&config.embedding.model).cyan());
    eprintln!("  Batch Size: {}", style(config.embedding.batch_size).cyan());

    eprintln!();
    eprintln!("{}", style("LLM:").bold().yellow());
    eprintln!("  Provider: {}", style(config.llm.provider).cyan());
    match config.llm.base_url() {
        Ok(url) => eprintln!("  Endpoint: {}", style(url).cyan()),
        Err(e) => eprintln!("  Endpoint: {} ({})", style("Invalid").red(), e),
    }
    eprintln!("  Model: {}", style(&config.llm.model).cyan());
    eprintln!("  Temperature: {}", style(config.llm.temperature).cyan());

    eprintln!();
    eprintln!("{}", style("Vector Store:").bold().yellow());
    eprintln!("  URI: {}", style(config.vector_store_uri()).cyan());
    eprintln!(
        "  Collection: {}",
        style(&config.vector_store.collection).cyan()
    );
    eprintln!("  Top K: {}", style(config.retrieval.top_k).cyan());

    eprintln!();
    eprintln!("{}", style("Data:").bold().yellow());
    eprintln!(
        "  Sales reps: {}",
        style(config.data.sales_reps.display()).cyan()
    );
    eprintln!(
        "  Customers: {}",
        style(config.data.customers.display()).cyan()
    );

    eprintln!();
    eprintln!(
        "Config file: {}",
        style(config.config_file_path().display()).dim()
    );

    Ok(())
}

fn load_existing_config(config_dir: &Path) -> Result<Config> {
    Config::load(config_dir).map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("No valid configuration found. Using defaults.").yellow()
            );
            Ok(Config {
                base_dir: config_dir.to_path_buf(),
                ..Config::default()
            })
        },
        |config| {
            eprintln!("{}", style("Found existing configuration.").green());
            Ok(config)
        },
    )
}

fn select_provider(prompt: &str, current: Provider) -> Result<Provider> {
    let names: Vec<&str> = Provider::ALL.iter().map(Provider::as_str).collect();
    let default_index = Provider::ALL
        .iter()
        .position(|&p| p == current)
        .unwrap_or(0);

    let index = Select::new()
        .with_prompt(prompt)
        .default(default_index)
        .items(&names)
        .interact()?;

    Ok(Provider::ALL[index])
}

fn configure_embedding(embedding: &mut EmbeddingConfig) -> Result<()> {
    let provider = select_provider("Embedding provider", embedding.provider)?;
    embedding.set_provider(provider);

    let model: String = Input::new()
        .with_prompt("Embedding model")
        .default(embedding.model.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Model name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let batch_size: u32 = Input::new()
        .with_prompt("Batch size for embedding generation")
        .default(embedding.batch_size)
        .validate_with(|input: &u32| -> Result<(), &str> {
            if *input == 0 {
                Err("Batch size must be greater than 0")
            } else if *input > 2048 {
                Err("Batch size must be 2048 or less")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    embedding.set_model(model)?;
    embedding.set_batch_size(batch_size)?;

    Ok(())
}

fn configure_llm(llm: &mut LlmConfig) -> Result<()> {
    let provider = select_provider("LLM provider", llm.provider)?;
    llm.set_provider(provider);

    let model: String = Input::new()
        .with_prompt("LLM model")
        .default(llm.model.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("Model name cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let temperature: f32 = Input::new()
        .with_prompt("Temperature")
        .default(llm.temperature)
        .validate_with(|input: &f32| -> Result<(), &str> {
            if (0.0..=2.0).contains(input) {
                Ok(())
            } else {
                Err("Temperature must be between 0.0 and 2.0")
            }
        })
        .interact_text()?;

    llm.set_model(model)?;
    llm.set_temperature(temperature)?;

    Ok(())
}

fn configure_retrieval(store: &mut VectorStoreConfig, retrieval: &mut RetrievalConfig) -> Result<()> {
    let collection: String = Input::new()
        .with_prompt("Collection name (shared by indexing and queries)")
        .default(store.collection.clone())
        .validate_with(|input: &String| -> Result<(), String> {
            super::settings::validate_collection(input).map_err(|e| e.to_string())
        })
        .interact_text()?;

    let top_k: u32 = Input::new()
        .with_prompt("Documents retrieved per query (top K)")
        .default(retrieval.top_k)
        .validate_with(|input: &u32| -> Result<(), &str> {
            if (1..=100).contains(input) {
                Ok(())
            } else {
                Err("Top K must be between 1 and 100")
            }
        })
        .interact_text()?;

    store.set_collection(collection)?;
    retrieval.set_top_k(top_k)?;

    Ok(())
}
