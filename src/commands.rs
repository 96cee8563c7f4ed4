use anyhow::{Context, Result};
use console::style;
use dialoguer::Input;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::AdvisorError;
use crate::advisor::{Advisor, AdvisorSettings};
use crate::agent::create_runner;
use crate::config::{Config, Provider};
use crate::database::lancedb::VectorStore;
use crate::documents::documents_from;
use crate::embeddings::{OllamaClient, create_embedder};
use crate::http::JsonClient;
use crate::indexer::{IndexReport, Indexer};
use crate::records::{self, RecordPaths, SalesData};
use crate::retriever::Retriever;

const OUTPUT_BANNER: &str = "========== SALES AGENT OUTPUT ==========";

async fn connect_store(config: &Config) -> Result<Arc<VectorStore>> {
    let uri = config.vector_store_uri();
    let store = VectorStore::connect(&uri)
        .await
        .with_context(|| format!("Failed to open vector store at {}", uri))?;
    Ok(Arc::new(store))
}

fn load_records(paths: &RecordPaths) -> Result<SalesData> {
    records::load(paths).with_context(|| {
        format!(
            "Failed to load sales records from {} and {}",
            paths.sales_reps.display(),
            paths.customers.display()
        )
    })
}

async fn build_advisor(config: &Config) -> Result<Advisor> {
    let embedder =
        create_embedder(&config.embedding).context("Failed to initialize embedding client")?;
    let store = connect_store(config).await?;
    let runner = create_runner(&config.llm).context("Failed to initialize LLM client")?;

    let top_k = usize::try_from(config.retrieval.top_k)
        .ok()
        .and_then(NonZeroUsize::new)
        .context("retrieval.top_k must be at least 1")?;

    Ok(Advisor::new(
        Retriever::new(embedder, store),
        runner,
        AdvisorSettings {
            collection: config.vector_store.collection.clone(),
            top_k,
        },
    ))
}

fn print_agent_output(output: &str) {
    println!("\n{}\n", OUTPUT_BANNER);
    println!("{}", output);
}

/// Load both CSV files, format them and append them to the configured collection
#[inline]
pub async fn index_records(
    config: &Config,
    sales_reps: Option<PathBuf>,
    customers: Option<PathBuf>,
) -> Result<IndexReport> {
    let defaults = config.record_paths();
    let paths = RecordPaths {
        sales_reps: sales_reps.unwrap_or(defaults.sales_reps),
        customers: customers.unwrap_or(defaults.customers),
    };

    let data = load_records(&paths)?;
    println!(
        "Loaded {} sales reps and {} customers",
        data.sales_reps.len(),
        data.customers.len()
    );

    let documents = documents_from(&data);
    let embedder =
        create_embedder(&config.embedding).context("Failed to initialize embedding client")?;
    let store = connect_store(config).await?;

    let indexer = Indexer::new(embedder, store)
        .with_batch_size(config.embedding.batch_size as usize)
        .with_progress(true);
    let report = indexer
        .index(&documents, &config.vector_store.collection)
        .await
        .context("Indexing failed")?;

    println!(
        "{} Indexed {} documents into collection '{}'",
        style("✅").green(),
        report.count,
        config.vector_store.collection
    );

    Ok(report)
}

/// Print an advisory for one rep.
///
/// Without `rep_id` the user is prompted, and prompted again after an unknown id.
/// With `rep_id`, an unknown id is reported and the command still succeeds.
#[inline]
pub async fn advise_rep(config: &Config, rep_id: Option<String>) -> Result<()> {
    let data = load_records(&config.record_paths())?;
    let advisor = build_advisor(config).await?;

    if let Some(rep_id) = rep_id {
        match advisor.advise(rep_id.trim(), &data).await {
            Ok(output) => print_agent_output(&output),
            Err(e @ AdvisorError::RecordNotFound(_)) => println!("Error: {}", e),
            Err(e) => return Err(e).context("Advisory failed"),
        }
        return Ok(());
    }

    loop {
        let rep_id: String = Input::new()
            .with_prompt("Enter Sales Rep ID (e.g. REP_1)")
            .interact_text()
            .context("Failed to read Sales Rep ID")?;

        match advisor.advise(rep_id.trim(), &data).await {
            Ok(output) => {
                print_agent_output(&output);
                return Ok(());
            }
            Err(e @ AdvisorError::RecordNotFound(_)) => {
                eprintln!("{} {}", style("Error:").red(), e);
            }
            Err(e) => return Err(e).context("Advisory failed"),
        }
    }
}

/// Answer a free-form question from retrieved context
#[inline]
pub async fn ask_question(config: &Config, question: Option<String>) -> Result<()> {
    let question = match question {
        Some(question) => question,
        None => Input::new()
            .with_prompt("Ask a sales question")
            .interact_text()
            .context("Failed to read question")?,
    };

    let advisor = build_advisor(config).await?;
    let output = advisor
        .ask(question.trim())
        .await
        .context("Failed to answer question")?;

    print_agent_output(&output);
    Ok(())
}

/// Show configuration, service reachability and collection size
#[inline]
pub async fn show_status(config: &Config) -> Result<()> {
    println!("📊 Sales Advisor Status Report");
    println!("{}", "=".repeat(50));
    println!();

    println!("🤖 Embedding Service:");
    println!(
        "   Provider: {} ({})",
        config.embedding.provider, config.embedding.model
    );
    match config.embedding.provider {
        Provider::Ollama => match config.embedding.base_url() {
            Ok(url) => {
                let client = OllamaClient::new(
                    JsonClient::new(
                        url.clone(),
                        Duration::from_secs(config.embedding.timeout_seconds),
                    ),
                    config.embedding.model.clone(),
                );
                match client.health_check() {
                    Ok(()) => println!("   ✅ Ollama: Connected ({})", url),
                    Err(e) => println!("   ⚠️  Ollama: Unhealthy - {}", e),
                }
            }
            Err(e) => println!("   ❌ Invalid endpoint - {}", e),
        },
        Provider::OpenAi => match config.embedding.api_key() {
            Ok(_) => println!(
                "   ✅ API key found in {}",
                config.embedding.api_key_env
            ),
            Err(e) => println!("   ❌ {}", e),
        },
    }

    println!();
    println!("🧠 LLM:");
    println!(
        "   Provider: {} ({}, temperature {})",
        config.llm.provider, config.llm.model, config.llm.temperature
    );

    println!();
    println!("🔍 Vector Store:");
    let uri = config.vector_store_uri();
    println!("   URI: {}", uri);
    println!("   Collection: {}", config.vector_store.collection);
    match VectorStore::connect(&uri).await {
        Ok(store) => match store.count(&config.vector_store.collection).await {
            Ok(0) => println!("   📭 Collection is empty; run 'sales-advisor index'"),
            Ok(count) => println!("   📄 Entries: {}", count),
            Err(e) => {
                warn!("Failed to count collection: {}", e);
                println!("   ⚠️  Entries: Unknown - {}", e);
            }
        },
        Err(e) => println!("   ❌ LanceDB: Failed to connect - {}", e),
    }

    println!();
    println!("📂 Data Files:");
    for path in [&config.data.sales_reps, &config.data.customers] {
        let marker = if path.exists() { "✅" } else { "❌" };
        println!("   {} {}", marker, path.display());
    }

    info!("Status report complete");
    Ok(())
}
