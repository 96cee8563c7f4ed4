#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

/// End-to-end tests from CSV files through indexing, retrieval and the advisor
mod common;

use common::{HashingEmbedder, RecordingRunner, write_sample_csvs};
use sales_advisor::AdvisorError;
use sales_advisor::advisor::{Advisor, AdvisorSettings};
use sales_advisor::database::lancedb::VectorStore;
use sales_advisor::documents::documents_from;
use sales_advisor::embeddings::Embedder;
use sales_advisor::indexer::Indexer;
use sales_advisor::records::{self, RecordPaths, SalesData};
use sales_advisor::retriever::{NO_RESULTS, Retriever};
use std::num::NonZeroUsize;
use std::sync::Arc;
use tempfile::TempDir;

const COLLECTION: &str = "sales_data";

struct Pipeline {
    data: SalesData,
    embedder: Arc<dyn Embedder>,
    store: Arc<VectorStore>,
    _temp_dir: TempDir,
}

impl Pipeline {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("should create temp dir");
        let (sales_reps, customers) = write_sample_csvs(temp_dir.path());
        let data = records::load(&RecordPaths {
            sales_reps,
            customers,
        })
        .expect("sample data should load");

        let store = VectorStore::connect(&temp_dir.path().join("vectors").to_string_lossy())
            .await
            .expect("should connect to vector store");

        Self {
            data,
            embedder: Arc::new(HashingEmbedder),
            store: Arc::new(store),
            _temp_dir: temp_dir,
        }
    }

    async fn index(&self) -> usize {
        Indexer::new(self.embedder.clone(), self.store.clone())
            .with_batch_size(2)
            .index(&documents_from(&self.data), COLLECTION)
            .await
            .expect("indexing should succeed")
            .count
    }

    fn retriever(&self) -> Retriever {
        Retriever::new(self.embedder.clone(), self.store.clone())
    }

    fn advisor(&self, runner: RecordingRunner, top_k: usize) -> Advisor {
        Advisor::new(
            self.retriever(),
            Box::new(runner),
            AdvisorSettings {
                collection: COLLECTION.to_string(),
                top_k: k(top_k),
            },
        )
    }
}

fn k(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("non-zero")
}

#[tokio::test]
async fn index_stores_one_row_per_record() {
    let pipeline = Pipeline::new().await;

    assert_eq!(pipeline.index().await, 5);
    assert_eq!(
        pipeline.store.count(COLLECTION).await.expect("count"),
        5
    );
}

#[tokio::test]
async fn rep_query_retrieves_that_rep() {
    let pipeline = Pipeline::new().await;
    pipeline.index().await;

    let context = pipeline
        .retriever()
        .retrieve("Sales performance for REP_1", k(1), COLLECTION)
        .await
        .expect("retrieval should succeed");

    assert!(context.contains("REP_1"), "{}", context);
    assert!(context.contains("180000"), "{}", context);
}

#[tokio::test]
async fn exact_text_round_trips() {
    let pipeline = Pipeline::new().await;
    pipeline.index().await;

    let text = "Customer CUST_2 has average monthly sales of $25000.";
    let result = pipeline
        .retriever()
        .search(text, k(1), COLLECTION)
        .await
        .expect("search should succeed");

    assert_eq!(result.hits.len(), 1);
    assert_eq!(result.hits[0].text, text);
    assert_eq!(
        result.hits[0]
            .source
            .as_ref()
            .map(|source| source.record_id.as_str()),
        Some("CUST_2")
    );
}

#[tokio::test]
async fn empty_collection_yields_sentinel() {
    let pipeline = Pipeline::new().await;

    let context = pipeline
        .retriever()
        .retrieve("Sales performance for REP_1", k(3), COLLECTION)
        .await
        .expect("retrieval should succeed");

    assert_eq!(context, NO_RESULTS);
}

#[tokio::test]
async fn reindexing_returns_duplicate_hits() {
    let pipeline = Pipeline::new().await;
    pipeline.index().await;
    pipeline.index().await;

    let text = "Customer CUST_1 has average monthly sales of $40000.";
    let result = pipeline
        .retriever()
        .search(text, k(2), COLLECTION)
        .await
        .expect("search should succeed");

    assert_eq!(result.hits.len(), 2);
    assert!(result.hits.iter().all(|hit| hit.text == text));
}

#[tokio::test]
async fn unknown_rep_skips_the_agent() {
    let pipeline = Pipeline::new().await;
    pipeline.index().await;
    let runner = RecordingRunner::default();
    let advisor = pipeline.advisor(runner.clone(), 3);

    let result = advisor.advise("REP_999", &pipeline.data).await;

    match result {
        Err(e @ AdvisorError::RecordNotFound(_)) => {
            assert_eq!(e.to_string(), "Sales Rep ID 'REP_999' not found");
        }
        other => panic!("expected RecordNotFound, got {:?}", other),
    }
    assert_eq!(runner.calls(), 0);
}

#[tokio::test]
async fn advisory_prompt_carries_context_and_snapshot() {
    let pipeline = Pipeline::new().await;
    pipeline.index().await;
    let runner = RecordingRunner::default();
    let advisor = pipeline.advisor(runner.clone(), 1);

    let output = advisor
        .advise("REP_1", &pipeline.data)
        .await
        .expect("advisory should succeed");

    assert_eq!(output, "Recommended next step: follow up with CUST_1.");
    assert_eq!(runner.calls(), 1);

    let prompt = runner.last_description().expect("runner was called");
    assert!(prompt.contains(
        "Sales Rep REP_1 manages 12 customers. Monthly revenue is $180000. Target is $200000. Conversion rate is 0.21."
    ));
    assert!(prompt.contains("\"rep_id\": \"REP_1\""));
    assert!(prompt.contains("\"customer_id\": \"CUST_3\""));
    assert!(prompt.contains("1. Evaluate capacity"));
    assert!(prompt.contains("4. Provide next-best-action advice"));
}

#[tokio::test]
async fn question_without_index_uses_sentinel() {
    let pipeline = Pipeline::new().await;
    let runner = RecordingRunner::default();
    let advisor = pipeline.advisor(runner.clone(), 3);

    advisor
        .ask("Which customers buy the most?")
        .await
        .expect("question should be answered");

    let prompt = runner.last_description().expect("runner was called");
    assert!(prompt.contains(NO_RESULTS));
    assert!(prompt.contains("- Provide clear recommendations"));
}
