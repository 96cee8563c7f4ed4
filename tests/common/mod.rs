#![allow(dead_code, reason = "each integration test binary uses a different subset")]

use sales_advisor::Result;
use sales_advisor::agent::{AgentProfile, AgentRunner, AgentTask};
use sales_advisor::embeddings::Embedder;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const SALES_REPS_CSV: &str = "\
rep_id,customers,monthly_revenue,target,conversion_rate
REP_1,12,180000,200000,0.21
REP_2,8,95000,120000,0.18
";

pub const CUSTOMERS_CSV: &str = "\
customer_id,avg_monthly_sales
CUST_1,40000
CUST_2,25000
CUST_3,15000
";

const DIM: usize = 1024;

/// Bag-of-words embedder: every lowercase token adds one to an FNV-1a bucket.
///
/// Texts sharing more tokens score higher, and identical texts score 1.0.
pub struct HashingEmbedder;

fn fnv1a(token: &str) -> u64 {
    token.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

impl Embedder for HashingEmbedder {
    fn model(&self) -> &str {
        "fnv-bag-of-words"
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut vector = vec![0.0_f32; DIM + 1];
                text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .filter(|token| !token.is_empty())
                    .for_each(|token| {
                        let bucket = (fnv1a(&token.to_lowercase()) % DIM as u64) as usize;
                        vector[bucket] += 1.0;
                    });
                // Keeps token-free texts away from the zero vector
                vector[DIM] = 0.01;
                vector
            })
            .collect())
    }
}

/// Records every task and answers with a fixed reply
#[derive(Clone, Default)]
pub struct RecordingRunner {
    pub tasks: Arc<Mutex<Vec<AgentTask>>>,
}

impl RecordingRunner {
    pub fn calls(&self) -> usize {
        self.tasks.lock().expect("lock").len()
    }

    pub fn last_description(&self) -> Option<String> {
        self.tasks
            .lock()
            .expect("lock")
            .last()
            .map(|task| task.description.clone())
    }
}

impl AgentRunner for RecordingRunner {
    fn run(&self, _agent: &AgentProfile, task: &AgentTask) -> Result<String> {
        self.tasks.lock().expect("lock").push(task.clone());
        Ok("Recommended next step: follow up with CUST_1.".to_string())
    }
}

/// Write both sample CSV files into `dir`
pub fn write_sample_csvs(dir: &Path) -> (PathBuf, PathBuf) {
    let sales_reps = dir.join("sales_data.csv");
    let customers = dir.join("customer_data.csv");
    std::fs::write(&sales_reps, SALES_REPS_CSV).expect("should write sales reps");
    std::fs::write(&customers, CUSTOMERS_CSV).expect("should write customers");
    (sales_reps, customers)
}
