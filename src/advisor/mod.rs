// Advisory orchestrator
// Rep lookup, retrieval, prompt assembly and one agent run per request


use std::num::NonZeroUsize;

use tracing::{debug, info};

use crate::agent::{AgentProfile, AgentRunner, AgentTask};
use crate::records::{RepSnapshot, SalesData};
use crate::retriever::Retriever;
use crate::{AdvisorError, Result};

const RULE: &str = "-----------------------------------------------------";

const ADVISORY_EXPECTED_OUTPUT: &str = "Sales insights for the selected rep";
const QUESTION_EXPECTED_OUTPUT: &str = "Clear sales insights and recommendations";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorSettings {
    /// Collection both indexing and retrieval use
    pub collection: String,
    pub top_k: NonZeroUsize,
}

pub struct Advisor {
    retriever: Retriever,
    runner: Box<dyn AgentRunner>,
    settings: AdvisorSettings,
}

impl Advisor {
    #[inline]
    pub fn new(retriever: Retriever, runner: Box<dyn AgentRunner>, settings: AdvisorSettings) -> Self {
        Self {
            retriever,
            runner,
            settings,
        }
    }

    #[inline]
    pub fn settings(&self) -> &AdvisorSettings {
        &self.settings
    }

    /// Advisory for one sales rep.
    ///
    /// An unknown `rep_id` fails with `RecordNotFound` before any embedding or
    /// chat request is made.
    #[inline]
    pub async fn advise(&self, rep_id: &str, data: &SalesData) -> Result<String> {
        let snapshot = data.snapshot(rep_id)?;
        info!("Preparing advisory for {}", rep_id);

        let query = format!("Sales performance for {}", rep_id);
        let context = self
            .retriever
            .retrieve(&query, self.settings.top_k, &self.settings.collection)
            .await?;
        debug!("Retrieved context:\n{}", context);

        let description = advisory_prompt(&context, &snapshot)?;
        self.runner.run(
            &AgentProfile::sales_intelligence(),
            &AgentTask::new(description, ADVISORY_EXPECTED_OUTPUT),
        )
    }

    /// Free-form question answered from retrieved context only
    #[inline]
    pub async fn ask(&self, question: &str) -> Result<String> {
        info!("Answering question: {}", question);

        let context = self
            .retriever
            .retrieve(question, self.settings.top_k, &self.settings.collection)
            .await?;
        debug!("Retrieved context:\n{}", context);

        self.runner.run(
            &AgentProfile::sales_intelligence(),
            &AgentTask::new(question_prompt(&context), QUESTION_EXPECTED_OUTPUT),
        )
    }
}

/// Task description for a rep advisory
#[inline]
pub fn advisory_prompt(context: &str, snapshot: &RepSnapshot) -> Result<String> {
    let snapshot_json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| AdvisorError::Other(anyhow::anyhow!("Failed to encode rep snapshot: {}", e)))?;

    Ok(format!(
        "You are a Sales Intelligence Agent.

Relevant historical sales data retrieved from memory:
{RULE}
{context}
{RULE}

Current Sales Rep data:
{snapshot_json}

Perform the following:
1. Evaluate capacity
2. Analyze performance vs target
3. Recommend realistic targets
4. Provide next-best-action advice
"
    ))
}

/// Task description for a free-form question
#[inline]
pub fn question_prompt(context: &str) -> String {
    format!(
        "You are a Sales Intelligence Agent.

Relevant sales information retrieved from memory:
{RULE}
{context}
{RULE}

Based on the above information:
- Analyze the situation
- Identify insights or risks
- Provide clear recommendations
"
    )
}
