// Agent runner module
// A persona plus a task in, free text out

pub mod chat;


use std::time::Duration;

use crate::Result;
use crate::config::LlmConfig;
use crate::http::JsonClient;

pub use chat::ChatClient;

/// Who the model is asked to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl AgentProfile {
    /// The sales strategist persona used for every advisory
    #[inline]
    pub fn sales_intelligence() -> Self {
        Self {
            role: "Sales Intelligence Agent".to_string(),
            goal: "Analyze sales rep performance, capacity, targets, and provide data-driven \
                   sales recommendations and next-best actions."
                .to_string(),
            backstory: "You are a senior sales strategist with deep experience in revenue \
                        growth, account planning, and sales analytics."
                .to_string(),
        }
    }

    /// System message for a chat completion
    #[inline]
    pub fn system_message(&self) -> String {
        format!(
            "You are the {}.\n{}\nYour goal: {}",
            self.role, self.backstory, self.goal
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTask {
    pub description: String,
    pub expected_output: String,
}

impl AgentTask {
    #[inline]
    pub fn new(description: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            expected_output: expected_output.into(),
        }
    }

    /// User message for a chat completion
    #[inline]
    pub fn user_message(&self) -> String {
        format!(
            "{}\n\nExpected output: {}",
            self.description.trim_end(),
            self.expected_output
        )
    }
}

/// Executes one task as one agent and returns the model's text unmodified.
///
/// Implementations report every failure as `AdvisorError::AgentRunner` and do not retry.
pub trait AgentRunner: Send + Sync {
    fn run(&self, agent: &AgentProfile, task: &AgentTask) -> Result<String>;
}

/// Build the chat client for the configured provider
#[inline]
pub fn create_runner(config: &LlmConfig) -> Result<Box<dyn AgentRunner>> {
    config.validate()?;

    let client = JsonClient::new(
        config.base_url()?,
        Duration::from_secs(config.timeout_seconds),
    )
    .with_api_key(config.api_key()?);

    Ok(Box::new(ChatClient::new(
        client,
        config.provider,
        config.model.clone(),
        config.temperature,
    )))
}
