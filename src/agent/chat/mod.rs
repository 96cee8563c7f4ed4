
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{AgentProfile, AgentRunner, AgentTask};
use crate::config::Provider;
use crate::http::JsonClient;
use crate::{AdvisorError, Result};

/// Chat-completion client for Ollama and OpenAI-compatible servers
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: JsonClient,
    provider: Provider,
    model: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: AssistantMessage,
}

#[derive(Debug, Serialize)]
struct OpenAiChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

impl ChatClient {
    #[inline]
    pub fn new(client: JsonClient, provider: Provider, model: String, temperature: f32) -> Self {
        Self {
            client,
            provider,
            model,
            temperature,
        }
    }

    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn complete(&self, system: &str, user: &str) -> Result<String> {
        let messages = vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: user,
            },
        ];

        match self.provider {
            Provider::Ollama => {
                let request = OllamaChatRequest {
                    model: &self.model,
                    messages,
                    stream: false,
                    options: OllamaOptions {
                        temperature: self.temperature,
                    },
                };
                let response: OllamaChatResponse = self
                    .client
                    .post("/api/chat", &request)
                    .map_err(|e| AdvisorError::AgentRunner(format!("Chat request failed: {}", e)))?;
                Ok(response.message.content)
            }
            Provider::OpenAi => {
                let request = OpenAiChatRequest {
                    model: &self.model,
                    temperature: self.temperature,
                    messages,
                };
                let response: OpenAiChatResponse = self
                    .client
                    .post("/v1/chat/completions", &request)
                    .map_err(|e| AdvisorError::AgentRunner(format!("Chat request failed: {}", e)))?;
                response
                    .choices
                    .into_iter()
                    .next()
                    .map(|choice| choice.message.content)
                    .ok_or_else(|| {
                        AdvisorError::AgentRunner("Chat response had no choices".to_string())
                    })
            }
        }
    }
}

impl AgentRunner for ChatClient {
    fn run(&self, agent: &AgentProfile, task: &AgentTask) -> Result<String> {
        info!(
            "Running {} on {} via {}",
            agent.role, self.model, self.provider
        );

        let output = self.complete(&agent.system_message(), &task.user_message())?;

        debug!("Agent returned {} characters", output.len());
        Ok(output)
    }
}
