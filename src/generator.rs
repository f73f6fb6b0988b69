//! Answer generation for dataset prompts.

use crate::config::LlmConfig;
use crate::error::Result;
use crate::llm::LlmClient;
use async_trait::async_trait;

/// Produces a model answer for a prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate an answer for `prompt`, with surrounding whitespace trimmed.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Generator backed by an OpenAI-compatible chat endpoint.
///
/// Each call sends exactly one user message with no system prompt.
pub struct LlmGenerator {
    client: LlmClient,
}

impl LlmGenerator {
    /// Create a generator over an existing client.
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    /// Create from LLM config, forcing deterministic sampling.
    pub fn from_config(mut config: LlmConfig) -> Self {
        config.temperature = 0.0;
        Self::new(LlmClient::new(config))
    }

    /// Model used for generation.
    pub fn model(&self) -> &str {
        self.client.model()
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let content = self.client.complete(None, prompt).await?;
        Ok(content.trim().to_string())
    }
}
