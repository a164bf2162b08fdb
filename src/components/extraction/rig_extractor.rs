use crate::error::{extraction_error, AgentResult};
use async_trait::async_trait;
use rig::agent::Agent;
use rig::completion::{Chat, Message};
use rig::providers::openai;
use tracing::info;

use super::prompt::system_prompt;
use super::EventExtractor;

/// Where and how to reach the extraction model
#[derive(Debug, Clone)]
pub struct RigExtractorSettings {
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    pub model: String,
}

/// Extraction through Rig against an OpenAI-compatible chat endpoint
pub struct RigExtractor {
    agent: Agent<openai::CompletionModel>,
    model: String,
}

impl RigExtractor {
    pub fn new(settings: &RigExtractorSettings) -> Self {
        info!(
            "Using extraction model {} at {}",
            settings.model, settings.base_url
        );

        let client = openai::Client::from_url(&settings.api_key, &settings.base_url);
        let agent = client
            .agent(&settings.model)
            .preamble(&system_prompt())
            .temperature(0.0)
            .build();

        Self {
            agent,
            model: settings.model.clone(),
        }
    }
}

#[async_trait]
impl EventExtractor for RigExtractor {
    async fn complete(&self, user_message: &str) -> AgentResult<String> {
        let response = self
            .agent
            .chat(user_message.to_string(), Vec::<Message>::new())
            .await
            .map_err(|e| extraction_error(&format!("{} request failed: {}", self.model, e)))?;

        info!("Received response from {}", self.model);
        Ok(response)
    }
}
