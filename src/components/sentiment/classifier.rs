use crate::error::{classifier_error, AgentResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use super::models::{Language, SentimentResponse};

/// A loaded sentiment model
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify one text and return the top label
    async fn classify(&self, text: &str) -> AgentResult<SentimentResponse>;
}

/// Builds the classifier for a language the first time it is needed
#[async_trait]
pub trait ClassifierFactory: Send + Sync {
    async fn build(&self, language: Language) -> AgentResult<Arc<dyn Classifier>>;
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Hosted inference payloads come either nested per input or flat
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceOutput {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

/// Pick the highest scoring label out of an inference payload
pub fn top_label(payload: &str) -> AgentResult<SentimentResponse> {
    let output: InferenceOutput = serde_json::from_str(payload)
        .map_err(|e| classifier_error(&format!("Unexpected inference response: {}", e)))?;

    let scores = match output {
        InferenceOutput::Nested(mut batches) if !batches.is_empty() => batches.swap_remove(0),
        InferenceOutput::Nested(_) => Vec::new(),
        InferenceOutput::Flat(scores) => scores,
    };

    scores
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|best| SentimentResponse {
            label: best.label,
            score: best.score,
        })
        .ok_or_else(|| classifier_error("Inference response contained no labels"))
}

/// Text classification through a hosted Hugging Face inference endpoint
pub struct HfInferenceClassifier {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HfInferenceClassifier {
    pub fn new(client: Client, base_url: &str, model: &str, api_token: Option<String>) -> Self {
        Self {
            client,
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), model),
            api_token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Classifier for HfInferenceClassifier {
    async fn classify(&self, text: &str) -> AgentResult<SentimentResponse> {
        let mut request = self.client.post(&self.endpoint).json(&json!({ "inputs": text }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| classifier_error(&format!("Inference request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classifier_error(&format!("Failed to read inference response: {}", e)))?;

        if !status.is_success() {
            return Err(classifier_error(&format!(
                "Inference failed: HTTP {} - {}",
                status, body
            )));
        }

        debug!("Inference response from {}: {}", self.endpoint, body);
        top_label(&body)
    }
}

/// Model names and endpoint for the hosted classifiers
#[derive(Debug, Clone)]
pub struct HfModelSettings {
    pub base_url: String,
    pub api_token: Option<String>,
    pub english_model: String,
    pub russian_model: String,
}

impl HfModelSettings {
    pub fn model_for(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english_model,
            Language::Russian => &self.russian_model,
        }
    }
}

/// Factory for [`HfInferenceClassifier`]s sharing one HTTP client
pub struct HfClassifierFactory {
    settings: HfModelSettings,
    client: Client,
}

impl HfClassifierFactory {
    pub fn new(settings: HfModelSettings) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ClassifierFactory for HfClassifierFactory {
    async fn build(&self, language: Language) -> AgentResult<Arc<dyn Classifier>> {
        let model = self.settings.model_for(language);
        info!("Loading {} classifier {}", language, model);
        Ok(Arc::new(HfInferenceClassifier::new(
            self.client.clone(),
            &self.settings.base_url,
            model,
            self.settings.api_token.clone(),
        )))
    }
}
