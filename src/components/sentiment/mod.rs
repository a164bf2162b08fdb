//! Sentiment classification: language selection, classifier caching and the
//! request/response contract of the inference service.

mod classifier;
pub mod models;
mod registry;

pub use classifier::{
    top_label, Classifier, ClassifierFactory, HfClassifierFactory, HfInferenceClassifier,
    HfModelSettings,
};
pub use models::{
    Language, SentimentRequest, SentimentResponse, DEFAULT_ENGLISH_MODEL, DEFAULT_RUSSIAN_MODEL,
};
pub use registry::ClassifierRegistry;

use crate::error::AgentResult;
use std::sync::Arc;
use tracing::debug;

/// Validates requests and dispatches them to the per-language classifier
#[derive(Clone)]
pub struct SentimentService {
    registry: Arc<ClassifierRegistry>,
}

impl SentimentService {
    pub fn new(factory: Arc<dyn ClassifierFactory>) -> Self {
        Self {
            registry: Arc::new(ClassifierRegistry::new(factory)),
        }
    }

    pub fn registry(&self) -> &ClassifierRegistry {
        &self.registry
    }

    /// Classify one request. The language is checked before any model is
    /// touched; model failures propagate unchanged.
    pub async fn infer(&self, request: &SentimentRequest) -> AgentResult<SentimentResponse> {
        let language = request.language()?;
        let classifier = self.registry.get(language).await?;
        let response = classifier.classify(&request.text).await?;
        debug!(
            "Classified {} text as {} ({:.4})",
            language, response.label, response.score
        );
        Ok(response)
    }
}
