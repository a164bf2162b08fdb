use crate::error::AgentResult;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::classifier::{Classifier, ClassifierFactory};
use super::models::Language;

/// Process-wide classifier cache keyed by language.
///
/// Each classifier is built on first use and shared afterwards; concurrent
/// first requests wait for the same construction.
pub struct ClassifierRegistry {
    factory: Arc<dyn ClassifierFactory>,
    english: OnceCell<Arc<dyn Classifier>>,
    russian: OnceCell<Arc<dyn Classifier>>,
}

impl ClassifierRegistry {
    pub fn new(factory: Arc<dyn ClassifierFactory>) -> Self {
        Self {
            factory,
            english: OnceCell::new(),
            russian: OnceCell::new(),
        }
    }

    fn slot(&self, language: Language) -> &OnceCell<Arc<dyn Classifier>> {
        match language {
            Language::English => &self.english,
            Language::Russian => &self.russian,
        }
    }

    /// Get the classifier for a language, building it if needed. A failed
    /// build leaves the slot empty so the next request tries again.
    pub async fn get(&self, language: Language) -> AgentResult<Arc<dyn Classifier>> {
        let classifier = self
            .slot(language)
            .get_or_try_init(|| self.factory.build(language))
            .await?;
        Ok(Arc::clone(classifier))
    }

    /// Whether the classifier for a language has been built
    pub fn is_loaded(&self, language: Language) -> bool {
        self.slot(language).initialized()
    }
}
