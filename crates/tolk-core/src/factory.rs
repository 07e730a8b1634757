use std::sync::Arc;

use tolk_config::pipeline::PipelineConfig;
use tolk_config::translator::TranslationSettings;
use tolk_translator::{TranslateError, Translator, build_translator};

/// Builds the translator a request or session will use
pub trait TranslatorFactory: Send + Sync {
    fn build(&self, settings: &TranslationSettings) -> Result<Arc<dyn Translator>, TranslateError>;
}

/// Real providers with relay fallback
pub struct ProviderFactory {
    pipeline: PipelineConfig,
}

impl ProviderFactory {
    pub fn new(pipeline: PipelineConfig) -> Self {
        Self { pipeline }
    }
}

impl TranslatorFactory for ProviderFactory {
    fn build(&self, settings: &TranslationSettings) -> Result<Arc<dyn Translator>, TranslateError> {
        build_translator(settings, &self.pipeline)
    }
}
