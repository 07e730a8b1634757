use std::sync::Arc;

use async_trait::async_trait;
use tolk_config::Provider;
use tolk_config::pipeline::PipelineConfig;
use tolk_config::translator::TranslationSettings;

use crate::providers::{
    AnthropicTranslator, GeminiTranslator, OpenRouterTranslator, RelayTranslator, http_client,
};
use crate::{BatchTranslator, ProviderMetadata, TranslateError, Translator};

/// Result of one strategy in a fallback chain
#[derive(Debug)]
pub enum Attempt<T> {
    Ok(T),
    /// Provider failure, the next strategy may still succeed
    Retry(TranslateError),
    /// Terminal failure, no further strategy is tried
    Fail(TranslateError),
}

impl<T> Attempt<T> {
    pub fn from_result(result: Result<T, TranslateError>) -> Self {
        match result {
            Ok(value) => Attempt::Ok(value),
            Err(e) if e.is_configuration() => Attempt::Fail(e),
            Err(e) => Attempt::Retry(e),
        }
    }
}

/// Ordered list of translators, tried until one succeeds
pub struct FallbackTranslator {
    strategies: Vec<Arc<dyn Translator>>,
}

impl FallbackTranslator {
    pub fn new(strategies: Vec<Arc<dyn Translator>>) -> Self {
        Self { strategies }
    }

    fn primary(&self) -> Option<&Arc<dyn Translator>> {
        self.strategies.first()
    }
}

#[async_trait]
impl Translator for FallbackTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let mut last_error =
            TranslateError::InvalidConfiguration("no translation strategy configured".to_string());

        for (index, strategy) in self.strategies.iter().enumerate() {
            match Attempt::from_result(strategy.translate(text).await) {
                Attempt::Ok(text) => return Ok(text),
                Attempt::Fail(e) => return Err(e),
                Attempt::Retry(e) => {
                    tracing::warn!(
                        "{} failed ({}), {} strategies left",
                        strategy.metadata().name,
                        e,
                        self.strategies.len() - index - 1
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    fn metadata(&self) -> ProviderMetadata {
        match self.primary() {
            Some(primary) => primary.metadata(),
            None => ProviderMetadata {
                name: "none".to_string(),
                model: String::new(),
                requires_api_key: false,
            },
        }
    }

    fn api_key(&self) -> &str {
        self.primary().map(|p| p.api_key()).unwrap_or_default()
    }

    fn as_batch(&self) -> Option<&dyn BatchTranslator> {
        self.primary().and_then(|p| p.as_batch())
    }
}

/// Direct provider first, then the relay when one is configured
pub fn build_translator(
    settings: &TranslationSettings,
    pipeline: &PipelineConfig,
) -> Result<Arc<dyn Translator>, TranslateError> {
    settings
        .validate()
        .map_err(TranslateError::InvalidConfiguration)?;

    let client = http_client(pipeline.request_timeout())?;

    let direct: Arc<dyn Translator> = match settings.provider {
        Provider::OpenRouter => Arc::new(OpenRouterTranslator::new(client.clone(), settings.clone())),
        Provider::Gemini => Arc::new(GeminiTranslator::new(client.clone(), settings.clone())),
        Provider::Anthropic => Arc::new(AnthropicTranslator::new(client.clone(), settings.clone())),
    };

    let mut strategies = vec![direct];
    if let Some(relay_url) = &settings.relay_url {
        tracing::debug!("Relay fallback enabled via {}", relay_url);
        strategies.push(Arc::new(RelayTranslator::new(
            client,
            settings.clone(),
            relay_url.clone(),
        )));
    }

    Ok(Arc::new(FallbackTranslator::new(strategies)))
}
