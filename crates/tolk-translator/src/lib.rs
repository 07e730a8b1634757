pub mod diagnostic;
pub mod error;
pub mod prompt;
pub mod providers;
pub mod strategy;

pub use diagnostic::{format_failure, mask_api_key, translate_text};
pub use error::TranslateError;
pub use providers::{AnthropicTranslator, GeminiTranslator, OpenRouterTranslator, RelayTranslator};
pub use strategy::{Attempt, FallbackTranslator, build_translator};

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text into the target language bound at construction
    async fn translate(&self, text: &str) -> Result<String, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;

    /// Credential used for requests, only read to build diagnostics
    fn api_key(&self) -> &str;

    /// Array-shaped batch capability, if the provider has one
    fn as_batch(&self) -> Option<&dyn BatchTranslator> {
        None
    }
}

/// Translates N independent strings into exactly N strings in one call
#[async_trait::async_trait]
pub trait BatchTranslator: Send + Sync {
    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>, TranslateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    pub name: String,
    pub model: String,
    pub requires_api_key: bool,
}
