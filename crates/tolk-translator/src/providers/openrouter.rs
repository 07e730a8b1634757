use async_trait::async_trait;
use serde_json::{Value, json};
use tolk_config::translator::TranslationSettings;

use crate::providers::read_json;
use crate::{ProviderMetadata, TranslateError, Translator, prompt};

const DEFAULT_BASE_URL: &str = "https://openrouter.ai";

#[derive(Clone)]
pub struct OpenRouterTranslator {
    client: reqwest::Client,
    settings: TranslationSettings,
    base_url: String,
}

impl OpenRouterTranslator {
    pub fn new(client: reqwest::Client, settings: TranslationSettings) -> Self {
        Self {
            client,
            settings,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_body(&self, text: &str) -> Value {
        json!({
            "model": self.settings.effective_model(),
            "messages": [
                { "role": "system", "content": prompt::system_prompt(&self.settings) },
                { "role": "user", "content": text },
            ],
        })
    }
}

fn parse_response(json: &Value) -> Result<String, TranslateError> {
    if let Some(message) = json["error"]["message"].as_str() {
        return Err(TranslateError::Api(message.to_string()));
    }

    json["choices"]
        .get(0)
        .and_then(|c| c["message"]["content"].as_str())
        .map(|text| text.trim().to_string())
        .ok_or_else(|| TranslateError::MalformedResponse("No choices in response".to_string()))
}

#[async_trait]
impl Translator for OpenRouterTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        if self.settings.api_key.is_empty() {
            return Err(TranslateError::Authentication);
        }

        let url = format!("{}/api/v1/chat/completions", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.settings.api_key)
            .json(&self.request_body(text))
            .send()
            .await?;

        let json = read_json(response).await?;
        parse_response(&json)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "OpenRouter".to_string(),
            model: self.settings.effective_model().to_string(),
            requires_api_key: true,
        }
    }

    fn api_key(&self) -> &str {
        &self.settings.api_key
    }
}
