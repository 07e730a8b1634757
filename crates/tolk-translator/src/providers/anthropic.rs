use async_trait::async_trait;
use serde_json::{Value, json};
use tolk_config::translator::TranslationSettings;

use crate::providers::read_json;
use crate::{ProviderMetadata, TranslateError, Translator, prompt};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

#[derive(Clone)]
pub struct AnthropicTranslator {
    client: reqwest::Client,
    settings: TranslationSettings,
    base_url: String,
}

impl AnthropicTranslator {
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
            "max_tokens": MAX_TOKENS,
            "system": prompt::system_prompt(&self.settings),
            "messages": [{ "role": "user", "content": text }],
        })
    }
}

fn parse_response(json: &Value) -> Result<String, TranslateError> {
    if json["type"] == "error" {
        let message = json["error"]["message"].as_str().unwrap_or("unknown error");
        return Err(TranslateError::Api(message.to_string()));
    }

    let blocks = json["content"]
        .as_array()
        .ok_or_else(|| TranslateError::MalformedResponse("No content in response".to_string()))?;

    let text: String = blocks
        .iter()
        .filter(|b| b["type"] == "text")
        .filter_map(|b| b["text"].as_str())
        .collect();

    if text.is_empty() {
        return Err(TranslateError::MalformedResponse(
            "No text block in response".to_string(),
        ));
    }

    Ok(text.trim().to_string())
}

#[async_trait]
impl Translator for AnthropicTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        if self.settings.api_key.is_empty() {
            return Err(TranslateError::Authentication);
        }

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request_body(text))
            .send()
            .await?;

        let json = read_json(response).await?;
        parse_response(&json)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Anthropic".to_string(),
            model: self.settings.effective_model().to_string(),
            requires_api_key: true,
        }
    }

    fn api_key(&self) -> &str {
        &self.settings.api_key
    }
}
