use async_trait::async_trait;
use serde_json::{Value, json};
use tolk_config::translator::TranslationSettings;

use crate::providers::{read_json, strip_code_fence};
use crate::{BatchTranslator, ProviderMetadata, TranslateError, Translator, prompt};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini is the one provider with array-shaped generation, so it also batches
#[derive(Clone)]
pub struct GeminiTranslator {
    client: reqwest::Client,
    settings: TranslationSettings,
    base_url: String,
}

impl GeminiTranslator {
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

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.settings.effective_model()
        )
    }

    fn request_body(&self, text: &str) -> Value {
        json!({
            "systemInstruction": { "parts": [{ "text": prompt::system_prompt(&self.settings) }] },
            "contents": [{ "role": "user", "parts": [{ "text": text }] }],
        })
    }

    fn batch_request_body(&self, texts: &[String]) -> Result<Value, TranslateError> {
        let payload = serde_json::to_string(texts)
            .map_err(|e| TranslateError::Api(format!("Failed to encode batch: {}", e)))?;

        Ok(json!({
            "systemInstruction": { "parts": [{ "text": prompt::batch_system_prompt(&self.settings) }] },
            "contents": [{ "role": "user", "parts": [{ "text": payload }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "type": "ARRAY", "items": { "type": "STRING" } },
            },
        }))
    }

    async fn generate(&self, body: &Value) -> Result<String, TranslateError> {
        if self.settings.api_key.is_empty() {
            return Err(TranslateError::Authentication);
        }

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.settings.api_key)
            .json(body)
            .send()
            .await?;

        let json = read_json(response).await?;
        parse_response(&json)
    }
}

fn parse_response(json: &Value) -> Result<String, TranslateError> {
    if let Some(message) = json["error"]["message"].as_str() {
        return Err(TranslateError::Api(message.to_string()));
    }

    let parts = json["candidates"]
        .get(0)
        .and_then(|c| c["content"]["parts"].as_array())
        .ok_or_else(|| {
            let reason = json["promptFeedback"]["blockReason"]
                .as_str()
                .unwrap_or("no candidates");
            TranslateError::MalformedResponse(format!("No content in response: {}", reason))
        })?;

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    Ok(text.trim().to_string())
}

fn parse_batch(text: &str, expected: usize) -> Result<Vec<String>, TranslateError> {
    let items: Vec<String> = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| TranslateError::MalformedResponse(format!("Batch is not a string array: {}", e)))?;

    if items.len() != expected {
        return Err(TranslateError::BatchLengthMismatch {
            expected,
            actual: items.len(),
        });
    }

    Ok(items)
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        self.generate(&self.request_body(text)).await
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Gemini".to_string(),
            model: self.settings.effective_model().to_string(),
            requires_api_key: true,
        }
    }

    fn api_key(&self) -> &str {
        &self.settings.api_key
    }

    fn as_batch(&self) -> Option<&dyn BatchTranslator> {
        Some(self)
    }
}

#[async_trait]
impl BatchTranslator for GeminiTranslator {
    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>, TranslateError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let body = self.batch_request_body(texts)?;
        let text = self.generate(&body).await?;
        parse_batch(&text, texts.len())
    }
}
