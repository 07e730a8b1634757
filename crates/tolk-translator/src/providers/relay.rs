use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tolk_config::Provider;
use tolk_config::translator::TranslationSettings;

use crate::providers::read_json;
use crate::{ProviderMetadata, TranslateError, Translator, prompt};

/// Forwards requests through the local relay server when direct calls are blocked
#[derive(Clone)]
pub struct RelayTranslator {
    client: reqwest::Client,
    settings: TranslationSettings,
    relay_url: String,
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    provider: Provider,
    model: &'a str,
    api_key: &'a str,
    target_lang: &'a str,
    system_prompt: String,
    text: &'a str,
}

#[derive(Deserialize)]
struct RelayResponse {
    translation: Option<String>,
    error: Option<String>,
}

impl RelayResponse {
    fn into_result(self) -> Result<String, TranslateError> {
        if let Some(error) = self.error {
            return Err(TranslateError::Api(format!("Relay error: {}", error)));
        }

        self.translation
            .map(|t| t.trim().to_string())
            .ok_or_else(|| TranslateError::MalformedResponse("Relay returned no translation".to_string()))
    }
}

impl RelayTranslator {
    pub fn new(client: reqwest::Client, settings: TranslationSettings, relay_url: String) -> Self {
        Self {
            client,
            settings,
            relay_url,
        }
    }

    fn request<'a>(&'a self, text: &'a str) -> RelayRequest<'a> {
        RelayRequest {
            provider: self.settings.provider,
            model: self.settings.effective_model(),
            api_key: &self.settings.api_key,
            target_lang: &self.settings.target_lang,
            system_prompt: prompt::system_prompt(&self.settings),
            text,
        }
    }
}

#[async_trait]
impl Translator for RelayTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let url = format!("{}/translate", self.relay_url.trim_end_matches('/'));

        let response = self
            .client
            .post(url)
            .json(&self.request(text))
            .send()
            .await?;

        let json = read_json(response).await?;
        let response: RelayResponse = serde_json::from_value(json)
            .map_err(|e| TranslateError::MalformedResponse(format!("Failed to parse relay response: {}", e)))?;

        response.into_result()
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: format!("{} (relay)", self.settings.provider),
            model: self.settings.effective_model().to_string(),
            requires_api_key: true,
        }
    }

    fn api_key(&self) -> &str {
        &self.settings.api_key
    }
}
