use std::time::Duration;

use serde_json::Value;

use crate::TranslateError;

pub mod anthropic;
pub mod gemini;
pub mod openrouter;
pub mod relay;

pub use anthropic::AnthropicTranslator;
pub use gemini::GeminiTranslator;
pub use openrouter::OpenRouterTranslator;
pub use relay::RelayTranslator;

/// Shared client with a top-level timeout on every request
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, TranslateError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(client)
}

/// Turn a provider response into JSON, mapping error statuses first
pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value, TranslateError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("Provider responded with HTTP {}", status);
        return Err(TranslateError::from_status(status, body));
    }

    response
        .json()
        .await
        .map_err(|e| TranslateError::MalformedResponse(format!("Failed to parse response: {}", e)))
}

/// Strip a surrounding markdown code fence some models add around JSON
pub(crate) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
