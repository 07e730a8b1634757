use crate::{ProviderMetadata, TranslateError, Translator};

/// Show only the edges of a credential
pub fn mask_api_key(key: &str) -> String {
    let key = key.trim();
    let chars: Vec<char> = key.chars().collect();

    match chars.len() {
        0 => "(none)".to_string(),
        1..=8 => "****".to_string(),
        n => {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[n - 4..].iter().collect();
            format!("{head}****{tail}")
        }
    }
}

/// User-facing description of a failed translation
pub fn format_failure(metadata: &ProviderMetadata, api_key: &str, error: &TranslateError) -> String {
    format!(
        "Translation failed\nProvider: {}\nModel: {}\nAPI key: {}\nError: {}",
        metadata.name,
        metadata.model,
        mask_api_key(api_key),
        error
    )
}

/// Translate a single selection or post; failures come back as a diagnostic string
pub async fn translate_text(translator: &dyn Translator, text: &str) -> String {
    match translator.translate(text).await {
        Ok(translation) => translation,
        Err(e) => {
            tracing::warn!("Single translation failed: {}", e);
            format_failure(&translator.metadata(), translator.api_key(), &e)
        }
    }
}
