use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Lookup;

/// Remote LLM provider used for translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenRouter,
    Gemini,
    Anthropic,
}

impl Provider {
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "OpenRouter",
            Provider::Gemini => "Gemini",
            Provider::Anthropic => "Anthropic",
        }
    }

    /// Model used when the settings leave it empty
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "openai/gpt-4o-mini",
            Provider::Gemini => "gemini-2.0-flash",
            Provider::Anthropic => "claude-3-5-haiku-latest",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openrouter" => Some(Provider::OpenRouter),
            "gemini" => Some(Provider::Gemini),
            "anthropic" => Some(Provider::Anthropic),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

fn default_target_lang() -> String {
    "en".to_string()
}

/// Provider selection and credentials for one translation request or page session.
///
/// Owned by the caller; the pipeline only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    pub provider: Provider,
    #[serde(default)]
    pub api_key: String,
    /// Empty means the provider default
    #[serde(default)]
    pub model: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    /// Replaces the built-in system prompt, `{target}` is substituted
    pub system_prompt: Option<String>,
    /// Local relay used when direct calls are blocked
    pub relay_url: Option<String>,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            api_key: String::new(),
            model: String::new(),
            target_lang: default_target_lang(),
            system_prompt: None,
            relay_url: None,
        }
    }
}

impl TranslationSettings {
    /// Replace the fields whose variable is set
    pub fn apply_overrides(&mut self, lookup: Lookup<'_>) {
        if let Some(provider) = lookup("TOLK_PROVIDER").and_then(|v| Provider::parse(&v)) {
            self.provider = provider;
        }
        if let Some(api_key) = lookup("TOLK_API_KEY") {
            self.api_key = api_key;
        }
        if let Some(model) = lookup("TOLK_MODEL") {
            self.model = model;
        }
        if let Some(target_lang) = lookup("TOLK_TARGET_LANG").filter(|v| !v.trim().is_empty()) {
            self.target_lang = target_lang;
        }
        if let Some(relay_url) = lookup("TOLK_RELAY_URL") {
            self.relay_url = Some(relay_url).filter(|v| !v.trim().is_empty());
        }
    }

    /// Configured model, or the provider default when none is set
    pub fn effective_model(&self) -> &str {
        let model = self.model.trim();
        if model.is_empty() {
            self.provider.default_model()
        } else {
            model
        }
    }

    /// Returns a description of the first problem that makes these settings unusable
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err(format!("{} API key is not set", self.provider));
        }

        if self.target_lang.trim().is_empty() {
            return Err("target language is not set".to_string());
        }

        if let Some(url) = &self.relay_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(format!("relay url must be http(s): {url}"));
        }

        Ok(())
    }
}
