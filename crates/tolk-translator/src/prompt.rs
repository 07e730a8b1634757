use tolk_config::translator::TranslationSettings;

const DEFAULT_PROMPT: &str = "You are a professional translator. Translate the user's text into {target}. \
Reply with the translation only, without explanations or quotes. \
Keep every marker of the form [[[...]]] exactly as it appears and in the same position.";

const BATCH_INSTRUCTION: &str = "The input is a JSON array of independent strings. \
Return a JSON array with exactly the same number of strings, each one the translation of the string at the same index.";

/// System prompt for a single-text request
pub fn system_prompt(settings: &TranslationSettings) -> String {
    let template = settings
        .system_prompt
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(DEFAULT_PROMPT);

    template.replace("{target}", settings.target_lang.trim())
}

/// System prompt for an array-shaped request
pub fn batch_system_prompt(settings: &TranslationSettings) -> String {
    format!("{}\n{}", system_prompt(settings), BATCH_INSTRUCTION)
}
