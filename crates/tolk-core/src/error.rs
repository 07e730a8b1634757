use tolk_translator::TranslateError;

/// Failures that reach the caller of a session operation.
///
/// Provider and separator problems never show up here, they degrade inside the resolver.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] TranslateError),
}
