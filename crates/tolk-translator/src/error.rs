#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    Authentication,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Batch returned {actual} items, expected {expected}")]
    BatchLengthMismatch { expected: usize, actual: usize },
}

impl TranslateError {
    /// Configuration problems are terminal, everything else is a provider failure
    pub fn is_configuration(&self) -> bool {
        matches!(self, TranslateError::InvalidConfiguration(_))
    }

    /// Map a non-success status to an error, keeping a bounded excerpt of the body
    pub(crate) fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => TranslateError::Authentication,
            429 => TranslateError::RateLimitExceeded,
            code => {
                let body: String = body.chars().take(300).collect();
                TranslateError::Http { status: code, body }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn status_mapping() {
        assert!(matches!(
            TranslateError::from_status(StatusCode::FORBIDDEN, String::new()),
            TranslateError::Authentication
        ));
        assert!(matches!(
            TranslateError::from_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            TranslateError::RateLimitExceeded
        ));

        let long_body = "x".repeat(1000);
        match TranslateError::from_status(StatusCode::BAD_GATEWAY, long_body) {
            TranslateError::Http { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body.len(), 300);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn only_configuration_is_terminal() {
        assert!(TranslateError::InvalidConfiguration("no key".into()).is_configuration());
        assert!(!TranslateError::RateLimitExceeded.is_configuration());
    }
}
