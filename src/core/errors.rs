use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("upstream API error: {code} - {message}")]
    ApiError { code: i32, message: String },

    #[error("authentication error: {0}")]
    AuthError(String),

    #[error("translation error: {0}")]
    TranslationError(#[from] TranslationError),

    #[error("transport error: {0}")]
    TransportError(String),

    #[error("call timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("internal gateway error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("other error: {0}")]
    Other(String),
}

/// Errors raised while encoding the upstream model into wire messages.
///
/// Encode failures always abort the whole call; no partial wire object is
/// ever produced. Decode is defensive instead and does not use this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("expected [start, end] offset pair, got {count} values")]
    MalformedSpan { count: usize },

    #[error("nested quote/repost depth exceeds {max} levels")]
    NestingTooDeep { max: usize },
}
