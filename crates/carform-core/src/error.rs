//! Error types for carform operations.

/// Errors raised while talking to the cars backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid base URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Base URL cannot carry a path: {0}")]
    OpaqueBaseUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Server rejected the request (error code {code:?})")]
    Rejected { code: Option<i64> },
}

/// Errors raised when a raw value cannot be stored in the form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid year: {0}")]
    InvalidYear(String),

    #[error("Invalid flag value: {0}")]
    InvalidFlag(String),
}
