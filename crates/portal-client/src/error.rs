//! Portal API client error types.

/// Errors from portal API calls.
#[derive(Debug, thiserror::Error)]
pub enum PortalApiError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Portal returned a non-2xx status.
    #[error("portal API {endpoint} returned {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body was not the expected JSON.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Response parsed but lacks a field the caller depends on.
    #[error("response from {endpoint} is missing `{field}`")]
    MissingField {
        endpoint: String,
        field: &'static str,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl PortalApiError {
    /// The endpoint label the error was raised for, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Http { endpoint, .. }
            | Self::ApiError { endpoint, .. }
            | Self::Deserialization { endpoint, .. }
            | Self::MissingField { endpoint, .. } => Some(endpoint),
            Self::Config(_) => None,
        }
    }
}
