use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Failures talking to the upstream provider
///
/// A non-2xx status is deliberately absent: such responses still flow
/// through JSON decoding and text extraction.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Gateway could not be constructed from configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or transport failure, including reading the response body
    #[error("{0}")]
    Connection(String),

    /// Response body was not valid JSON
    #[error("{0}")]
    Decode(String),
}

impl GatewayError {
    /// Transport error with the request URL stripped, since it carries the API key
    pub(crate) fn connection(error: reqwest::Error) -> Self {
        Self::Connection(error.without_url().to_string())
    }
}
