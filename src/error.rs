//! Error taxonomy shared by the aggregation core and the request boundary

use thiserror::Error;

/// Errors surfaced to callers of the aggregation layer
///
/// Optional-data failures (knowledge graph, media listing) never appear here;
/// they are absorbed by [`crate::knowledge::KnowledgeClient`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GaiaError {
    /// Country code is not exactly three ASCII letters
    #[error("Invalid country code: {0:?}")]
    InvalidCode(String),

    /// Search query missing or blank
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Malformed request body or parameter
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Well-formed input with no upstream match
    #[error("Country not found: {0}")]
    NotFound(String),

    /// Timeout, transport error or unexpected upstream shape
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Summary generation failed
    #[error("Summary generation failed: {0}")]
    Generation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type GaiaResult<T> = Result<T, GaiaError>;

/// Coarse classification used by the response envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    ClientError,
    ServerError,
}

impl GaiaError {
    /// Stable machine-readable code for the envelope
    pub fn code(&self) -> &'static str {
        match self {
            GaiaError::InvalidCode(_) => "INVALID_CODE",
            GaiaError::InvalidQuery(_) => "INVALID_QUERY",
            GaiaError::InvalidRequest(_) => "INVALID_REQUEST",
            GaiaError::NotFound(_) => "NOT_FOUND",
            GaiaError::UpstreamUnavailable(_) => "API_ERROR",
            GaiaError::Generation(_) => "SUMMARY_FAILED",
            GaiaError::Config(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_class(&self) -> StatusClass {
        match self {
            GaiaError::InvalidCode(_)
            | GaiaError::InvalidQuery(_)
            | GaiaError::InvalidRequest(_)
            | GaiaError::NotFound(_) => StatusClass::ClientError,
            GaiaError::UpstreamUnavailable(_)
            | GaiaError::Generation(_)
            | GaiaError::Config(_) => StatusClass::ServerError,
        }
    }

    /// Message shown to HTTP callers
    ///
    /// Server-side failures whose detail may name upstream endpoints or
    /// credentials get a fixed text; the detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            GaiaError::Generation(_) => "Summary generation failed".to_string(),
            GaiaError::Config(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// HTTP status code the request boundary answers with
    pub fn http_status(&self) -> u16 {
        match self {
            GaiaError::InvalidCode(_)
            | GaiaError::InvalidQuery(_)
            | GaiaError::InvalidRequest(_) => 400,
            GaiaError::NotFound(_) => 404,
            GaiaError::UpstreamUnavailable(_) => 503,
            GaiaError::Generation(_) => 502,
            GaiaError::Config(_) => 500,
        }
    }
}
