//! HTTP client for a running Gaia server
//!
//! Unwraps the response envelope: `success: false` becomes [`CliError::Api`].

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    /// Error envelope returned by the server
    #[error("{code}: {message}")]
    Api { code: String, message: String },

    /// Response that is not an envelope
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type CliResult<T> = Result<T, CliError>;

#[derive(Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

pub struct GaiaClient {
    base_url: String,
    http: Client,
}

impl GaiaClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn unwrap(response: reqwest::Response) -> CliResult<Value> {
        let status = response.status();
        let bytes = response.bytes().await?;
        let envelope: Envelope = serde_json::from_slice(&bytes).map_err(|_| {
            CliError::Protocol(format!("server answered {} without an envelope", status))
        })?;

        if envelope.success {
            Ok(envelope.data.unwrap_or(Value::Null))
        } else {
            let error = envelope.error.unwrap_or(ErrorBody {
                code: "UNKNOWN".to_string(),
                message: format!("request failed with {}", status),
            });
            Err(CliError::Api { code: error.code, message: error.message })
        }
    }

    async fn get(&self, path: &str) -> CliResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        Self::unwrap(self.http.get(&url).send().await?).await
    }

    pub async fn search(&self, term: &str) -> CliResult<Value> {
        let q = utf8_percent_encode(term, NON_ALPHANUMERIC).to_string();
        self.get(&format!("/search?q={}", q)).await
    }

    pub async fn country(&self, code: &str) -> CliResult<Value> {
        let code = utf8_percent_encode(code, NON_ALPHANUMERIC).to_string();
        self.get(&format!("/countries/{}", code)).await
    }

    pub async fn list(&self) -> CliResult<Value> {
        self.get("/countries").await
    }

    pub async fn status(&self) -> CliResult<Value> {
        self.get("/status").await
    }

    pub async fn summary(&self, country: &str) -> CliResult<Value> {
        let url = format!("{}/summary", self.base_url);
        let body = serde_json::json!({ "country": country });
        Self::unwrap(self.http.post(&url).json(&body).send().await?).await
    }
}
