//! Service configuration
//!
//! Loaded from an optional YAML file, then overridden from the environment.
//! Every section has defaults pointing at the public providers.

use crate::error::{GaiaError, GaiaResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// HTTP listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub address: String,
    /// Port
    pub port: u16,
}

impl ServerConfig {
    /// `address:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Facts provider (REST Countries)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactsConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for FactsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://restcountries.com/v3.1".to_string(),
            timeout_ms: 10_000,
        }
    }
}

/// Knowledge graph and media endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub sparql_url: String,
    pub media_base_url: String,
    pub fast_timeout_ms: u64,
    pub slow_timeout_ms: u64,
    pub media_timeout_ms: u64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            sparql_url: "https://query.wikidata.org/sparql".to_string(),
            media_base_url: "https://api.wikimedia.org/core/v1/wikipedia/en/page".to_string(),
            fast_timeout_ms: 8_000,
            slow_timeout_ms: 15_000,
            media_timeout_ms: 8_000,
        }
    }
}

/// LLM backend used for summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LlmProvider {
    OpenAI,
    Ollama,
    Gemini,
    /// Deterministic offline text, for development and tests
    Mock,
}

impl std::str::FromStr for LlmProvider {
    type Err = GaiaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAI),
            "ollama" => Ok(LlmProvider::Ollama),
            "gemini" => Ok(LlmProvider::Gemini),
            "mock" => Ok(LlmProvider::Mock),
            other => Err(GaiaError::Config(format!("unknown LLM provider {:?}", other))),
        }
    }
}

/// Summary generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub provider: LlmProvider,
    /// Model name (e.g., "gpt-4o-mini", "llama3")
    pub model: String,
    /// API Key (optional, can be loaded from env if None)
    pub api_key: Option<String>,
    /// API Base URL (required for self-hosted endpoints)
    pub api_base_url: Option<String>,
    pub system_prompt: Option<String>,
    pub timeout_ms: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Mock,
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            api_base_url: None,
            system_prompt: None,
            timeout_ms: 60_000,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaiaConfig {
    /// Sent on every upstream request; Wikimedia services require one
    pub user_agent: String,
    pub server: ServerConfig,
    pub facts: FactsConfig,
    pub knowledge: KnowledgeConfig,
    pub summary: SummaryConfig,
}

impl Default for GaiaConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("gaia/{} (country information service)", crate::VERSION),
            server: ServerConfig::default(),
            facts: FactsConfig::default(),
            knowledge: KnowledgeConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl GaiaConfig {
    pub fn from_yaml(text: &str) -> GaiaResult<Self> {
        serde_yaml::from_str(text).map_err(|e| GaiaError::Config(e.to_string()))
    }

    /// File (if given) plus process environment
    pub fn load(path: Option<&Path>) -> GaiaResult<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    GaiaError::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                info!("Loaded configuration from {}", path.display());
                Self::from_yaml(&text)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `GAIA_*` overrides; `lookup` abstracts the environment
    pub fn apply_env<F>(&mut self, lookup: F) -> GaiaResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup("GAIA_ADDRESS") {
            self.server.address = address;
        }
        if let Some(port) = lookup("GAIA_PORT").or_else(|| lookup("PORT")) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| GaiaError::Config(format!("invalid port {:?}", port)))?;
        }
        if let Some(provider) = lookup("GAIA_LLM_PROVIDER") {
            self.summary.provider = provider.parse()?;
        }
        if let Some(model) = lookup("GAIA_LLM_MODEL") {
            self.summary.model = model;
        }
        if let Some(key) = lookup("GAIA_LLM_API_KEY") {
            self.summary.api_key = Some(key);
        }
        if let Some(url) = lookup("GAIA_LLM_BASE_URL") {
            self.summary.api_base_url = Some(url);
        }
        Ok(())
    }
}
