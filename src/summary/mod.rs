//! Country summaries
//!
//! Natural-language summaries are generated once per country name and
//! served from an injected [`SummaryStore`] afterwards. Concurrent first
//! requests for the same name share a single generation.

pub mod client;

pub use client::LlmSummaryGenerator;

use crate::error::{GaiaError, GaiaResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("LLM API error: {0}")]
    ApiError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("LLM returned an empty summary")]
    EmptyResponse,
}

pub type SummaryResult<T> = Result<T, SummaryError>;

impl From<SummaryError> for GaiaError {
    fn from(err: SummaryError) -> Self {
        GaiaError::Generation(err.to_string())
    }
}

/// Summary text for one country name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    pub country: String,
    pub summary: String,
    pub from_cache: bool,
}

/// Text generation backend
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate(&self, country: &str) -> SummaryResult<String>;
}

/// Key-value store for generated summaries
///
/// The only mutation is insert-if-absent; entries are never replaced.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    /// Store `summary` unless the key is taken; returns the stored text
    async fn insert_if_absent(&self, key: &str, summary: String) -> String;
}

/// Process-local store, created at startup and injected into the service
#[derive(Default)]
pub struct InMemorySummaryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemorySummaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl SummaryStore for InMemorySummaryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    async fn insert_if_absent(&self, key: &str, summary: String) -> String {
        let mut entries = self.entries.write().await;
        entries.entry(key.to_string()).or_insert(summary).clone()
    }
}

/// Cache-backed summary lookup
pub struct SummaryService {
    store: Arc<dyn SummaryStore>,
    generator: Arc<dyn SummaryGenerator>,
    /// One gate per key with a generation in progress
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SummaryService {
    pub fn new(store: Arc<dyn SummaryStore>, generator: Arc<dyn SummaryGenerator>) -> Self {
        Self {
            store,
            generator,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Names are matched trimmed and case-insensitively
    fn cache_key(country: &str) -> String {
        country.trim().to_lowercase()
    }

    pub async fn get_summary(&self, country: &str) -> GaiaResult<SummaryRecord> {
        let name = country.trim();
        if name.is_empty() {
            return Err(GaiaError::InvalidRequest("country name is required".to_string()));
        }
        let key = Self::cache_key(name);

        if let Some(summary) = self.store.get(&key).await {
            debug!("Summary cache hit for {:?}", key);
            return Ok(Self::record(name, summary, true));
        }

        let gate = {
            let mut in_flight = self.in_flight.lock().await;
            Arc::clone(in_flight.entry(key.clone()).or_default())
        };
        let _turn = gate.lock().await;

        // Another request may have generated while this one waited.
        let outcome = match self.store.get(&key).await {
            Some(summary) => Ok(Self::record(name, summary, true)),
            None => self.generate(name, &key).await,
        };

        {
            let mut in_flight = self.in_flight.lock().await;
            // map + this request; more means someone is queued on the gate
            if Arc::strong_count(&gate) == 2 {
                in_flight.remove(&key);
            }
        }

        outcome
    }

    async fn generate(&self, name: &str, key: &str) -> GaiaResult<SummaryRecord> {
        info!("Generating summary for {:?}", name);
        match self.generator.generate(name).await {
            Ok(text) => {
                let stored = self.store.insert_if_absent(key, text).await;
                Ok(Self::record(name, stored, false))
            }
            Err(e) => {
                warn!("Summary generation for {:?} failed: {}", name, e);
                Err(GaiaError::from(e))
            }
        }
    }

    fn record(country: &str, summary: String, from_cache: bool) -> SummaryRecord {
        SummaryRecord {
            country: country.to_string(),
            summary,
            from_cache,
        }
    }
}
