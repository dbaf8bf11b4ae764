//! Request boundary
//!
//! Thin axum surface over the aggregator, the search adapter and the summary
//! service. Every response, success or failure, is an [`ApiEnvelope`].

pub mod envelope;
pub mod handler;
pub mod server;

pub use envelope::{ApiEnvelope, ApiErrorBody};
pub use server::{router, HttpServer};

use crate::aggregator::Aggregator;
use crate::config::GaiaConfig;
use crate::error::{GaiaError, GaiaResult};
use crate::facts::{FactProvider, RestCountriesClient};
use crate::knowledge::KnowledgeClient;
use crate::search::SearchIndex;
use crate::summary::{InMemorySummaryStore, LlmSummaryGenerator, SummaryService};
use std::sync::Arc;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub search: Arc<SearchIndex>,
    pub summaries: Arc<SummaryService>,
}

impl AppState {
    pub fn new(
        aggregator: Arc<Aggregator>,
        search: Arc<SearchIndex>,
        summaries: Arc<SummaryService>,
    ) -> Self {
        Self { aggregator, search, summaries }
    }

    /// Wire the production clients; the summary store lives as long as the process
    pub fn from_config(config: &GaiaConfig) -> GaiaResult<Self> {
        let facts: Arc<dyn FactProvider> =
            Arc::new(RestCountriesClient::from_config(&config.facts, &config.user_agent)?);
        let knowledge = Arc::new(KnowledgeClient::from_config(&config.knowledge, &config.user_agent)?);
        let generator = Arc::new(
            LlmSummaryGenerator::new(&config.summary)
                .map_err(|e| GaiaError::Config(e.to_string()))?,
        );
        let store = Arc::new(InMemorySummaryStore::new());

        Ok(Self::new(
            Arc::new(Aggregator::new(Arc::clone(&facts), knowledge)),
            Arc::new(SearchIndex::new(facts)),
            Arc::new(SummaryService::new(store, generator)),
        ))
    }
}
