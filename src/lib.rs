//! Gaia country information service
//!
//! Aggregates country data from heterogeneous upstreams into one response:
//! a REST facts provider, a SPARQL knowledge graph and a media listing.
//!
//! # Architecture
//!
//! - [`facts`]: facts provider client (mandatory data)
//! - [`knowledge`]: knowledge graph client; two concurrent queries plus a
//!   media listing chained off the fast one, degrading instead of failing
//! - [`aggregator`]: concurrent facts + knowledge join
//! - [`search`]: prefix search over the provider's name search
//! - [`summary`]: cached LLM summaries with one generation per name
//! - [`http`]: axum request boundary with a uniform response envelope
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gaia::config::GaiaConfig;
//! use gaia::http::AppState;
//!
//! # async fn run() -> gaia::GaiaResult<()> {
//! let config = GaiaConfig::default();
//! let state = AppState::from_config(&config)?;
//!
//! let detail = state.aggregator.fetch_country_detail("deu").await?;
//! println!("{} ({})", detail.facts.name.common, detail.facts.cca3);
//! if let Some(knowledge) = &detail.knowledge {
//!     println!("HDI: {:?}", knowledge.hdi);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod aggregator;
pub mod config;
pub mod country;
pub mod error;
pub mod facts;
pub mod http;
pub mod knowledge;
pub mod search;
pub mod summary;

mod upstream;

// Re-export main types for convenience
pub use aggregator::Aggregator;
pub use config::GaiaConfig;
pub use country::{CountryCode, CountryDetail, CountryFacts, SearchHit};
pub use error::{GaiaError, GaiaResult, StatusClass};
pub use facts::{FactProvider, RestCountriesClient};
pub use http::{ApiEnvelope, AppState, HttpServer};
pub use knowledge::{
    KnowledgeClient, KnowledgeFields, KnowledgeOutcome, KnowledgeTimeouts, MediaAsset,
    MediaSource, SparqlEndpoint,
};
pub use search::SearchIndex;
pub use summary::{InMemorySummaryStore, SummaryRecord, SummaryService, SummaryStore};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
