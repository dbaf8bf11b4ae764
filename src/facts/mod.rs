//! Facts provider
//!
//! Mandatory country data: a lookup that cannot be answered here fails the
//! whole country request.

pub mod client;

pub use client::RestCountriesClient;

use crate::country::{CountryCode, CountryFacts, SearchHit};
use crate::error::GaiaResult;
use async_trait::async_trait;

/// REST-style country facts service
///
/// Implementations do not retry; retry policy belongs to the caller.
#[async_trait]
pub trait FactProvider: Send + Sync {
    /// Look up one country by code
    ///
    /// Fails with `NotFound` when the provider has no such country and with
    /// `UpstreamUnavailable` for transport errors or unexpected responses.
    async fn fetch_facts(&self, code: &CountryCode) -> GaiaResult<CountryFacts>;

    /// Provider-side name search (substring/fuzzy); no matches is `NotFound`
    async fn search_by_name(&self, term: &str) -> GaiaResult<Vec<SearchHit>>;

    /// Every country, sorted by display name
    async fn list_all(&self) -> GaiaResult<Vec<SearchHit>>;
}
