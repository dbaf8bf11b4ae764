//! Prefix search over the facts provider's name search
//!
//! The provider matches substrings ("ger" finds Niger and Algeria); this
//! adapter narrows that to names starting with the term.

use crate::country::SearchHit;
use crate::error::{GaiaError, GaiaResult};
use crate::facts::FactProvider;
use std::sync::Arc;
use tracing::debug;

pub struct SearchIndex {
    facts: Arc<dyn FactProvider>,
}

impl SearchIndex {
    pub fn new(facts: Arc<dyn FactProvider>) -> Self {
        Self { facts }
    }

    /// Countries whose display name starts with `term`, case-insensitively
    ///
    /// A blank term returns an empty list without touching the provider;
    /// provider-side "no matches" is also an empty list.
    pub async fn search(&self, term: &str) -> GaiaResult<Vec<SearchHit>> {
        let prefix = term.trim().to_lowercase();
        if prefix.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = match self.facts.search_by_name(term).await {
            Ok(hits) => hits,
            Err(GaiaError::NotFound(_)) => Vec::new(),
            Err(other) => return Err(other),
        };

        let total = candidates.len();
        let hits: Vec<SearchHit> = candidates
            .into_iter()
            .filter(|hit| hit.display_name.to_lowercase().starts_with(&prefix))
            .collect();

        debug!("Search {:?}: {} of {} provider matches kept", term, hits.len(), total);
        Ok(hits)
    }

    /// Full country listing
    pub async fn list_all(&self) -> GaiaResult<Vec<SearchHit>> {
        self.facts.list_all().await
    }
}
