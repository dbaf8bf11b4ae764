//! Country detail aggregation
//!
//! Facts and knowledge are fetched concurrently and joined with wait-for-all
//! semantics, so the detail costs max(facts, knowledge) rather than the sum.
//! Only the facts lookup can fail the aggregate.

use crate::country::{CountryCode, CountryDetail, CountryFacts};
use crate::error::GaiaResult;
use crate::facts::FactProvider;
use crate::knowledge::{KnowledgeClient, KnowledgeOutcome};
use std::sync::Arc;
use tracing::{debug, info};

pub struct Aggregator {
    facts: Arc<dyn FactProvider>,
    knowledge: Arc<KnowledgeClient>,
}

impl Aggregator {
    pub fn new(facts: Arc<dyn FactProvider>, knowledge: Arc<KnowledgeClient>) -> Self {
        Self { facts, knowledge }
    }

    /// Facts plus optional knowledge for one country
    ///
    /// A knowledge lookup that degraded completely is reported as absent
    /// (`knowledge: None`), never as an error.
    pub async fn fetch_country_detail(&self, raw_code: &str) -> GaiaResult<CountryDetail> {
        let code = CountryCode::parse(raw_code)?;

        let (facts, knowledge) = tokio::join!(
            self.facts.fetch_facts(&code),
            self.knowledge.fetch_knowledge(&code),
        );
        let facts = facts?;

        if !knowledge.degraded().is_empty() {
            info!(
                "Serving {} with degraded knowledge: {}",
                code,
                knowledge
                    .degraded()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ")
            );
        }

        Ok(CountryDetail {
            facts,
            knowledge: knowledge.into_fields(),
        })
    }

    /// Facts only
    pub async fn fetch_facts(&self, raw_code: &str) -> GaiaResult<CountryFacts> {
        let code = CountryCode::parse(raw_code)?;
        self.facts.fetch_facts(&code).await
    }

    /// Knowledge only; fails solely on a malformed code
    pub async fn fetch_knowledge(&self, raw_code: &str) -> GaiaResult<KnowledgeOutcome> {
        let code = CountryCode::parse(raw_code)?;
        let outcome = self.knowledge.fetch_knowledge(&code).await;
        debug!("Knowledge-only lookup for {} settled", code);
        Ok(outcome)
    }
}
