//! Knowledge client: fast/slow SPARQL queries and the chained media listing

use super::query::{self, fast_vars, slow_vars, LIST_SEPARATOR};
use super::{
    Degradation, KnowledgeBranch, KnowledgeError, KnowledgeFields, KnowledgeOutcome,
    KnowledgeResult, MediaAsset, MediaSource, QuerySolution, SelectResults, SparqlEndpoint,
    WikimediaMediaSource,
};
use crate::config::KnowledgeConfig;
use crate::country::CountryCode;
use crate::error::{GaiaError, GaiaResult};
use crate::upstream;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Per-branch time limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeTimeouts {
    pub fast: Duration,
    pub slow: Duration,
    pub media: Duration,
}

impl Default for KnowledgeTimeouts {
    fn default() -> Self {
        Self {
            fast: Duration::from_secs(8),
            slow: Duration::from_secs(15),
            media: Duration::from_secs(8),
        }
    }
}

impl From<&KnowledgeConfig> for KnowledgeTimeouts {
    fn from(config: &KnowledgeConfig) -> Self {
        Self {
            fast: Duration::from_millis(config.fast_timeout_ms),
            slow: Duration::from_millis(config.slow_timeout_ms),
            media: Duration::from_millis(config.media_timeout_ms),
        }
    }
}

/// Fetches [`KnowledgeFields`] for a country; never fails
pub struct KnowledgeClient {
    endpoint: Arc<dyn SparqlEndpoint>,
    media: Arc<dyn MediaSource>,
    timeouts: KnowledgeTimeouts,
}

impl KnowledgeClient {
    pub fn new(
        endpoint: Arc<dyn SparqlEndpoint>,
        media: Arc<dyn MediaSource>,
        timeouts: KnowledgeTimeouts,
    ) -> Self {
        Self { endpoint, media, timeouts }
    }

    /// Wikidata + Wikimedia clients from configuration
    pub fn from_config(config: &KnowledgeConfig, user_agent: &str) -> GaiaResult<Self> {
        let client = upstream::http_client(user_agent, None)
            .map_err(|e| GaiaError::Config(e.to_string()))?;
        let endpoint = WikidataEndpoint::new(client.clone(), &config.sparql_url)?;
        let media = WikimediaMediaSource::new(client, &config.media_base_url);
        Ok(Self::new(
            Arc::new(endpoint),
            Arc::new(media),
            KnowledgeTimeouts::from(config),
        ))
    }

    /// Run both queries concurrently, chain the media listing off the fast
    /// one, and merge whatever settled.
    pub async fn fetch_knowledge(&self, code: &CountryCode) -> KnowledgeOutcome {
        let fast_branch = async {
            let fast = self.first_row(query::fast_query(code), self.timeouts.fast).await;
            let title = fast
                .as_ref()
                .ok()
                .and_then(|row| row.get(fast_vars::ARTICLE_TITLE))
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            let media = match title {
                Some(title) => Some(self.list_media(&title).await),
                None => None,
            };
            (fast, media)
        };
        let slow_branch = self.first_row(query::slow_query(code), self.timeouts.slow);

        let ((fast, media), slow) = tokio::join!(fast_branch, slow_branch);

        let mut fields = KnowledgeFields::default();
        let mut degraded = Vec::new();

        match fast {
            Ok(row) => apply_fast_row(&mut fields, &row),
            Err(error) => degraded.push(degrade(code, KnowledgeBranch::Fast, error)),
        }
        match slow {
            Ok(row) => apply_slow_row(&mut fields, &row),
            Err(error) => degraded.push(degrade(code, KnowledgeBranch::Slow, error)),
        }
        match media {
            Some(Ok(images)) => fields.images = Some(images),
            Some(Err(error)) => {
                fields.images = Some(Vec::new());
                degraded.push(degrade(code, KnowledgeBranch::Media, error));
            }
            None => {}
        }

        debug!("Knowledge for {}: {} degraded branch(es)", code, degraded.len());
        KnowledgeOutcome::from_parts(fields, degraded)
    }

    async fn first_row(&self, query: String, limit: Duration) -> KnowledgeResult<QuerySolution> {
        let results = timeout(limit, self.endpoint.select(&query))
            .await
            .map_err(|_| KnowledgeError::Timeout(limit))??;
        results.solutions.into_iter().next().ok_or(KnowledgeError::NoRows)
    }

    async fn list_media(&self, title: &str) -> KnowledgeResult<Vec<MediaAsset>> {
        let limit = self.timeouts.media;
        timeout(limit, self.media.list_media(title))
            .await
            .map_err(|_| KnowledgeError::Timeout(limit))?
    }
}

fn degrade(code: &CountryCode, branch: KnowledgeBranch, error: KnowledgeError) -> Degradation {
    warn!("Knowledge {} for {} degraded: {}", branch, code, error);
    Degradation { branch, error }
}

fn apply_fast_row(fields: &mut KnowledgeFields, row: &QuerySolution) {
    fields.hdi = parse_number(row.get(fast_vars::HDI));
    fields.gdp_per_capita = parse_number(row.get(fast_vars::GDP_PER_CAPITA));
    fields.life_expectancy = parse_number(row.get(fast_vars::LIFE_EXPECTANCY));
    fields.literacy_rate = parse_number(row.get(fast_vars::LITERACY_RATE));
    fields.government_type = row.get(fast_vars::GOVERNMENT_TYPE).map(str::to_string);
    fields.article_title = row.get(fast_vars::ARTICLE_TITLE).map(str::to_string);
}

fn apply_slow_row(fields: &mut KnowledgeFields, row: &QuerySolution) {
    fields.religions = parse_list(row.get(slow_vars::RELIGIONS));
    fields.ethnic_groups = parse_list(row.get(slow_vars::ETHNIC_GROUPS));
}

/// Unparseable or non-finite numbers count as absent
fn parse_number(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn parse_list(value: Option<&str>) -> Option<Vec<String>> {
    value.map(|joined| {
        joined
            .split(LIST_SEPARATOR)
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    })
}

/// SPARQL protocol client (GET with `query` and `format=json`)
pub struct WikidataEndpoint {
    client: Client,
    url: Url,
}

impl WikidataEndpoint {
    pub fn new(client: Client, url: &str) -> GaiaResult<Self> {
        let url = Url::parse(url)
            .map_err(|e| GaiaError::Config(format!("invalid SPARQL endpoint {:?}: {}", url, e)))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl SparqlEndpoint for WikidataEndpoint {
    async fn select(&self, query: &str) -> KnowledgeResult<SelectResults> {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("format", "json");

        let resp = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/sparql-results+json")
            .send()
            .await
            .map_err(|e| KnowledgeError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(KnowledgeError::Status(resp.status().as_u16()));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| KnowledgeError::Network(e.to_string()))?;
        SelectResults::from_json(&bytes)
    }
}
