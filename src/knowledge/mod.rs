//! Knowledge graph enrichment
//!
//! Socio-economic and cultural fields the facts provider does not carry,
//! fetched from a SPARQL endpoint in two independent queries plus a media
//! listing chained off the first. Everything here is optional data: the
//! client reports what went wrong as [`Degradation`]s instead of failing.

pub mod client;
pub mod media;
pub mod query;
pub mod results;

pub use client::{KnowledgeClient, KnowledgeTimeouts, WikidataEndpoint};
pub use media::{MediaAsset, MediaKind, Rendition, WikimediaMediaSource};
pub use results::{QuerySolution, SelectResults};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Why one knowledge branch produced nothing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KnowledgeError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("unreadable response: {0}")]
    Parse(String),

    #[error("no matching row")]
    NoRows,
}

pub type KnowledgeResult<T> = Result<T, KnowledgeError>;

/// Tabular query interface of the knowledge graph
#[async_trait]
pub trait SparqlEndpoint: Send + Sync {
    /// Run a SELECT query
    async fn select(&self, query: &str) -> KnowledgeResult<SelectResults>;
}

/// Media listing keyed by an encyclopedia article title
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn list_media(&self, title: &str) -> KnowledgeResult<Vec<MediaAsset>>;
}

/// Knowledge-graph fields for one country; every field is independently optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub religions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethnic_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub government_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdp_per_capita: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_expectancy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literacy_rate: Option<f64>,
    /// English encyclopedia article title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<MediaAsset>>,
}

impl KnowledgeFields {
    /// True when nothing worth showing was found
    pub fn is_empty(&self) -> bool {
        self.religions.is_none()
            && self.ethnic_groups.is_none()
            && self.government_type.is_none()
            && self.hdi.is_none()
            && self.gdp_per_capita.is_none()
            && self.life_expectancy.is_none()
            && self.literacy_rate.is_none()
            && self.article_title.is_none()
            && self.images.as_ref().map_or(true, Vec::is_empty)
    }
}

/// The three sub-fetches of a knowledge lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnowledgeBranch {
    Fast,
    Slow,
    Media,
}

impl fmt::Display for KnowledgeBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KnowledgeBranch::Fast => "fast query",
            KnowledgeBranch::Slow => "slow query",
            KnowledgeBranch::Media => "media listing",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Degradation {
    pub branch: KnowledgeBranch,
    pub error: KnowledgeError,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.branch, self.error)
    }
}

/// Result of a knowledge lookup, keeping the reasons for any missing half
#[derive(Debug, Clone, PartialEq)]
pub enum KnowledgeOutcome {
    /// Every branch delivered
    Complete(KnowledgeFields),
    /// Some branches degraded but something usable remains
    Partial {
        fields: KnowledgeFields,
        degraded: Vec<Degradation>,
    },
    /// Nothing usable
    Empty { degraded: Vec<Degradation> },
}

impl KnowledgeOutcome {
    pub fn from_parts(fields: KnowledgeFields, degraded: Vec<Degradation>) -> Self {
        if fields.is_empty() {
            KnowledgeOutcome::Empty { degraded }
        } else if degraded.is_empty() {
            KnowledgeOutcome::Complete(fields)
        } else {
            KnowledgeOutcome::Partial { fields, degraded }
        }
    }

    pub fn fields(&self) -> Option<&KnowledgeFields> {
        match self {
            KnowledgeOutcome::Complete(fields) | KnowledgeOutcome::Partial { fields, .. } => {
                Some(fields)
            }
            KnowledgeOutcome::Empty { .. } => None,
        }
    }

    pub fn degraded(&self) -> &[Degradation] {
        match self {
            KnowledgeOutcome::Complete(_) => &[],
            KnowledgeOutcome::Partial { degraded, .. } | KnowledgeOutcome::Empty { degraded } => {
                degraded
            }
        }
    }

    /// Collapse to the optional record exposed to callers
    pub fn into_fields(self) -> Option<KnowledgeFields> {
        match self {
            KnowledgeOutcome::Complete(fields) | KnowledgeOutcome::Partial { fields, .. } => {
                Some(fields)
            }
            KnowledgeOutcome::Empty { .. } => None,
        }
    }
}
