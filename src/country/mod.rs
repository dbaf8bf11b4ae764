//! Country data model
//!
//! Facts come from the facts provider and are mandatory; knowledge-graph
//! fields are optional and attached only when the knowledge fetch produced
//! something.

mod code;
mod facts;

pub use code::CountryCode;
pub use facts::{CountryFacts, CountryName, Currency, ImageRefs, SearchHit};

use crate::knowledge::KnowledgeFields;
use serde::{Deserialize, Serialize};

/// Facts plus optional knowledge-graph fields
///
/// `knowledge` is `None` when the knowledge fetch degraded completely, and is
/// then omitted from the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryDetail {
    #[serde(flatten)]
    pub facts: CountryFacts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge: Option<KnowledgeFields>,
}
