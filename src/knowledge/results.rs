//! SPARQL SELECT results (W3C JSON results format)

use super::{KnowledgeError, KnowledgeResult};
use serde::Deserialize;
use std::collections::HashMap;

/// One bound term as it appears in the JSON results document
#[derive(Debug, Clone, Deserialize)]
struct JsonTerm {
    #[serde(rename = "type")]
    _kind: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct JsonHead {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct JsonBindings {
    #[serde(default)]
    bindings: Vec<HashMap<String, JsonTerm>>,
}

#[derive(Debug, Deserialize)]
struct JsonResults {
    head: JsonHead,
    results: JsonBindings,
}

/// Query solution (variable bindings)
///
/// Only the lexical value of each term is kept; unbound variables are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySolution {
    bindings: HashMap<String, String>,
}

impl QuerySolution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a binding
    pub fn get(&self, variable: &str) -> Option<&str> {
        self.bindings.get(variable).map(String::as_str)
    }

    /// Add a binding
    pub fn bind(&mut self, variable: impl Into<String>, value: impl Into<String>) {
        self.bindings.insert(variable.into(), value.into());
    }

    pub fn with(mut self, variable: impl Into<String>, value: impl Into<String>) -> Self {
        self.bind(variable, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Tabular result of a SELECT query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectResults {
    pub variables: Vec<String>,
    pub solutions: Vec<QuerySolution>,
}

impl SelectResults {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_solutions(solutions: Vec<QuerySolution>) -> Self {
        Self { variables: Vec::new(), solutions }
    }

    /// First row, the only one the knowledge queries ever ask for
    pub fn first(&self) -> Option<&QuerySolution> {
        self.solutions.first()
    }

    /// Parse an `application/sparql-results+json` document
    pub fn from_json(bytes: &[u8]) -> KnowledgeResult<Self> {
        let doc: JsonResults = serde_json::from_slice(bytes)
            .map_err(|e| KnowledgeError::Parse(e.to_string()))?;

        let solutions = doc
            .results
            .bindings
            .into_iter()
            .map(|row| QuerySolution {
                bindings: row.into_iter().map(|(k, term)| (k, term.value)).collect(),
            })
            .collect();

        Ok(Self { variables: doc.head.vars, solutions })
    }
}
