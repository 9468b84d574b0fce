//! Ontology client: access to an external lexical knowledge graph.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{OntologyError, Result};

/// One edge of the external lexical knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptEdge {
    /// Start concept (normalized surface form).
    pub start: String,
    /// Language code of the start concept.
    #[serde(default)]
    pub start_language: String,
    /// End concept (normalized surface form).
    pub end: String,
    /// Language code of the end concept.
    #[serde(default)]
    pub end_language: String,
    /// Relation name (e.g. `IsA`, `RelatedTo`).
    pub relation: String,
    /// Edge weight.
    #[serde(default)]
    pub weight: f64,
}

impl ConceptEdge {
    /// Construct an edge with both endpoints in one language.
    pub fn new(
        start: impl Into<String>,
        relation: impl Into<String>,
        end: impl Into<String>,
        language: impl Into<String>,
        weight: f64,
    ) -> Self {
        let language = language.into();
        Self {
            start: start.into(),
            start_language: language.clone(),
            end: end.into(),
            end_language: language,
            relation: relation.into(),
            weight,
        }
    }
}

/// Synchronous request/response access to the lexical knowledge graph.
///
/// One call returns all edges touching `key` in `language`. Failures surface
/// as errors; the enricher downgrades them to empty results per branch.
/// Timeouts are this layer's responsibility, not the enricher's.
#[async_trait]
pub trait OntologyClient: Send + Sync {
    async fn lookup(&self, key: &str, language: &str) -> Result<Vec<ConceptEdge>>;
}

/// Wire shape of a lookup response.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    edges: Vec<ConceptEdge>,
}

/// HTTP implementation of [`OntologyClient`].
///
/// Looks concepts up at `{endpoint}/c/{language}/{key}` and expects a JSON
/// body with an `edges` array.
pub struct HttpOntologyClient {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpOntologyClient {
    /// Create a client against the given endpoint with a request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(OntologyError::Request)?;
        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl OntologyClient for HttpOntologyClient {
    async fn lookup(&self, key: &str, language: &str) -> Result<Vec<ConceptEdge>> {
        let url = format!("{}/c/{}/{}", self.endpoint, language, key);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(OntologyError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(OntologyError::Status(status.as_u16()).into());
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|err| OntologyError::MalformedResponse(err.to_string()))?;
        Ok(body.edges)
    }
}

/// Static in-memory implementation of [`OntologyClient`].
///
/// Serves a fixed edge set, filtered by endpoint match on the lookup key.
/// Useful for tests and offline snapshots.
#[derive(Debug, Default)]
pub struct StaticOntologyClient {
    edges: Vec<ConceptEdge>,
}

impl StaticOntologyClient {
    pub fn new(edges: Vec<ConceptEdge>) -> Self {
        Self { edges }
    }
}

#[async_trait]
impl OntologyClient for StaticOntologyClient {
    async fn lookup(&self, key: &str, _language: &str) -> Result<Vec<ConceptEdge>> {
        Ok(self
            .edges
            .iter()
            .filter(|edge| {
                edge.start.eq_ignore_ascii_case(key) || edge.end.eq_ignore_ascii_case(key)
            })
            .cloned()
            .collect())
    }
}
