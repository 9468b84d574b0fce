//! Error types for annograph.

use thiserror::Error;

/// Main error type for annograph operations.
#[derive(Error, Debug)]
pub enum AnnographError {
    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    #[error("Ontology error: {0}")]
    Ontology(#[from] OntologyError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Annotation-model errors. These are data-contract violations raised by the
/// in-memory model itself, never recovered locally.
#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("Begin offset cannot be negative: {begin} (for {element})")]
    NegativeOffset { begin: i64, element: String },

    #[error("Unknown tag id: {0}")]
    UnknownTag(usize),
}

/// Ontology-lookup errors (external lexical knowledge graph).
#[derive(Error, Debug)]
pub enum OntologyError {
    #[error("Lookup request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Malformed lookup response: {0}")]
    MalformedResponse(String),

    #[error("Ontology endpoint returned status {0}")]
    Status(u16),
}

/// Graph-store and materialization errors.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("A document identifier is required to persist a sentence")]
    MissingDocumentId,

    #[error("Node not found: {0}")]
    NodeNotFound(u64),

    #[error("Relationship not found: {0}")]
    RelationshipNotFound(u64),

    #[error("Store error: {0}")]
    Store(String),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Result type alias for annograph operations.
pub type Result<T> = std::result::Result<T, AnnographError>;
