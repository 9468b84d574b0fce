//! Annograph: sentence annotation graph materializer with ontology
//! enrichment.
//!
//! Takes the in-memory annotation model of one sentence produced by an
//! upstream NLP pipeline and projects it into a labeled-property-graph
//! store, and expands concept tags against an external lexical knowledge
//! graph, attaching the discovered hierarchy back onto the model before it
//! is persisted.

pub mod annotation;
pub mod config;
pub mod error;
pub mod graph;
pub mod ontology;

pub use annotation::{
    Occurrence, OccurrenceRef, ParentLink, Phrase, PhraseOccurrence, Sentence, SentimentLevel,
    Span, Tag, TagId, TypedDependency,
};
pub use config::{CacheConfig, Config, EnrichmentConfig, OntologyConfig};
pub use error::{
    AnnographError, AnnotationError, ConfigError, GraphError, OntologyError, Result,
};
pub use graph::{
    Direction, GraphStats, GraphStore, MemoryGraphStore, NodeId, PersistOptions, Properties,
    RelId, RelationshipRef, SentenceMaterializer, Value,
};
pub use ontology::{
    BareResolver, BranchFailure, ConceptEdge, ConceptEnricher, ConceptResolver,
    EnrichmentOutcome, EnrichmentRequest, HttpOntologyClient, OntologyClient,
    StaticOntologyClient,
};
