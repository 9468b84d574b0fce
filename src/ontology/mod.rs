//! Ontology enrichment layer.
//!
//! Access to an external lexical knowledge graph ([`OntologyClient`]), the
//! concept-resolution collaborator seam ([`ConceptResolver`]), and the
//! depth-bounded [`ConceptEnricher`] traversal that links discovered
//! hierarchy back onto the annotation model.

mod client;
mod enricher;
mod resolver;

pub use client::{ConceptEdge, HttpOntologyClient, OntologyClient, StaticOntologyClient};
pub use enricher::{
    BranchFailure, ConceptEnricher, EnrichmentOutcome, EnrichmentRequest,
    DEFAULT_ADMITTED_RELATIONS, DEFAULT_DEPTH, DEFAULT_LANGUAGE,
};
pub use resolver::{BareResolver, ConceptResolver};
