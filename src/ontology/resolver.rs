//! Concept resolution: enriching raw ontology neighbors with linguistic
//! features before they are linked.

use async_trait::async_trait;

use crate::annotation::Tag;
use crate::error::Result;

/// Resolves a raw concept surface form into an annotated [`Tag`].
///
/// Implemented by whatever NLP pipeline the deployment has available.
/// Returning `Ok(None)` means the concept could not be annotated; the
/// enricher then falls back to a bare synthesized tag.
#[async_trait]
pub trait ConceptResolver: Send + Sync {
    async fn resolve(&self, surface: &str, language: &str) -> Result<Option<Tag>>;
}

/// Resolver that never annotates, forcing the bare-tag fallback everywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct BareResolver;

#[async_trait]
impl ConceptResolver for BareResolver {
    async fn resolve(&self, _surface: &str, _language: &str) -> Result<Option<Tag>> {
        Ok(None)
    }
}
