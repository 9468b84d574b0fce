//! Depth-bounded concept hierarchy enrichment.
//!
//! Expands a tag into its ontology neighbors by querying the lexical
//! knowledge graph once per visited concept, filtering edges by relation and
//! language, and attaching the discovered structure back onto the sentence's
//! tag arena as parent links.
//!
//! The traversal is depth-first and sequential; no visited-set is kept, so a
//! concept reachable from itself through a longer path is revisited, bounded
//! only by the `depth` parameter and the graph's branching factor.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use moka::future::Cache;
use tracing::{debug, warn};

use crate::annotation::{Sentence, Tag, TagId};
use crate::config::{CacheConfig, EnrichmentConfig};
use crate::error::Result;
use crate::ontology::{ConceptResolver, OntologyClient};

/// Relations admitted by default, matching the common hierarchy-bearing
/// subset of the lexical knowledge graph.
pub const DEFAULT_ADMITTED_RELATIONS: &[&str] = &[
    "RelatedTo",
    "IsA",
    "PartOf",
    "AtLocation",
    "Synonym",
    "MemberOf",
    "HasA",
    "CausesDesire",
];

/// Default lookup language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default traversal depth.
pub const DEFAULT_DEPTH: u32 = 2;

/// Parameters of one hierarchy import.
#[derive(Debug, Clone)]
pub struct EnrichmentRequest {
    /// Lookup language.
    pub language: String,
    /// When set, admit only edges whose both endpoints are in `language`.
    pub filter_language: bool,
    /// Maximum traversal depth.
    pub depth: u32,
    /// Substring-matched relation allowlist. Empty admits every relation.
    pub admitted_relations: Vec<String>,
}

impl Default for EnrichmentRequest {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

impl EnrichmentRequest {
    /// Request with default depth and admitted relations.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            filter_language: false,
            depth: DEFAULT_DEPTH,
            admitted_relations: DEFAULT_ADMITTED_RELATIONS
                .iter()
                .map(|r| r.to_string())
                .collect(),
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_filter_language(mut self, filter: bool) -> Self {
        self.filter_language = filter;
        self
    }

    /// Replace the relation allowlist. An empty list admits every relation.
    pub fn with_admitted_relations(
        mut self,
        relations: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.admitted_relations = relations.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&EnrichmentConfig> for EnrichmentRequest {
    fn from(config: &EnrichmentConfig) -> Self {
        Self {
            language: config.language.clone(),
            filter_language: config.filter_language,
            depth: config.depth,
            admitted_relations: config.admitted_relations.clone(),
        }
    }
}

/// One failed expansion branch.
#[derive(Debug, Clone)]
pub struct BranchFailure {
    /// Normalized lookup key of the branch.
    pub lemma: String,
    /// Lookup language.
    pub language: String,
    /// What went wrong.
    pub reason: String,
}

/// Result of a hierarchy import.
///
/// Sibling branches continue independently when one fails, so an outcome
/// can carry both linked neighbors and failures.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentOutcome {
    /// Newly linked neighbor tags, in link order.
    pub linked: Vec<TagId>,
    /// Branches that failed and were treated as empty.
    pub failures: Vec<BranchFailure>,
}

impl EnrichmentOutcome {
    /// Whether some branches failed while others were linked.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Recursive, depth-bounded hierarchy importer.
///
/// Holds no mutable state of its own besides the resolution cache, so one
/// enricher can serve concurrent callers working on different sentences.
pub struct ConceptEnricher {
    client: Arc<dyn OntologyClient>,
    resolver: Arc<dyn ConceptResolver>,
    /// Resolution memo keyed by `language/lemma`. Bounded and time-evicted;
    /// the single cache call site is [`ConceptEnricher::resolve_concept`].
    cache: Cache<String, Tag>,
}

impl ConceptEnricher {
    /// Create an enricher with default cache bounds.
    pub fn new(client: Arc<dyn OntologyClient>, resolver: Arc<dyn ConceptResolver>) -> Self {
        Self::with_cache(client, resolver, &CacheConfig::default())
    }

    /// Create an enricher with explicit cache bounds.
    pub fn with_cache(
        client: Arc<dyn OntologyClient>,
        resolver: Arc<dyn ConceptResolver>,
        config: &CacheConfig,
    ) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .build();
        Self {
            client,
            resolver,
            cache,
        }
    }

    /// Expand `tag` into its hierarchical neighbors, linking discovered
    /// concepts into the sentence's arena.
    pub async fn import_hierarchy(
        &self,
        sentence: &mut Sentence,
        tag: TagId,
        request: &EnrichmentRequest,
    ) -> Result<EnrichmentOutcome> {
        let mut outcome = EnrichmentOutcome::default();
        self.expand(sentence, tag, request, request.depth, &mut outcome)
            .await;
        Ok(outcome)
    }

    /// Expand one tag at the given remaining depth.
    ///
    /// When the tag is the edge's start endpoint the neighbor is expanded
    /// first (at `depth - 1`) and then linked as a parent of the tag. When
    /// the tag is the end endpoint the tag itself becomes a parent of the
    /// neighbor, and no recursion happens in that direction.
    fn expand<'a>(
        &'a self,
        sentence: &'a mut Sentence,
        tag: TagId,
        request: &'a EnrichmentRequest,
        depth: u32,
        outcome: &'a mut EnrichmentOutcome,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let key = normalize_lemma(&sentence.tag(tag).lemma);

            let edges = match self.client.lookup(&key, &request.language).await {
                Ok(edges) => edges,
                Err(err) => {
                    warn!(
                        lemma = %key,
                        language = %request.language,
                        error = %err,
                        "ontology lookup failed, treating branch as empty"
                    );
                    outcome.failures.push(BranchFailure {
                        lemma: key,
                        language: request.language.clone(),
                        reason: err.to_string(),
                    });
                    return;
                }
            };

            for edge in edges {
                if !relation_admitted(&request.admitted_relations, &edge.relation) {
                    continue;
                }
                let starts_here = edge.start.eq_ignore_ascii_case(&key);
                let ends_here = edge.end.eq_ignore_ascii_case(&key);
                if !starts_here && !ends_here {
                    continue;
                }
                if request.filter_language
                    && !(edge.start_language.eq_ignore_ascii_case(&request.language)
                        && edge.end_language.eq_ignore_ascii_case(&request.language))
                {
                    continue;
                }

                if starts_here {
                    let neighbor = self.resolve_concept(&edge.end, &edge.end_language).await;
                    let neighbor_id = sentence.intern_tag(neighbor);
                    if depth > 1 {
                        self.expand(sentence, neighbor_id, request, depth - 1, outcome)
                            .await;
                    }
                    sentence
                        .tag_mut(tag)
                        .add_parent(&edge.relation, neighbor_id, edge.weight);
                    outcome.linked.push(neighbor_id);
                } else {
                    let neighbor = self
                        .resolve_concept(&edge.start, &edge.start_language)
                        .await;
                    let neighbor_id = sentence.intern_tag(neighbor);
                    sentence
                        .tag_mut(neighbor_id)
                        .add_parent(&edge.relation, tag, edge.weight);
                    outcome.linked.push(neighbor_id);
                }
            }
        })
    }

    /// Resolve a concept surface form into a tag, memoized by
    /// (lemma, language). Resolution failure falls back to a bare tag.
    async fn resolve_concept(&self, surface: &str, language: &str) -> Tag {
        let key = format!("{}/{}", language, surface);
        if let Some(tag) = self.cache.get(&key).await {
            return tag;
        }

        let tag = match self.resolver.resolve(surface, language).await {
            Ok(Some(tag)) => tag,
            Ok(None) => Tag::new(surface, language),
            Err(err) => {
                debug!(
                    surface,
                    language,
                    error = %err,
                    "concept resolution failed, synthesizing bare tag"
                );
                Tag::new(surface, language)
            }
        };

        self.cache.insert(key, tag.clone()).await;
        tag
    }
}

/// Normalize a lemma into its ontology lookup key.
fn normalize_lemma(lemma: &str) -> String {
    lemma.to_lowercase().replace(' ', "_")
}

/// An empty allowlist admits everything; otherwise the relation must contain
/// one of the admitted names.
fn relation_admitted(admitted: &[String], relation: &str) -> bool {
    admitted.is_empty() || admitted.iter().any(|a| relation.contains(a.as_str()))
}
