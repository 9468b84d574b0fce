//! Tags: canonical lexical/conceptual units.
//!
//! Tags are owned by the [`Sentence`](crate::annotation::Sentence) that first
//! creates them and are addressed by [`TagId`] arena handles. Parent links
//! discovered by ontology enrichment also go through `TagId`, so the concept
//! hierarchy is an adjacency structure rather than a web of shared pointers
//! and traversal code can keep ordinary visited-sets.

use serde::{Deserialize, Serialize};

/// Stable arena handle for a [`Tag`] within its owning sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagId(pub(crate) usize);

impl TagId {
    /// Position of the tag in the owning sentence's arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A hierarchy edge from a tag to one of its ontology parents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentLink {
    /// Relation name as reported by the ontology (e.g. `IsA`, `RelatedTo`).
    pub relation: String,
    /// Edge weight as reported by the ontology.
    pub weight: f64,
    /// The parent tag.
    pub parent: TagId,
}

/// A canonical lexical/conceptual unit, identified by its lemma.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Canonical lemma. Identity key within a sentence and within the
    /// ontology cache.
    pub lemma: String,
    /// ISO language code.
    pub language: String,
    /// Number of times this lemma occurs in the owning sentence.
    multiplicity: u32,
    /// Part-of-speech tags observed for this lemma.
    #[serde(default)]
    pub pos: Vec<String>,
    /// Named-entity tags observed for this lemma.
    #[serde(default)]
    pub ne: Vec<String>,
    /// Ordered ontology parent links.
    #[serde(default)]
    parents: Vec<ParentLink>,
}

impl Tag {
    /// Create a new tag with multiplicity 1.
    pub fn new(lemma: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lemma: lemma.into(),
            language: language.into(),
            multiplicity: 1,
            pos: Vec::new(),
            ne: Vec::new(),
            parents: Vec::new(),
        }
    }

    /// Add a part-of-speech tag.
    pub fn with_pos(mut self, pos: impl Into<String>) -> Self {
        self.pos.push(pos.into());
        self
    }

    /// Add a named-entity tag.
    pub fn with_ne(mut self, ne: impl Into<String>) -> Self {
        self.ne.push(ne.into());
        self
    }

    /// Occurrence count of this lemma within the owning sentence.
    pub fn multiplicity(&self) -> u32 {
        self.multiplicity
    }

    /// Increment the occurrence count. Monotonically non-decreasing.
    pub(crate) fn inc_multiplicity(&mut self) {
        self.multiplicity += 1;
    }

    /// Whether any named-entity tag is attached to this lemma.
    pub fn has_named_entity(&self) -> bool {
        !self.ne.is_empty()
    }

    /// Ordered ontology parent links.
    pub fn parents(&self) -> &[ParentLink] {
        &self.parents
    }

    /// Attach an ontology parent. A link with the same relation and parent
    /// is recorded once; re-adding it is a no-op.
    pub fn add_parent(&mut self, relation: impl Into<String>, parent: TagId, weight: f64) {
        let relation = relation.into();
        if self
            .parents
            .iter()
            .any(|p| p.parent == parent && p.relation == relation)
        {
            return;
        }
        self.parents.push(ParentLink {
            relation,
            weight,
            parent,
        });
    }
}
