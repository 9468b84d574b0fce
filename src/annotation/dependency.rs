//! Typed syntactic dependencies between tokens of one sentence.

use serde::{Deserialize, Serialize};

/// Relation name that marks the governing token of a sentence.
pub const ROOT_RELATION: &str = "ROOT";

/// A directed, labeled syntactic edge between two token identifiers local to
/// one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedDependency {
    /// Token identifier of the governor.
    pub source: String,
    /// Token identifier of the dependent.
    pub target: String,
    /// Relation name (e.g. `nsubj`, `dobj`, `ROOT`).
    pub name: String,
    /// Optional sub-label refining the relation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific: Option<String>,
}

impl TypedDependency {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            name: name.into(),
            specific: None,
        }
    }

    /// Set the sub-label.
    pub fn with_specific(mut self, specific: impl Into<String>) -> Self {
        self.specific = Some(specific.into());
        self
    }

    /// Whether this dependency marks the governing token.
    pub fn is_root(&self) -> bool {
        self.name.eq_ignore_ascii_case(ROOT_RELATION)
    }
}
