//! Multi-token phrases, content-addressed across sentences.

use serde::{Deserialize, Serialize};

/// A multi-token span of interest. The literal `content` string is the
/// phrase's identity across sentences; the antecedent reference is therefore
/// recorded by content rather than by pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    /// Literal phrase text. Cross-sentence identity key.
    pub content: String,
    /// Optional phrase type (e.g. `NP`, `VP`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase_type: Option<String>,
    /// Content of the antecedent phrase, when coreference was resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Phrase {
    /// Create a phrase from its literal content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            phrase_type: None,
            reference: None,
        }
    }

    /// Set the phrase type.
    pub fn with_type(mut self, phrase_type: impl Into<String>) -> Self {
        self.phrase_type = Some(phrase_type.into());
        self
    }

    /// Record the antecedent phrase by its content.
    pub fn with_reference(mut self, content: impl Into<String>) -> Self {
        self.reference = Some(content.into());
        self
    }
}
