//! Located mentions of tags and phrases within raw text.

use serde::{Deserialize, Serialize};

use crate::annotation::{Phrase, TagId};
use crate::error::AnnotationError;

/// A half-open character span `[begin, end)` into the raw sentence text.
///
/// The begin offset must be non-negative; construction rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    begin: i64,
    end: i64,
}

impl Span {
    /// Create a span, rejecting a negative begin offset.
    pub fn new(begin: i64, end: i64, element: &str) -> Result<Self, AnnotationError> {
        if begin < 0 {
            return Err(AnnotationError::NegativeOffset {
                begin,
                element: element.to_string(),
            });
        }
        Ok(Self { begin, end })
    }

    pub fn begin(&self) -> i64 {
        self.begin
    }

    pub fn end(&self) -> i64 {
        self.end
    }
}

/// Back-reference from a mention to its coreference antecedent, addressed
/// structurally by the antecedent's sentence number and span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceRef {
    /// Sentence number of the antecedent within the same document.
    pub sentence_number: u32,
    /// Span of the antecedent occurrence in that sentence.
    pub span: Span,
}

impl OccurrenceRef {
    pub fn new(sentence_number: u32, span: Span) -> Self {
        Self {
            sentence_number,
            span,
        }
    }
}

/// A located mention of a [`Tag`](crate::annotation::Tag).
///
/// Created fresh per mention; the model never deduplicates occurrences by
/// span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occurrence {
    /// The tag this mention belongs to.
    pub tag: TagId,
    /// Surface text as it appears in the sentence.
    pub value: String,
    /// Where the mention sits in the raw text.
    span: Span,
    /// Named-entity type of this particular mention, when one was detected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_entity: Option<String>,
    /// Confidence of the named-entity detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Coreference antecedent, when resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coref: Option<OccurrenceRef>,
    /// Token identifiers covered by this mention, used to resolve
    /// dependency-edge endpoints.
    #[serde(default)]
    pub token_ids: Vec<String>,
}

impl Occurrence {
    /// Create a mention of `tag` with the given surface text. The span is
    /// assigned when the occurrence is added to a sentence.
    pub fn new(tag: TagId, value: impl Into<String>) -> Self {
        Self {
            tag,
            value: value.into(),
            span: Span { begin: 0, end: 0 },
            named_entity: None,
            confidence: None,
            coref: None,
            token_ids: Vec::new(),
        }
    }

    /// Attach token identifiers for dependency resolution.
    pub fn with_tokens(mut self, token_ids: Vec<String>) -> Self {
        self.token_ids = token_ids;
        self
    }

    /// Mark this mention as a named entity.
    pub fn with_named_entity(mut self, ne: impl Into<String>, confidence: f32) -> Self {
        self.named_entity = Some(ne.into());
        self.confidence = Some(confidence);
        self
    }

    /// Attach a coreference antecedent.
    pub fn with_coreference(mut self, antecedent: OccurrenceRef) -> Self {
        self.coref = Some(antecedent);
        self
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub(crate) fn set_span(&mut self, span: Span) {
        self.span = span;
    }

    /// Whether this particular mention carries a named-entity type.
    pub fn has_named_entity(&self) -> bool {
        self.named_entity.is_some()
    }
}

/// A located mention of a [`Phrase`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseOccurrence {
    pub phrase: Phrase,
    span: Span,
}

impl PhraseOccurrence {
    pub(crate) fn new(phrase: Phrase, span: Span) -> Self {
        Self { phrase, span }
    }

    pub fn span(&self) -> Span {
        self.span
    }
}
