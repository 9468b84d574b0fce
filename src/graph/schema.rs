//! Graph schema: node labels, relationship types, and property keys.
//!
//! Resolved once into fixed constants; every materialization site refers to
//! these rather than looking names up through configuration.

/// Node labels.
pub mod labels {
    pub const SENTENCE: &str = "Sentence";
    pub const TAG: &str = "Tag";
    pub const TAG_OCCURRENCE: &str = "TagOccurrence";
    pub const PHRASE: &str = "Phrase";
    pub const PHRASE_OCCURRENCE: &str = "PhraseOccurrence";
    /// Marks the occurrence node governing a sentence's dependency tree.
    pub const ROOT: &str = "Root";
    /// Prefix for per-type named-entity labels (e.g. `NER_Location`).
    pub const NE_PREFIX: &str = "NER_";
}

/// Relationship types.
pub mod relationships {
    pub const HAS_TAG: &str = "HAS_TAG";
    pub const SENTENCE_TAG_OCCURRENCE: &str = "SENTENCE_TAG_OCCURRENCE";
    pub const TAG_OCCURRENCE_TAG: &str = "TAG_OCCURRENCE_TAG";
    pub const HAS_PHRASE: &str = "HAS_PHRASE";
    pub const SENTENCE_PHRASE_OCCURRENCE: &str = "SENTENCE_PHRASE_OCCURRENCE";
    pub const PHRASE_OCCURRENCE_PHRASE: &str = "PHRASE_OCCURRENCE_PHRASE";
    /// Tag-to-tag ontology hierarchy edge.
    pub const IS_RELATED_TO: &str = "IS_RELATED_TO";
    /// Occurrence-level coreference.
    pub const COREF: &str = "COREF";
    /// Phrase-level coreference.
    pub const COREFERENCE: &str = "COREFERENCE";
}

/// Property keys.
pub mod properties {
    pub const ID: &str = "id";
    pub const SENTENCE_NUMBER: &str = "sentenceNumber";
    pub const HASH: &str = "hash";
    pub const TEXT: &str = "text";
    /// Term frequency: tag multiplicity on the has-tag edge.
    pub const TF: &str = "tf";
    pub const LEMMA: &str = "value";
    pub const LANGUAGE: &str = "language";
    pub const POS: &str = "pos";
    pub const NE: &str = "ne";
    pub const BEGIN: &str = "startPosition";
    pub const END: &str = "endPosition";
    pub const ORIGINAL_VALUE: &str = "originalValue";
    pub const CONFIDENCE: &str = "confidence";
    pub const CONTENT: &str = "value";
    pub const PHRASE_TYPE: &str = "type";
    /// Relation name on an ontology hierarchy edge.
    pub const RELATION: &str = "type";
    pub const WEIGHT: &str = "weight";
    /// Sub-label on a dependency edge.
    pub const SPECIFIC: &str = "specific";
}

/// Phrase type recorded when the annotation carries none.
pub const DEFAULT_PHRASE_TYPE: &str = "unknown";

/// Composite key of a sentence node within the graph.
pub fn sentence_key(document_id: &str, sentence_number: u32) -> String {
    format!("{}_{}", document_id, sentence_number)
}

/// Composite key of a tag node within the graph.
pub fn tag_key(lemma: &str, language: &str) -> String {
    format!("{}_{}", lemma, language)
}
