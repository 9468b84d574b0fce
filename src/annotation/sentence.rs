//! One annotated sentence and its tag arena.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::annotation::{
    Occurrence, Phrase, PhraseOccurrence, SentimentLevel, Span, Tag, TagId, TypedDependency,
};
use crate::error::{AnnotationError, Result};

/// A fully annotated sentence.
///
/// The sentence owns every [`Tag`] it references in an internal arena: tags
/// inserted by the upstream pipeline through [`Sentence::add_tag`] plus
/// concept tags discovered by ontology enrichment, all addressed by
/// [`TagId`]. Identity within a document is the sentence number; the content
/// fingerprint ties the persisted node back to the raw text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentence {
    /// Raw sentence text.
    text: String,
    /// Caller-supplied position of the sentence within its document.
    sentence_number: u32,
    /// Sentence-level sentiment.
    sentiment: SentimentLevel,
    /// Tag arena. Never shrinks; `TagId`s stay valid for the sentence's life.
    tags: Vec<Tag>,
    /// Lemma -> arena id for tags that are members of this sentence.
    lemma_index: BTreeMap<String, TagId>,
    /// `language/lemma` -> arena id across the whole arena, used to intern
    /// concept tags discovered during enrichment.
    arena_index: HashMap<String, TagId>,
    /// Begin offset -> mentions starting there. Multiple tags may share a
    /// begin offset.
    tag_occurrences: BTreeMap<i64, Vec<Occurrence>>,
    /// Begin -> end -> phrase mention. Last write wins at an exact span.
    phrase_occurrences: BTreeMap<i64, BTreeMap<i64, PhraseOccurrence>>,
    /// Ordered dependency edges.
    typed_dependencies: Vec<TypedDependency>,
}

fn arena_key(lemma: &str, language: &str) -> String {
    format!("{}/{}", language, lemma)
}

impl Sentence {
    /// Create an empty sentence.
    pub fn new(text: impl Into<String>, sentence_number: u32) -> Self {
        Self {
            text: text.into(),
            sentence_number,
            sentiment: SentimentLevel::default(),
            tags: Vec::new(),
            lemma_index: BTreeMap::new(),
            arena_index: HashMap::new(),
            tag_occurrences: BTreeMap::new(),
            phrase_occurrences: BTreeMap::new(),
            typed_dependencies: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sentence_number(&self) -> u32 {
        self.sentence_number
    }

    pub fn sentiment(&self) -> SentimentLevel {
        self.sentiment
    }

    pub fn set_sentiment(&mut self, sentiment: SentimentLevel) {
        self.sentiment = sentiment;
    }

    /// Stable hex fingerprint of the raw text, part of downstream identity.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// Add a tag to the sentence.
    ///
    /// If a tag with the same lemma is already a member, its multiplicity is
    /// incremented and the existing id returned; the incoming tag is dropped.
    pub fn add_tag(&mut self, tag: Tag) -> TagId {
        if let Some(&existing) = self.lemma_index.get(&tag.lemma) {
            self.tags[existing.0].inc_multiplicity();
            return existing;
        }
        let key = arena_key(&tag.lemma, &tag.language);
        let lemma = tag.lemma.clone();
        let id = TagId(self.tags.len());
        self.tags.push(tag);
        self.lemma_index.insert(lemma, id);
        self.arena_index.insert(key, id);
        id
    }

    /// Intern a concept tag discovered by enrichment.
    ///
    /// Keyed by (lemma, language) over the whole arena, so a concept
    /// reachable through several ontology paths resolves to one `TagId`.
    /// Does not make the tag a sentence member and never bumps multiplicity.
    pub fn intern_tag(&mut self, tag: Tag) -> TagId {
        let key = arena_key(&tag.lemma, &tag.language);
        if let Some(&existing) = self.arena_index.get(&key) {
            return existing;
        }
        let id = TagId(self.tags.len());
        self.tags.push(tag);
        self.arena_index.insert(key, id);
        id
    }

    /// Resolve a tag by arena id.
    pub fn tag(&self, id: TagId) -> &Tag {
        &self.tags[id.0]
    }

    /// Resolve a tag mutably by arena id.
    pub fn tag_mut(&mut self, id: TagId) -> &mut Tag {
        &mut self.tags[id.0]
    }

    /// Look up a sentence-member tag by lemma.
    pub fn tag_by_lemma(&self, lemma: &str) -> Option<TagId> {
        self.lemma_index.get(lemma).copied()
    }

    /// Sentence-member tags in lemma order.
    pub fn sentence_tags(&self) -> impl Iterator<Item = (TagId, &Tag)> {
        self.lemma_index.values().map(|&id| (id, &self.tags[id.0]))
    }

    /// Total number of tags in the arena, members and interned concepts.
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    // ========================================================================
    // Tag occurrences
    // ========================================================================

    /// Add a located mention at `[begin, end)`.
    ///
    /// Rejects a negative begin offset. Mentions sharing a begin offset are
    /// kept side by side, never overwritten.
    pub fn add_occurrence(&mut self, begin: i64, end: i64, mut occurrence: Occurrence) -> Result<()> {
        let tag = self
            .tags
            .get(occurrence.tag.0)
            .ok_or(AnnotationError::UnknownTag(occurrence.tag.0))?;
        let element = format!("tag {}", tag.lemma);
        let span = Span::new(begin, end, &element)?;
        occurrence.set_span(span);
        self.tag_occurrences.entry(begin).or_default().push(occurrence);
        Ok(())
    }

    /// All mentions, keyed by begin offset.
    pub fn occurrences(&self) -> &BTreeMap<i64, Vec<Occurrence>> {
        &self.tag_occurrences
    }

    /// Mentions starting at `begin`.
    pub fn occurrences_at(&self, begin: i64) -> &[Occurrence] {
        self.tag_occurrences
            .get(&begin)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The mention at an exact span, if any.
    pub fn occurrence_at(&self, begin: i64, end: i64) -> Option<&Occurrence> {
        self.occurrences_at(begin)
            .iter()
            .find(|o| o.span().end() == end)
    }

    /// Mutable access to the mention at an exact span.
    pub fn occurrence_at_mut(&mut self, begin: i64, end: i64) -> Option<&mut Occurrence> {
        self.tag_occurrences
            .get_mut(&begin)?
            .iter_mut()
            .find(|o| o.span().end() == end)
    }

    /// First mention whose tag has the given lemma. Linear scan.
    pub fn occurrence_by_lemma(&self, lemma: &str) -> Option<&Occurrence> {
        self.tag_occurrences
            .values()
            .flatten()
            .find(|o| self.tags[o.tag.0].lemma == lemma)
    }

    /// First mention with the given surface value that carries a
    /// named-entity type. Linear scan.
    pub fn occurrence_by_value_with_ne(&self, value: &str) -> Option<&Occurrence> {
        self.tag_occurrences
            .values()
            .flatten()
            .find(|o| o.value == value && o.has_named_entity())
    }

    /// Tag of the first mention starting at `begin`.
    pub fn first_tag_at(&self, begin: i64) -> Option<TagId> {
        self.occurrences_at(begin).first().map(|o| o.tag)
    }

    // ========================================================================
    // Phrase occurrences
    // ========================================================================

    /// Add a phrase mention at `[begin, end)`.
    ///
    /// Rejects a negative begin offset. An existing mention at the exact
    /// same span is overwritten.
    pub fn add_phrase_occurrence(&mut self, begin: i64, end: i64, phrase: Phrase) -> Result<()> {
        let element = format!("phrase {}", phrase.content);
        let span = Span::new(begin, end, &element)?;
        self.phrase_occurrences
            .entry(begin)
            .or_default()
            .insert(end, PhraseOccurrence::new(phrase, span));
        Ok(())
    }

    /// All phrase mentions, keyed by begin then end offset.
    pub fn phrase_occurrences(&self) -> &BTreeMap<i64, BTreeMap<i64, PhraseOccurrence>> {
        &self.phrase_occurrences
    }

    /// The phrase at an exact span, if any.
    pub fn phrase_at(&self, begin: i64, end: i64) -> Option<&Phrase> {
        self.phrase_occurrences
            .get(&begin)
            .and_then(|ends| ends.get(&end))
            .map(|occ| &occ.phrase)
    }

    /// All phrases starting at `begin`.
    pub fn phrases_at(&self, begin: i64) -> Vec<&Phrase> {
        self.phrase_occurrences
            .get(&begin)
            .map(|ends| ends.values().map(|occ| &occ.phrase).collect())
            .unwrap_or_default()
    }

    // ========================================================================
    // Typed dependencies
    // ========================================================================

    /// Append a dependency edge.
    pub fn add_typed_dependency(&mut self, dependency: TypedDependency) {
        self.typed_dependencies.push(dependency);
    }

    /// Dependency edges in insertion order.
    pub fn typed_dependencies(&self) -> &[TypedDependency] {
        &self.typed_dependencies
    }
}

impl PartialEq for Sentence {
    fn eq(&self, other: &Self) -> bool {
        self.sentence_number == other.sentence_number
    }
}

impl Eq for Sentence {}

impl PartialOrd for Sentence {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sentence {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sentence_number.cmp(&other.sentence_number)
    }
}
