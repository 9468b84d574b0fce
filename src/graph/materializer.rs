//! Sentence materialization into the graph store.
//!
//! Projects a populated [`Sentence`] into persistent nodes and
//! relationships. Repeated persistence of an unchanged sentence is
//! idempotent: sentence, tag, and phrase nodes are upserted by their
//! identity keys; occurrence and phrase-occurrence nodes are keyed by
//! (sentence, span) with an existence probe; every edge creation probes for
//! an existing edge first.
//!
//! The operation is not transactionally atomic here: a failure partway
//! through leaves prior phases' mutations in place, and the caller's
//! enclosing write scope decides whether partial work is rolled back.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info};

use crate::annotation::{Phrase, Sentence, Span, Tag, TagId, ROOT_RELATION};
use crate::error::{GraphError, Result};
use crate::graph::schema::{self, labels, properties, relationships};
use crate::graph::{Direction, GraphStore, NodeId, Properties, Value};

/// Per-call options for [`SentenceMaterializer::persist`].
#[derive(Debug, Clone, Default)]
pub struct PersistOptions {
    /// Identifier of the document the sentence belongs to. Required;
    /// persisting without one fails with [`GraphError::MissingDocumentId`].
    pub document_id: Option<String>,
    /// Batch/transaction correlation identifier supplied by the caller.
    pub tx_id: Option<String>,
}

impl PersistOptions {
    /// Options for persisting into the given document.
    pub fn for_document(document_id: impl Into<String>) -> Self {
        Self {
            document_id: Some(document_id.into()),
            tx_id: None,
        }
    }

    /// Attach a batch/transaction correlation identifier.
    pub fn with_tx(mut self, tx_id: impl Into<String>) -> Self {
        self.tx_id = Some(tx_id.into());
        self
    }
}

/// Maps populated sentences into persistent graph structure.
///
/// All mutations for one sentence are issued sequentially on the calling
/// task; the materializer holds no locks and assumes the caller already
/// holds whatever write scope the underlying store requires.
pub struct SentenceMaterializer {
    store: Arc<dyn GraphStore>,
}

impl SentenceMaterializer {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Persist one sentence, returning its node handle.
    pub async fn persist(&self, sentence: &Sentence, opts: &PersistOptions) -> Result<NodeId> {
        let document_id = opts
            .document_id
            .as_deref()
            .ok_or(GraphError::MissingDocumentId)?;

        debug!(
            document_id,
            sentence_number = sentence.sentence_number(),
            tx_id = opts.tx_id.as_deref(),
            "persisting sentence"
        );

        let sentence_node = self.upsert_sentence_node(sentence, document_id).await?;
        let tag_nodes = self.store_tags(sentence, sentence_node).await?;
        self.store_tag_hierarchy(sentence, tag_nodes).await?;
        let token_map = self.store_occurrences(sentence, sentence_node).await?;
        self.store_dependencies(sentence, &token_map).await?;
        self.store_phrases(sentence, sentence_node).await?;
        self.store_phrase_coreferences(sentence).await?;
        self.store_occurrence_coreferences(sentence, sentence_node, document_id)
            .await?;
        self.assign_sentiment_label(sentence, sentence_node).await?;

        Ok(sentence_node)
    }

    // ========================================================================
    // Sentence node
    // ========================================================================

    /// Resolve or create the sentence node keyed by (document, number) and
    /// refresh its properties.
    async fn upsert_sentence_node(
        &self,
        sentence: &Sentence,
        document_id: &str,
    ) -> Result<NodeId> {
        let key = schema::sentence_key(document_id, sentence.sentence_number());
        let node = match self
            .store
            .find_node(labels::SENTENCE, properties::ID, &Value::from(key.clone()))
            .await?
        {
            Some(node) => node,
            None => self.store.create_node(labels::SENTENCE).await?,
        };

        self.store
            .set_node_property(node, properties::ID, Value::from(key))
            .await?;
        self.store
            .set_node_property(
                node,
                properties::SENTENCE_NUMBER,
                Value::from(sentence.sentence_number()),
            )
            .await?;
        self.store
            .set_node_property(node, properties::HASH, Value::from(sentence.fingerprint()))
            .await?;
        self.store
            .set_node_property(node, properties::TEXT, Value::from(sentence.text()))
            .await?;
        Ok(node)
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// Upsert tag nodes for every sentence member and refresh the weighted
    /// has-tag edges.
    async fn store_tags(
        &self,
        sentence: &Sentence,
        sentence_node: NodeId,
    ) -> Result<HashMap<TagId, NodeId>> {
        let mut tag_nodes = HashMap::new();
        for (tag_id, tag) in sentence.sentence_tags() {
            let tag_node = self.upsert_tag_node(tag).await?;
            tag_nodes.insert(tag_id, tag_node);

            let existing = self
                .store
                .relationships(sentence_node, Direction::Outgoing, Some(relationships::HAS_TAG))
                .await?
                .into_iter()
                .find(|rel| rel.end == tag_node);

            match existing {
                Some(rel) => {
                    self.store
                        .set_relationship_property(
                            rel.id,
                            properties::TF,
                            Value::from(tag.multiplicity()),
                        )
                        .await?;
                }
                None => {
                    let mut props = Properties::new();
                    props.insert(properties::TF.to_string(), Value::from(tag.multiplicity()));
                    self.store
                        .create_relationship(
                            sentence_node,
                            tag_node,
                            relationships::HAS_TAG,
                            props,
                        )
                        .await?;
                }
            }
        }
        Ok(tag_nodes)
    }

    /// Upsert a tag node keyed by canonical (lemma, language) and refresh
    /// its properties.
    async fn upsert_tag_node(&self, tag: &Tag) -> Result<NodeId> {
        let key = schema::tag_key(&tag.lemma, &tag.language);
        let node = match self
            .store
            .find_node(labels::TAG, properties::ID, &Value::from(key.clone()))
            .await?
        {
            Some(node) => node,
            None => self.store.create_node(labels::TAG).await?,
        };

        self.store
            .set_node_property(node, properties::ID, Value::from(key))
            .await?;
        self.store
            .set_node_property(node, properties::LEMMA, Value::from(tag.lemma.as_str()))
            .await?;
        self.store
            .set_node_property(node, properties::LANGUAGE, Value::from(tag.language.as_str()))
            .await?;
        self.store
            .set_node_property(node, properties::POS, Value::from(tag.pos.clone()))
            .await?;
        self.store
            .set_node_property(node, properties::NE, Value::from(tag.ne.clone()))
            .await?;
        Ok(node)
    }

    /// Persist ontology parent links as upserted tag-to-tag edges, walking
    /// the parent closure with a visited-set so ontology cycles terminate.
    async fn store_tag_hierarchy(
        &self,
        sentence: &Sentence,
        mut tag_nodes: HashMap<TagId, NodeId>,
    ) -> Result<()> {
        let mut stack: Vec<TagId> = tag_nodes.keys().copied().collect();
        stack.sort();
        let mut visited: HashSet<TagId> = HashSet::new();

        while let Some(tag_id) = stack.pop() {
            if !visited.insert(tag_id) {
                continue;
            }
            let tag = sentence.tag(tag_id);
            if tag.parents().is_empty() {
                continue;
            }

            let child_node = match tag_nodes.get(&tag_id) {
                Some(&node) => node,
                None => {
                    let node = self.upsert_tag_node(tag).await?;
                    tag_nodes.insert(tag_id, node);
                    node
                }
            };

            for link in tag.parents() {
                let parent_node = match tag_nodes.get(&link.parent) {
                    Some(&node) => node,
                    None => {
                        let node = self.upsert_tag_node(sentence.tag(link.parent)).await?;
                        tag_nodes.insert(link.parent, node);
                        node
                    }
                };

                // Relation name distinguishes parallel hierarchy edges
                // between the same pair of tags.
                let mut matched = false;
                for rel in self
                    .store
                    .relationships(
                        child_node,
                        Direction::Outgoing,
                        Some(relationships::IS_RELATED_TO),
                    )
                    .await?
                {
                    if rel.end != parent_node {
                        continue;
                    }
                    let relation = self
                        .store
                        .relationship_property(rel.id, properties::RELATION)
                        .await?;
                    if relation.as_ref().and_then(Value::as_str) == Some(&link.relation) {
                        matched = true;
                        break;
                    }
                }
                if !matched {
                    let mut props = Properties::new();
                    props.insert(
                        properties::RELATION.to_string(),
                        Value::from(link.relation.as_str()),
                    );
                    props.insert(properties::WEIGHT.to_string(), Value::from(link.weight));
                    self.store
                        .create_relationship(
                            child_node,
                            parent_node,
                            relationships::IS_RELATED_TO,
                            props,
                        )
                        .await?;
                }

                stack.push(link.parent);
            }
        }
        Ok(())
    }

    // ========================================================================
    // Tag occurrences
    // ========================================================================

    /// Persist occurrence nodes keyed by (sentence, span) and return the
    /// token-id to occurrence-node map used for dependency resolution.
    async fn store_occurrences(
        &self,
        sentence: &Sentence,
        sentence_node: NodeId,
    ) -> Result<HashMap<String, NodeId>> {
        let mut token_map = HashMap::new();

        for occurrences in sentence.occurrences().values() {
            for occurrence in occurrences {
                let node = match self
                    .find_occurrence_node(
                        sentence_node,
                        occurrence.span(),
                        relationships::SENTENCE_TAG_OCCURRENCE,
                    )
                    .await?
                {
                    Some(node) => node,
                    None => {
                        let node = self.store.create_node(labels::TAG_OCCURRENCE).await?;
                        let span = occurrence.span();
                        self.store
                            .set_node_property(node, properties::BEGIN, Value::from(span.begin()))
                            .await?;
                        self.store
                            .set_node_property(node, properties::END, Value::from(span.end()))
                            .await?;
                        self.store
                            .set_node_property(
                                node,
                                properties::ORIGINAL_VALUE,
                                Value::from(occurrence.value.as_str()),
                            )
                            .await?;

                        let tag = sentence.tag(occurrence.tag);
                        self.store
                            .set_node_property(node, properties::POS, Value::from(tag.pos.clone()))
                            .await?;
                        self.store
                            .set_node_property(node, properties::NE, Value::from(tag.ne.clone()))
                            .await?;

                        if let Some(ne) = &occurrence.named_entity {
                            self.store
                                .add_label(node, &format!("{}{}", labels::NE_PREFIX, ne))
                                .await?;
                            self.store
                                .set_node_property(
                                    node,
                                    properties::CONFIDENCE,
                                    Value::from(occurrence.confidence.unwrap_or(1.0)),
                                )
                                .await?;
                        }

                        self.store
                            .create_relationship(
                                sentence_node,
                                node,
                                relationships::SENTENCE_TAG_OCCURRENCE,
                                Properties::new(),
                            )
                            .await?;

                        let tag_node = self.upsert_tag_node(tag).await?;
                        self.store
                            .create_relationship(
                                node,
                                tag_node,
                                relationships::TAG_OCCURRENCE_TAG,
                                Properties::new(),
                            )
                            .await?;
                        node
                    }
                };

                for token_id in &occurrence.token_ids {
                    token_map.insert(token_id.clone(), node);
                }
            }
        }
        Ok(token_map)
    }

    /// Locate an occurrence node hanging off `sentence_node` by span
    /// equality over the given relationship type.
    async fn find_occurrence_node(
        &self,
        sentence_node: NodeId,
        span: Span,
        rel_type: &str,
    ) -> Result<Option<NodeId>> {
        for rel in self
            .store
            .relationships(sentence_node, Direction::Outgoing, Some(rel_type))
            .await?
        {
            let begin = self
                .store
                .node_property(rel.end, properties::BEGIN)
                .await?
                .and_then(|v| v.as_int());
            let end = self
                .store
                .node_property(rel.end, properties::END)
                .await?
                .and_then(|v| v.as_int());
            if begin == Some(span.begin()) && end == Some(span.end()) {
                return Ok(Some(rel.end));
            }
        }
        Ok(None)
    }

    // ========================================================================
    // Typed dependencies
    // ========================================================================

    /// Create dependency edges between occurrence nodes. Dependencies whose
    /// endpoints do not resolve in the token map are dropped.
    async fn store_dependencies(
        &self,
        sentence: &Sentence,
        token_map: &HashMap<String, NodeId>,
    ) -> Result<()> {
        for dependency in sentence.typed_dependencies() {
            let (Some(&source), Some(&target)) = (
                token_map.get(&dependency.source),
                token_map.get(&dependency.target),
            ) else {
                info!(
                    source = %dependency.source,
                    target = %dependency.target,
                    relation = %dependency.name,
                    "dependency endpoint not found, dropping edge"
                );
                continue;
            };

            let rel_name = dependency.name.to_uppercase();
            let exists = self
                .store
                .relationships(source, Direction::Outgoing, Some(rel_name.as_str()))
                .await?
                .into_iter()
                .any(|rel| rel.end == target);
            if !exists {
                let mut props = Properties::new();
                if let Some(specific) = &dependency.specific {
                    props.insert(
                        properties::SPECIFIC.to_string(),
                        Value::from(specific.as_str()),
                    );
                }
                self.store
                    .create_relationship(source, target, &rel_name, props)
                    .await?;
            }

            if rel_name == ROOT_RELATION {
                self.store.add_label(source, labels::ROOT).await?;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Phrases
    // ========================================================================

    /// Create a relationship of the given type from `from` to `to` only if
    /// one does not already exist.
    async fn link_once(&self, from: NodeId, to: NodeId, rel: &str) -> Result<()> {
        let exists = self
            .store
            .relationships(from, Direction::Outgoing, Some(rel))
            .await?
            .into_iter()
            .any(|r| r.end == to);
        if !exists {
            self.store
                .create_relationship(from, to, rel, Properties::new())
                .await?;
        }
        Ok(())
    }

    /// Upsert content-addressed phrase nodes and their per-span occurrence
    /// nodes.
    async fn store_phrases(&self, sentence: &Sentence, sentence_node: NodeId) -> Result<()> {
        for ends in sentence.phrase_occurrences().values() {
            for occurrence in ends.values() {
                let phrase_node = self.upsert_phrase_node(&occurrence.phrase).await?;
                self.link_once(sentence_node, phrase_node, relationships::HAS_PHRASE)
                    .await?;

                let already = self
                    .find_occurrence_node(
                        sentence_node,
                        occurrence.span(),
                        relationships::SENTENCE_PHRASE_OCCURRENCE,
                    )
                    .await?;
                if already.is_none() {
                    let node = self.store.create_node(labels::PHRASE_OCCURRENCE).await?;
                    let span = occurrence.span();
                    self.store
                        .set_node_property(node, properties::BEGIN, Value::from(span.begin()))
                        .await?;
                    self.store
                        .set_node_property(node, properties::END, Value::from(span.end()))
                        .await?;
                    self.store
                        .create_relationship(
                            sentence_node,
                            node,
                            relationships::SENTENCE_PHRASE_OCCURRENCE,
                            Properties::new(),
                        )
                        .await?;
                    self.store
                        .create_relationship(
                            node,
                            phrase_node,
                            relationships::PHRASE_OCCURRENCE_PHRASE,
                            Properties::new(),
                        )
                        .await?;
                }
            }
        }
        Ok(())
    }

    /// Upsert a phrase node by exact content match.
    async fn upsert_phrase_node(&self, phrase: &Phrase) -> Result<NodeId> {
        let node = match self.find_phrase_node(&phrase.content).await? {
            Some(node) => node,
            None => self.store.create_node(labels::PHRASE).await?,
        };
        self.store
            .set_node_property(
                node,
                properties::CONTENT,
                Value::from(phrase.content.as_str()),
            )
            .await?;
        let phrase_type = phrase
            .phrase_type
            .as_deref()
            .unwrap_or(schema::DEFAULT_PHRASE_TYPE);
        self.store
            .set_node_property(node, properties::PHRASE_TYPE, Value::from(phrase_type))
            .await?;
        Ok(node)
    }

    async fn find_phrase_node(&self, content: &str) -> Result<Option<NodeId>> {
        self.store
            .find_node(labels::PHRASE, properties::CONTENT, &Value::from(content))
            .await
    }

    // ========================================================================
    // Coreference
    // ========================================================================

    /// Phrase-level coreference: one edge per referring pair, probed in both
    /// directions before creation.
    async fn store_phrase_coreferences(&self, sentence: &Sentence) -> Result<()> {
        for ends in sentence.phrase_occurrences().values() {
            for occurrence in ends.values() {
                let Some(reference) = &occurrence.phrase.reference else {
                    continue;
                };
                let Some(phrase_node) = self.find_phrase_node(&occurrence.phrase.content).await?
                else {
                    continue;
                };
                let Some(reference_node) = self.find_phrase_node(reference).await? else {
                    continue;
                };

                let connected = self
                    .store
                    .relationships(
                        phrase_node,
                        Direction::Both,
                        Some(relationships::COREFERENCE),
                    )
                    .await?
                    .into_iter()
                    .any(|rel| rel.other(phrase_node) == reference_node);
                if !connected {
                    self.store
                        .create_relationship(
                            phrase_node,
                            reference_node,
                            relationships::COREFERENCE,
                            Properties::new(),
                        )
                        .await?;
                }
            }
        }
        Ok(())
    }

    /// Occurrence-level coreference: resolve the antecedent's sentence node
    /// and matching occurrence node by span equality, then add a single
    /// edge.
    async fn store_occurrence_coreferences(
        &self,
        sentence: &Sentence,
        sentence_node: NodeId,
        document_id: &str,
    ) -> Result<()> {
        for occurrences in sentence.occurrences().values() {
            for occurrence in occurrences {
                let Some(antecedent) = &occurrence.coref else {
                    continue;
                };

                let antecedent_key =
                    schema::sentence_key(document_id, antecedent.sentence_number);
                let Some(antecedent_sentence) = self
                    .store
                    .find_node(labels::SENTENCE, properties::ID, &Value::from(antecedent_key))
                    .await?
                else {
                    debug!(
                        sentence_number = antecedent.sentence_number,
                        "antecedent sentence not materialized yet, skipping coref edge"
                    );
                    continue;
                };

                let from = self
                    .find_occurrence_node(
                        sentence_node,
                        occurrence.span(),
                        relationships::SENTENCE_TAG_OCCURRENCE,
                    )
                    .await?;
                let to = self
                    .find_occurrence_node(
                        antecedent_sentence,
                        antecedent.span,
                        relationships::SENTENCE_TAG_OCCURRENCE,
                    )
                    .await?;
                let (Some(from), Some(to)) = (from, to) else {
                    continue;
                };

                let exists = self
                    .store
                    .relationships(from, Direction::Outgoing, Some(relationships::COREF))
                    .await?
                    .into_iter()
                    .any(|rel| rel.end == to);
                if !exists {
                    self.store
                        .create_relationship(from, to, relationships::COREF, Properties::new())
                        .await?;
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Sentiment
    // ========================================================================

    /// Attach the sentiment label when the level defines one.
    async fn assign_sentiment_label(
        &self,
        sentence: &Sentence,
        sentence_node: NodeId,
    ) -> Result<()> {
        if let Some(label) = sentence.sentiment().label() {
            self.store.add_label(sentence_node, label).await?;
        }
        Ok(())
    }
}
