//! Materialization tests: node identity, edge idempotency, coreference.

use std::sync::Arc;

use annograph::graph::schema::{labels, properties, relationships};
use annograph::{
    Direction, GraphStore, MemoryGraphStore, Occurrence, OccurrenceRef, PersistOptions, Phrase,
    Sentence, SentenceMaterializer, Span, Tag, TypedDependency, Value,
};

fn setup() -> (Arc<MemoryGraphStore>, SentenceMaterializer) {
    let store = Arc::new(MemoryGraphStore::new());
    let materializer = SentenceMaterializer::new(store.clone());
    (store, materializer)
}

fn cat_sentence() -> Sentence {
    let mut sentence = Sentence::new("the cat sat", 0);
    let cat = sentence.add_tag(Tag::new("cat", "en").with_pos("NN"));
    sentence
        .add_occurrence(4, 7, Occurrence::new(cat, "cat"))
        .unwrap();
    sentence
}

#[tokio::test]
async fn repersisting_same_identity_reuses_sentence_node() {
    let (store, materializer) = setup();
    let sentence = cat_sentence();
    let opts = PersistOptions::for_document("doc-1");

    let first = materializer.persist(&sentence, &opts).await.unwrap();
    let second = materializer.persist(&sentence, &opts).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(store.count_nodes_with_label(labels::SENTENCE).await, 1);
}

#[tokio::test]
async fn different_documents_get_different_sentence_nodes() {
    let (store, materializer) = setup();
    let sentence = cat_sentence();

    materializer
        .persist(&sentence, &PersistOptions::for_document("doc-1"))
        .await
        .unwrap();
    materializer
        .persist(&sentence, &PersistOptions::for_document("doc-2"))
        .await
        .unwrap();

    assert_eq!(store.count_nodes_with_label(labels::SENTENCE).await, 2);
    // The tag node is shared across documents by its canonical lemma.
    assert_eq!(store.count_nodes_with_label(labels::TAG).await, 1);
}

#[tokio::test]
async fn multiplicity_updates_without_duplicating_has_tag_edge() {
    let (store, materializer) = setup();
    let opts = PersistOptions::for_document("doc-1");

    let mut sentence = Sentence::new("the cat sat and the cat slept", 0);
    let cat = sentence.add_tag(Tag::new("cat", "en"));
    sentence
        .add_occurrence(4, 7, Occurrence::new(cat, "cat"))
        .unwrap();

    let sentence_node = materializer.persist(&sentence, &opts).await.unwrap();

    let has_tag = store
        .relationships(sentence_node, Direction::Outgoing, Some(relationships::HAS_TAG))
        .await
        .unwrap();
    assert_eq!(has_tag.len(), 1);
    assert_eq!(
        store
            .relationship_property(has_tag[0].id, properties::TF)
            .await
            .unwrap(),
        Some(Value::Int(1))
    );

    // A second mention of the same lemma elsewhere in the sentence.
    let again = sentence.add_tag(Tag::new("cat", "en"));
    assert_eq!(cat, again);
    sentence
        .add_occurrence(20, 23, Occurrence::new(cat, "cat"))
        .unwrap();

    materializer.persist(&sentence, &opts).await.unwrap();

    assert_eq!(store.count_nodes_with_label(labels::TAG).await, 1);
    let has_tag = store
        .relationships(sentence_node, Direction::Outgoing, Some(relationships::HAS_TAG))
        .await
        .unwrap();
    assert_eq!(has_tag.len(), 1);
    assert_eq!(
        store
            .relationship_property(has_tag[0].id, properties::TF)
            .await
            .unwrap(),
        Some(Value::Int(2))
    );
    assert_eq!(store.count_nodes_with_label(labels::TAG_OCCURRENCE).await, 2);
}

#[tokio::test]
async fn occurrence_nodes_are_keyed_by_span() {
    let (store, materializer) = setup();
    let sentence = cat_sentence();
    let opts = PersistOptions::for_document("doc-1");

    materializer.persist(&sentence, &opts).await.unwrap();
    materializer.persist(&sentence, &opts).await.unwrap();
    materializer.persist(&sentence, &opts).await.unwrap();

    assert_eq!(store.count_nodes_with_label(labels::TAG_OCCURRENCE).await, 1);
    assert_eq!(
        store
            .count_relationships_of_type(relationships::SENTENCE_TAG_OCCURRENCE)
            .await,
        1
    );
}

#[tokio::test]
async fn dependency_creates_one_directed_edge_and_root_marker() {
    let (store, materializer) = setup();
    let mut sentence = Sentence::new("the cat sat", 0);
    let cat = sentence.add_tag(Tag::new("cat", "en"));
    let sit = sentence.add_tag(Tag::new("sit", "en"));
    sentence
        .add_occurrence(
            4,
            7,
            Occurrence::new(cat, "cat").with_tokens(vec!["tok-1".to_string()]),
        )
        .unwrap();
    sentence
        .add_occurrence(
            8,
            11,
            Occurrence::new(sit, "sat").with_tokens(vec!["tok-2".to_string()]),
        )
        .unwrap();
    sentence.add_typed_dependency(
        TypedDependency::new("tok-2", "tok-1", "nsubj").with_specific("xsubj"),
    );
    sentence.add_typed_dependency(TypedDependency::new("tok-2", "tok-2", "ROOT"));

    materializer
        .persist(&sentence, &PersistOptions::for_document("doc-1"))
        .await
        .unwrap();

    assert_eq!(store.count_relationships_of_type("NSUBJ").await, 1);

    let sat_node = store
        .find_node(
            labels::TAG_OCCURRENCE,
            properties::ORIGINAL_VALUE,
            &Value::from("sat"),
        )
        .await
        .unwrap()
        .unwrap();
    let nsubj = store
        .relationships(sat_node, Direction::Outgoing, Some("NSUBJ"))
        .await
        .unwrap();
    assert_eq!(nsubj.len(), 1);
    assert_eq!(
        store
            .relationship_property(nsubj[0].id, properties::SPECIFIC)
            .await
            .unwrap(),
        Some(Value::from("xsubj"))
    );

    let node_labels = store.node_labels(sat_node).await.unwrap();
    assert!(node_labels.iter().any(|l| l == labels::ROOT));
}

#[tokio::test]
async fn unresolved_dependency_endpoints_are_dropped() {
    let (store, materializer) = setup();
    let mut sentence = cat_sentence();
    sentence.add_typed_dependency(TypedDependency::new("missing-a", "missing-b", "dobj"));

    materializer
        .persist(&sentence, &PersistOptions::for_document("doc-1"))
        .await
        .unwrap();

    assert_eq!(store.count_relationships_of_type("DOBJ").await, 0);
}

#[tokio::test]
async fn phrase_nodes_are_content_addressed() {
    let (store, materializer) = setup();
    let opts = PersistOptions::for_document("doc-1");

    let mut first = Sentence::new("the black cat sat", 0);
    first
        .add_phrase_occurrence(0, 13, Phrase::new("the black cat").with_type("NP"))
        .unwrap();
    let mut second = Sentence::new("the black cat slept", 1);
    second
        .add_phrase_occurrence(0, 13, Phrase::new("the black cat").with_type("NP"))
        .unwrap();

    materializer.persist(&first, &opts).await.unwrap();
    materializer.persist(&second, &opts).await.unwrap();

    // One phrase node shared by content, one occurrence node per sentence.
    assert_eq!(store.count_nodes_with_label(labels::PHRASE).await, 1);
    assert_eq!(
        store.count_nodes_with_label(labels::PHRASE_OCCURRENCE).await,
        2
    );

    // Re-persisting adds nothing.
    materializer.persist(&second, &opts).await.unwrap();
    assert_eq!(
        store.count_nodes_with_label(labels::PHRASE_OCCURRENCE).await,
        2
    );
}

#[tokio::test]
async fn phrase_coreference_edge_is_never_duplicated() {
    let (store, materializer) = setup();
    let opts = PersistOptions::for_document("doc-1");

    let mut first = Sentence::new("the black cat sat", 0);
    first
        .add_phrase_occurrence(0, 13, Phrase::new("the black cat"))
        .unwrap();
    let mut second = Sentence::new("it slept", 1);
    second
        .add_phrase_occurrence(0, 2, Phrase::new("it").with_reference("the black cat"))
        .unwrap();

    materializer.persist(&first, &opts).await.unwrap();
    materializer.persist(&second, &opts).await.unwrap();
    assert_eq!(
        store
            .count_relationships_of_type(relationships::COREFERENCE)
            .await,
        1
    );

    materializer.persist(&second, &opts).await.unwrap();
    materializer.persist(&second, &opts).await.unwrap();
    assert_eq!(
        store
            .count_relationships_of_type(relationships::COREFERENCE)
            .await,
        1
    );
}

#[tokio::test]
async fn occurrence_coreference_links_across_sentences_once() {
    let (store, materializer) = setup();
    let opts = PersistOptions::for_document("doc-1");

    let mut first = Sentence::new("the cat sat", 0);
    let cat = first.add_tag(Tag::new("cat", "en"));
    first
        .add_occurrence(4, 7, Occurrence::new(cat, "cat"))
        .unwrap();

    let antecedent = OccurrenceRef::new(0, Span::new(4, 7, "tag cat").unwrap());
    let mut second = Sentence::new("it purred", 1);
    let it = second.add_tag(Tag::new("it", "en"));
    second
        .add_occurrence(0, 2, Occurrence::new(it, "it").with_coreference(antecedent))
        .unwrap();

    materializer.persist(&first, &opts).await.unwrap();
    materializer.persist(&second, &opts).await.unwrap();
    assert_eq!(store.count_relationships_of_type(relationships::COREF).await, 1);

    // Unchanged input, repeated calls: still a single edge.
    materializer.persist(&second, &opts).await.unwrap();
    assert_eq!(store.count_relationships_of_type(relationships::COREF).await, 1);
}

#[tokio::test]
async fn named_entity_occurrence_gets_type_label_and_confidence() {
    let (store, materializer) = setup();
    let mut sentence = Sentence::new("Rome is eternal", 0);
    let rome = sentence.add_tag(Tag::new("rome", "en").with_ne("LOCATION"));
    sentence
        .add_occurrence(
            0,
            4,
            Occurrence::new(rome, "Rome").with_named_entity("Location", 0.93),
        )
        .unwrap();

    materializer
        .persist(&sentence, &PersistOptions::for_document("doc-1"))
        .await
        .unwrap();

    let node = store
        .find_node(
            labels::TAG_OCCURRENCE,
            properties::ORIGINAL_VALUE,
            &Value::from("Rome"),
        )
        .await
        .unwrap()
        .unwrap();
    let node_labels = store.node_labels(node).await.unwrap();
    assert!(node_labels.iter().any(|l| l == "NER_Location"));

    let confidence = store
        .node_property(node, properties::CONFIDENCE)
        .await
        .unwrap()
        .and_then(|v| v.as_float())
        .unwrap();
    assert!((confidence - 0.93).abs() < 1e-6);
}

#[tokio::test]
async fn persist_without_document_id_is_rejected() {
    let (store, materializer) = setup();
    let sentence = cat_sentence();

    let err = materializer
        .persist(&sentence, &PersistOptions::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("document identifier"));
    // Nothing was written.
    assert_eq!(store.stats().await.node_count, 0);
}
