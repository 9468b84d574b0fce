//! End-to-end pipeline tests: enrich, then materialize.

use std::io::Write;
use std::sync::Arc;

use annograph::graph::schema::{labels, properties, relationships};
use annograph::{
    BareResolver, ConceptEdge, ConceptEnricher, Config, Direction, EnrichmentRequest, GraphStore,
    MemoryGraphStore, Occurrence, PersistOptions, Sentence, SentenceMaterializer,
    StaticOntologyClient, Tag, Value,
};

fn ontology_snapshot() -> Vec<ConceptEdge> {
    vec![
        ConceptEdge::new("cat", "IsA", "feline", "en", 2.0),
        ConceptEdge::new("feline", "IsA", "mammal", "en", 2.0),
        ConceptEdge::new("cat", "Unrelated", "furniture", "en", 0.5),
    ]
}

#[tokio::test]
async fn enriched_hierarchy_is_persisted_as_related_to_edges() {
    let enricher = ConceptEnricher::new(
        Arc::new(StaticOntologyClient::new(ontology_snapshot())),
        Arc::new(BareResolver),
    );
    let store = Arc::new(MemoryGraphStore::new());
    let materializer = SentenceMaterializer::new(store.clone());

    let mut sentence = Sentence::new("the cat sat", 0);
    let cat = sentence.add_tag(Tag::new("cat", "en"));
    sentence
        .add_occurrence(4, 7, Occurrence::new(cat, "cat"))
        .unwrap();

    let request = EnrichmentRequest::new("en")
        .with_depth(2)
        .with_admitted_relations(["IsA"]);
    let outcome = enricher
        .import_hierarchy(&mut sentence, cat, &request)
        .await
        .unwrap();
    assert!(!outcome.is_partial());

    materializer
        .persist(&sentence, &PersistOptions::for_document("doc-1").with_tx("batch-7"))
        .await
        .unwrap();

    // cat, feline, mammal materialized; furniture filtered out.
    assert_eq!(store.count_nodes_with_label(labels::TAG).await, 3);
    assert_eq!(
        store
            .count_relationships_of_type(relationships::IS_RELATED_TO)
            .await,
        2
    );
    assert!(store
        .find_node(labels::TAG, properties::LEMMA, &Value::from("furniture"))
        .await
        .unwrap()
        .is_none());

    let cat_node = store
        .find_node(labels::TAG, properties::ID, &Value::from("cat_en"))
        .await
        .unwrap()
        .unwrap();
    let hierarchy = store
        .relationships(cat_node, Direction::Outgoing, Some(relationships::IS_RELATED_TO))
        .await
        .unwrap();
    assert_eq!(hierarchy.len(), 1);
    assert_eq!(
        store
            .relationship_property(hierarchy[0].id, properties::RELATION)
            .await
            .unwrap(),
        Some(Value::from("IsA"))
    );
    assert_eq!(
        store
            .relationship_property(hierarchy[0].id, properties::WEIGHT)
            .await
            .unwrap(),
        Some(Value::Float(2.0))
    );
}

#[tokio::test]
async fn repersisting_enriched_sentence_does_not_duplicate_hierarchy_edges() {
    let enricher = ConceptEnricher::new(
        Arc::new(StaticOntologyClient::new(ontology_snapshot())),
        Arc::new(BareResolver),
    );
    let store = Arc::new(MemoryGraphStore::new());
    let materializer = SentenceMaterializer::new(store.clone());

    let mut sentence = Sentence::new("the cat sat", 0);
    let cat = sentence.add_tag(Tag::new("cat", "en"));
    sentence
        .add_occurrence(4, 7, Occurrence::new(cat, "cat"))
        .unwrap();

    let request = EnrichmentRequest::new("en")
        .with_depth(2)
        .with_admitted_relations(["IsA"]);
    enricher
        .import_hierarchy(&mut sentence, cat, &request)
        .await
        .unwrap();

    let opts = PersistOptions::for_document("doc-1");
    materializer.persist(&sentence, &opts).await.unwrap();
    let before = store.stats().await;
    materializer.persist(&sentence, &opts).await.unwrap();
    let after = store.stats().await;

    assert_eq!(before, after);
}

#[tokio::test]
async fn config_drives_the_enrichment_request() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
            [ontology]
            endpoint = "http://concepts.internal:9000"

            [enrichment]
            language = "en"
            depth = 1
            admitted_relations = ["IsA"]
        "#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    let request = EnrichmentRequest::from(&config.enrichment);
    assert_eq!(request.depth, 1);
    assert_eq!(request.admitted_relations, vec!["IsA"]);

    let enricher = ConceptEnricher::with_cache(
        Arc::new(StaticOntologyClient::new(ontology_snapshot())),
        Arc::new(BareResolver),
        &config.cache,
    );

    let mut sentence = Sentence::new("the cat sat", 0);
    let cat = sentence.add_tag(Tag::new("cat", "en"));
    let outcome = enricher
        .import_hierarchy(&mut sentence, cat, &request)
        .await
        .unwrap();

    // Depth 1: feline is linked, mammal is not reached.
    assert_eq!(outcome.linked.len(), 1);
    assert!(sentence.tag_by_lemma("mammal").is_none());
}
