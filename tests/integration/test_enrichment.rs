//! Enrichment tests over a static ontology snapshot.

use std::sync::Arc;

use annograph::{
    BareResolver, ConceptEdge, ConceptEnricher, EnrichmentRequest, Sentence, StaticOntologyClient,
    Tag,
};

fn enricher_over(edges: Vec<ConceptEdge>) -> ConceptEnricher {
    ConceptEnricher::new(
        Arc::new(StaticOntologyClient::new(edges)),
        Arc::new(BareResolver),
    )
}

#[tokio::test]
async fn admitted_relations_gate_linking() {
    let enricher = enricher_over(vec![
        ConceptEdge::new("cat", "RelatedTo", "feline", "en", 1.0),
        ConceptEdge::new("cat", "Unrelated", "furniture", "en", 1.0),
    ]);

    let mut sentence = Sentence::new("the cat sat", 0);
    let cat = sentence.add_tag(Tag::new("cat", "en"));
    let request = EnrichmentRequest::new("en")
        .with_depth(2)
        .with_admitted_relations(["RelatedTo"]);
    let outcome = enricher
        .import_hierarchy(&mut sentence, cat, &request)
        .await
        .unwrap();

    assert!(!outcome.is_partial());
    let lemmas: Vec<&str> = outcome
        .linked
        .iter()
        .map(|&id| sentence.tag(id).lemma.as_str())
        .collect();
    assert!(lemmas.contains(&"feline"));
    assert!(!lemmas.contains(&"furniture"));
    assert!(sentence.tag_by_lemma("furniture").is_none());
}

#[tokio::test]
async fn empty_allowlist_admits_every_relation() {
    let enricher = enricher_over(vec![ConceptEdge::new(
        "cat", "Antonym", "dog", "en", 1.0,
    )]);

    let mut sentence = Sentence::new("the cat sat", 0);
    let cat = sentence.add_tag(Tag::new("cat", "en"));
    let request = EnrichmentRequest::new("en")
        .with_depth(1)
        .with_admitted_relations(Vec::<String>::new());
    let outcome = enricher
        .import_hierarchy(&mut sentence, cat, &request)
        .await
        .unwrap();

    assert_eq!(outcome.linked.len(), 1);
}

#[tokio::test]
async fn multiword_lemma_is_normalized_for_lookup() {
    let enricher = enricher_over(vec![ConceptEdge::new(
        "new_york",
        "IsA",
        "city",
        "en",
        2.0,
    )]);

    let mut sentence = Sentence::new("New York is loud", 0);
    let ny = sentence.add_tag(Tag::new("New York", "en"));
    let request = EnrichmentRequest::new("en").with_depth(1);
    let outcome = enricher
        .import_hierarchy(&mut sentence, ny, &request)
        .await
        .unwrap();

    assert_eq!(outcome.linked.len(), 1);
    assert_eq!(sentence.tag(outcome.linked[0]).lemma, "city");
}

#[tokio::test]
async fn parent_links_record_relation_and_weight() {
    let enricher = enricher_over(vec![ConceptEdge::new("dog", "IsA", "animal", "en", 2.5)]);

    let mut sentence = Sentence::new("the dog barked", 0);
    let dog = sentence.add_tag(Tag::new("dog", "en"));
    let request = EnrichmentRequest::new("en").with_depth(1);
    enricher
        .import_hierarchy(&mut sentence, dog, &request)
        .await
        .unwrap();

    let parents = sentence.tag(dog).parents();
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0].relation, "IsA");
    assert!((parents[0].weight - 2.5).abs() < f64::EPSILON);
    assert_eq!(sentence.tag(parents[0].parent).lemma, "animal");
}

#[tokio::test]
async fn repeated_enrichment_does_not_duplicate_links() {
    let enricher = enricher_over(vec![ConceptEdge::new("dog", "IsA", "animal", "en", 2.0)]);

    let mut sentence = Sentence::new("the dog barked", 0);
    let dog = sentence.add_tag(Tag::new("dog", "en"));
    let request = EnrichmentRequest::new("en").with_depth(1);

    enricher
        .import_hierarchy(&mut sentence, dog, &request)
        .await
        .unwrap();
    enricher
        .import_hierarchy(&mut sentence, dog, &request)
        .await
        .unwrap();

    assert_eq!(sentence.tag(dog).parents().len(), 1);
    // The neighbor was interned once.
    assert_eq!(sentence.tag_count(), 2);
}
