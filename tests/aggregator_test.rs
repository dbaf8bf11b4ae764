mod common;

use common::*;
use gaia::error::GaiaError;
use gaia::knowledge::KnowledgeError;
use gaia::Aggregator;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn aggregator(facts: Arc<FakeFacts>, sparql: FakeSparql, media: Arc<FakeMedia>) -> Aggregator {
    Aggregator::new(facts, Arc::new(knowledge(sparql, media)))
}

fn healthy_graph() -> FakeSparql {
    FakeSparql::new(Scripted::row(germany_fast_row()), Scripted::row(germany_slow_row()))
}

fn dead_graph() -> FakeSparql {
    FakeSparql::new(
        Scripted::error(KnowledgeError::Network("unreachable".into())),
        Scripted::error(KnowledgeError::Network("unreachable".into())),
    )
}

#[tokio::test]
async fn test_detail_merges_facts_and_knowledge() {
    let facts = Arc::new(FakeFacts::new(vec![germany()]));
    let media = Arc::new(FakeMedia::new().with_listing(
        "Germany",
        vec![asset("Flag_of_Germany.svg", gaia::knowledge::MediaKind::Drawing)],
    ));
    let agg = aggregator(facts, healthy_graph(), media);

    let detail = agg.fetch_country_detail("deu").await.unwrap();

    assert_eq!(detail.facts, germany());
    let knowledge = detail.knowledge.unwrap();
    assert_eq!(knowledge.hdi, Some(0.942));
    assert_eq!(knowledge.images.map(|i| i.len()), Some(1));
}

#[tokio::test]
async fn test_knowledge_outage_leaves_facts_intact() {
    let facts = Arc::new(FakeFacts::new(vec![germany()]));
    let agg = aggregator(facts, dead_graph(), Arc::new(FakeMedia::new()));

    let detail = agg.fetch_country_detail("DEU").await.unwrap();

    assert_eq!(detail.facts, germany());
    assert!(detail.knowledge.is_none());

    let json = serde_json::to_value(&detail).unwrap();
    assert!(json.get("knowledge").is_none());
    assert_eq!(json["name"]["common"], "Germany");
    assert_eq!(json["cca3"], "DEU");
}

#[tokio::test]
async fn test_unknown_country_is_not_found_either_way() {
    for graph in [healthy_graph(), dead_graph()] {
        let facts = Arc::new(FakeFacts::new(vec![germany()]));
        let agg = aggregator(facts, graph, Arc::new(FakeMedia::new()));

        let err = agg.fetch_country_detail("ZZZ").await.unwrap_err();
        assert_eq!(err, GaiaError::NotFound("ZZZ".to_string()));
    }
}

#[tokio::test]
async fn test_facts_outage_fails_the_detail() {
    let facts = Arc::new(
        FakeFacts::new(vec![germany()])
            .failing(GaiaError::UpstreamUnavailable("facts provider returned 500".into())),
    );
    let agg = aggregator(facts, healthy_graph(), Arc::new(FakeMedia::new()));

    let err = agg.fetch_country_detail("DEU").await.unwrap_err();
    assert!(matches!(err, GaiaError::UpstreamUnavailable(_)));
}

#[tokio::test]
async fn test_malformed_code_never_reaches_upstreams() {
    let facts = Arc::new(FakeFacts::new(vec![germany()]));
    let sparql = healthy_graph();
    let agg = aggregator(facts.clone(), sparql, Arc::new(FakeMedia::new()));

    for raw in ["DE", "DEUT", "D3U", ""] {
        let err = agg.fetch_country_detail(raw).await.unwrap_err();
        assert!(matches!(err, GaiaError::InvalidCode(_)), "{:?} -> {:?}", raw, err);
    }
    assert!(matches!(agg.fetch_knowledge("1").await, Err(GaiaError::InvalidCode(_))));
    assert_eq!(facts.fetch_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_detail_latency_is_the_slower_half() {
    let facts = Arc::new(FakeFacts::new(vec![germany()]).with_delay(Duration::from_secs(2)));
    let sparql = FakeSparql::new(
        Scripted::row(germany_fast_row()).after(Duration::from_secs(1)),
        Scripted::row(germany_slow_row()).after(Duration::from_secs(4)),
    );
    let agg = aggregator(facts, sparql, Arc::new(FakeMedia::new()));

    let started = Instant::now();
    let detail = agg.fetch_country_detail("DEU").await.unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(4));
    assert!(elapsed < Duration::from_secs(5));
    assert!(detail.knowledge.is_some());
}

#[tokio::test]
async fn test_facts_and_knowledge_only_lookups() {
    let facts = Arc::new(FakeFacts::new(vec![germany()]));
    let agg = aggregator(facts, healthy_graph(), Arc::new(FakeMedia::new()));

    let only_facts = agg.fetch_facts("deu").await.unwrap();
    assert_eq!(only_facts.population, 83_240_525);

    let outcome = agg.fetch_knowledge("deu").await.unwrap();
    assert_eq!(outcome.fields().unwrap().government_type.as_deref(), Some("federal parliamentary republic"));

    // knowledge-only lookups do not consult the facts provider
    let outcome = agg.fetch_knowledge("ZZZ").await.unwrap();
    assert!(outcome.fields().is_some());
}
