mod common;

use common::*;
use gaia::knowledge::{
    KnowledgeBranch, KnowledgeError, KnowledgeOutcome, MediaKind, QuerySolution,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_slow_query_timeout_keeps_fast_fields() {
    let media = Arc::new(FakeMedia::new().with_listing(
        "Germany",
        vec![asset("Flag_of_Germany.svg", MediaKind::Drawing), asset("Berlin.jpg", MediaKind::Bitmap)],
    ));
    let sparql = FakeSparql::new(
        Scripted::row(germany_fast_row()).after(Duration::from_secs(1)),
        Scripted::row(germany_slow_row()).after(Duration::from_secs(20)),
    );
    let client = knowledge(sparql, media.clone());

    let started = Instant::now();
    let outcome = client.fetch_knowledge(&code("DEU")).await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(15));
    assert!(elapsed < Duration::from_secs(16));

    let fields = outcome.fields().expect("fast half should survive");
    assert_eq!(fields.hdi, Some(0.942));
    assert_eq!(fields.government_type.as_deref(), Some("federal parliamentary republic"));
    assert_eq!(fields.religions, None);
    assert_eq!(fields.ethnic_groups, None);
    assert_eq!(fields.images.as_ref().map(Vec::len), Some(2));

    assert_eq!(outcome.degraded().len(), 1);
    assert_eq!(outcome.degraded()[0].branch, KnowledgeBranch::Slow);
    assert_eq!(
        outcome.degraded()[0].error,
        KnowledgeError::Timeout(Duration::from_secs(15))
    );
}

#[tokio::test]
async fn test_unreachable_graph_is_empty_outcome() {
    let media = Arc::new(FakeMedia::new());
    let sparql = FakeSparql::new(
        Scripted::error(KnowledgeError::Network("connection refused".into())),
        Scripted::error(KnowledgeError::Network("connection refused".into())),
    );
    let client = knowledge(sparql, media.clone());

    let outcome = client.fetch_knowledge(&code("DEU")).await;

    assert!(matches!(outcome, KnowledgeOutcome::Empty { .. }));
    assert_eq!(outcome.degraded().len(), 2);
    assert!(outcome.into_fields().is_none());
    assert_eq!(media.calls(), 0);
}

#[tokio::test]
async fn test_complete_lookup_passes_media_through() {
    let media = Arc::new(FakeMedia::new().with_listing(
        "France",
        vec![
            asset("Flag_of_France.svg", MediaKind::Drawing),
            asset("Paris.jpg", MediaKind::Bitmap),
            asset("Marseille.jpg", MediaKind::Bitmap),
            asset("Anthem.ogg", MediaKind::Other),
        ],
    ));
    let fast = QuerySolution::new()
        .with("hdi", "0.903")
        .with("governmentType", "unitary semi-presidential republic")
        .with("enwikiTitle", "France");
    let slow = QuerySolution::new()
        .with("religions", "Catholicism, Islam")
        .with("ethnicGroups", "French");
    let client = knowledge(FakeSparql::new(Scripted::row(fast), Scripted::row(slow)), media.clone());

    let outcome = client.fetch_knowledge(&code("FRA")).await;

    let KnowledgeOutcome::Complete(fields) = outcome else {
        panic!("expected a complete outcome");
    };
    assert_eq!(fields.article_title.as_deref(), Some("France"));
    assert_eq!(
        fields.religions,
        Some(vec!["Catholicism".to_string(), "Islam".to_string()])
    );
    assert_eq!(fields.ethnic_groups, Some(vec!["French".to_string()]));
    let images = fields.images.unwrap();
    assert_eq!(images.len(), 4);
    assert_eq!(images[3].kind(), MediaKind::Other);
    assert_eq!(*media.titles.lock().unwrap(), vec!["France".to_string()]);
}

#[tokio::test]
async fn test_queries_select_by_alpha3_code() {
    let sparql = Arc::new(FakeSparql::new(Scripted::no_rows(), Scripted::no_rows()));
    let client = gaia::knowledge::KnowledgeClient::new(
        sparql.clone(),
        Arc::new(FakeMedia::new()),
        Default::default(),
    );

    let outcome = client.fetch_knowledge(&code("jpn")).await;

    assert!(outcome
        .degraded()
        .iter()
        .all(|d| d.error == KnowledgeError::NoRows));
    let queries = sparql.queries.lock().unwrap();
    assert_eq!(queries.len(), 2);
    assert!(queries.iter().all(|q| q.contains("wdt:P298 \"JPN\"")));
}

#[tokio::test]
async fn test_media_needs_an_article_title() {
    let media = Arc::new(FakeMedia::new());
    let fast = QuerySolution::new().with("hdi", "0.5");
    let client = knowledge(
        FakeSparql::new(Scripted::row(fast), Scripted::row(QuerySolution::new())),
        media.clone(),
    );

    let outcome = client.fetch_knowledge(&code("TCD")).await;

    let fields = outcome.fields().unwrap();
    assert_eq!(fields.images, None);
    assert_eq!(media.calls(), 0);
}

#[tokio::test]
async fn test_failed_fast_query_skips_media() {
    let media = Arc::new(FakeMedia::new());
    let client = knowledge(
        FakeSparql::new(
            Scripted::error(KnowledgeError::Status(502)),
            Scripted::row(germany_slow_row()),
        ),
        media.clone(),
    );

    let outcome = client.fetch_knowledge(&code("DEU")).await;

    assert!(matches!(outcome, KnowledgeOutcome::Partial { .. }));
    let fields = outcome.fields().unwrap();
    assert_eq!(fields.hdi, None);
    assert_eq!(fields.images, None);
    assert_eq!(
        fields.ethnic_groups,
        Some(vec!["Germans".to_string(), "Turks".to_string()])
    );
    assert_eq!(outcome.degraded()[0].branch, KnowledgeBranch::Fast);
    assert_eq!(media.calls(), 0);
}

#[tokio::test]
async fn test_media_failure_yields_empty_image_list() {
    let media = Arc::new(FakeMedia::new().failing(KnowledgeError::Status(404)));
    let client = knowledge(
        FakeSparql::new(Scripted::row(germany_fast_row()), Scripted::row(germany_slow_row())),
        media,
    );

    let outcome = client.fetch_knowledge(&code("DEU")).await;

    let fields = outcome.fields().unwrap();
    assert_eq!(fields.images, Some(vec![]));
    assert_eq!(fields.hdi, Some(0.942));
    assert_eq!(outcome.degraded().len(), 1);
    assert_eq!(outcome.degraded()[0].branch, KnowledgeBranch::Media);
}

#[tokio::test(start_paused = true)]
async fn test_slow_media_times_out() {
    let media = Arc::new(FakeMedia::new().with_delay(Duration::from_secs(30)));
    let client = knowledge(
        FakeSparql::new(Scripted::row(germany_fast_row()), Scripted::row(germany_slow_row())),
        media,
    );

    let outcome = client.fetch_knowledge(&code("DEU")).await;

    assert_eq!(outcome.fields().unwrap().images, Some(vec![]));
    assert_eq!(
        outcome.degraded()[0].error,
        KnowledgeError::Timeout(Duration::from_secs(8))
    );
}

#[tokio::test(start_paused = true)]
async fn test_branches_run_concurrently() {
    let media = Arc::new(FakeMedia::new().with_delay(Duration::from_secs(3)));
    let client = knowledge(
        FakeSparql::new(
            Scripted::row(germany_fast_row()).after(Duration::from_secs(3)),
            Scripted::row(germany_slow_row()).after(Duration::from_secs(5)),
        ),
        media,
    );

    let started = Instant::now();
    let outcome = client.fetch_knowledge(&code("DEU")).await;
    let elapsed = started.elapsed();

    // fast + media chain (6s) overlaps the slow query (5s)
    assert!(elapsed >= Duration::from_secs(6));
    assert!(elapsed < Duration::from_secs(7));
    assert!(matches!(outcome, KnowledgeOutcome::Complete(_)));
}
