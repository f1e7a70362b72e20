mod common;

use mockall::mock;
use mockall::predicate::always;
use std::sync::Arc;

use wayfind::{SearchEngine, WayfindError};
use wayfind::models::{Candidate, ItemKind};
use wayfind::search::scorers::ScoringContext;
use wayfind::search::{
    MatchCategory, QuerySummary, ScoreOutcome, Scorer, ScorerKind, SearchAnalytics, SearchOptions,
};
use wayfind::storage::SearchFilters;
use wayfind::telemetry::{EngineWarning, TelemetrySink};

use common::*;

mock! {
    pub Sink {}

    impl TelemetrySink for Sink {
        fn record_warning(&self, warning: &EngineWarning);
        fn record_analytics(&self, query: &QuerySummary, analytics: &SearchAnalytics);
    }
}

impl std::fmt::Debug for MockSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSink").finish()
    }
}

#[tokio::test]
async fn test_failing_posts_pool_degrades_gracefully() {
    let engine = SearchEngine::with_defaults(shared(FailingPosts(repository()))).unwrap();

    let result = engine
        .search_intelligently("coffee", &context(), &SearchFilters::default(), SearchOptions::default())
        .await;

    assert!(result.posts.is_empty());
    assert_eq!(result.analytics.candidate_counts.get("posts"), Some(&0));
    assert!(!result.places.is_empty());
    assert!(!result.lists.is_empty());
    assert!(!result.analytics.timed_out);
    assert_eq!(
        result.analytics.warnings,
        vec!["posts pool unavailable: Connection error: posts service unreachable".to_string()]
    );
}

#[tokio::test]
async fn test_degradation_reaches_telemetry() {
    let mut sink = MockSink::new();
    sink.expect_record_warning()
        .withf(|warning| matches!(warning, EngineWarning::PartialData { pool: ItemKind::Post, .. }))
        .times(1)
        .return_const(());
    sink.expect_record_analytics()
        .with(always(), always())
        .times(1)
        .returning(|query, analytics| {
            assert_eq!(query.raw, "coffee");
            assert_eq!(analytics.warnings.len(), 1);
            assert_eq!(analytics.candidate_counts.get("places"), Some(&3));
        });

    let engine = SearchEngine::with_defaults(shared(FailingPosts(repository())))
        .unwrap()
        .with_telemetry(Arc::new(sink));

    let result = engine
        .search_intelligently("coffee", &context(), &SearchFilters::default(), SearchOptions::default())
        .await;
    assert!(result.posts.is_empty());
}

#[tokio::test]
async fn test_healthy_search_sends_only_analytics() {
    let mut sink = MockSink::new();
    sink.expect_record_warning().never();
    sink.expect_record_analytics().times(1).return_const(());

    let engine = SearchEngine::with_defaults(shared(repository()))
        .unwrap()
        .with_telemetry(Arc::new(sink));

    engine
        .search_intelligently("cozy", &context(), &SearchFilters::default(), SearchOptions::default())
        .await;
}

#[tokio::test]
async fn test_recommendations_survive_failing_pool() {
    let mut sink = MockSink::new();
    sink.expect_record_warning().never();
    sink.expect_record_analytics().never();

    // posts are not needed for recommendations, so the failure is invisible
    let engine = SearchEngine::with_defaults(shared(FailingPosts(repository())))
        .unwrap()
        .with_telemetry(Arc::new(sink));

    let recommendations = engine.get_personalized_recommendations(&context(), 5).await;
    assert!(!recommendations.is_empty());
}

#[tokio::test]
async fn test_health_check_surfaces_storage_error() {
    let healthy = SearchEngine::with_defaults(shared(repository())).unwrap();
    assert!(healthy.health_check().await.unwrap());

    let failing = SearchEngine::with_defaults(shared(FailingPosts(repository()))).unwrap();
    let err = failing.health_check().await.unwrap_err();
    assert!(matches!(err, WayfindError::Storage(_)));
    assert_eq!(
        err.to_string(),
        "Storage error: Unavailable: posts service unreachable"
    );
}

/// Trending replacement that blows up on one place
#[derive(Debug)]
struct FlakyTrending;

impl Scorer for FlakyTrending {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Trending
    }

    fn score(&self, candidate: &Candidate<'_>, _ctx: &ScoringContext<'_>) -> ScoreOutcome {
        if candidate.id() == "p-blue" {
            panic!("popularity shard offline");
        }
        ScoreOutcome::new(60.0, vec!["Popular".into()], MatchCategory::Trending)
    }
}

fn is_blue_trending_fault(warning: &EngineWarning) -> bool {
    matches!(
        warning,
        EngineWarning::ScorerFault {
            scorer: ScorerKind::Trending,
            pool: ItemKind::Place,
            item_id,
            ..
        } if item_id == "p-blue"
    )
}

#[tokio::test]
async fn test_recommendation_scorer_fault_reaches_telemetry() {
    let mut sink = MockSink::new();
    sink.expect_record_warning()
        .withf(is_blue_trending_fault)
        .times(1)
        .return_const(());
    sink.expect_record_analytics().never();

    let engine = SearchEngine::with_defaults(shared(repository()))
        .unwrap()
        .with_scorer(Arc::new(FlakyTrending))
        .with_telemetry(Arc::new(sink));

    let recommendations = engine.get_personalized_recommendations(&context(), 5).await;
    assert!(!recommendations.is_empty());
    assert!(recommendations.iter().all(|r| r.item.id() != "p-blue"));
}

#[tokio::test]
async fn test_search_discovery_scorer_fault_reaches_telemetry() {
    let mut sink = MockSink::new();
    // once while ranking places, once while building discovery
    sink.expect_record_warning()
        .withf(is_blue_trending_fault)
        .times(2)
        .return_const(());
    sink.expect_record_analytics().times(1).return_const(());

    let engine = SearchEngine::with_defaults(shared(repository()))
        .unwrap()
        .with_scorer(Arc::new(FlakyTrending))
        .with_telemetry(Arc::new(sink));

    let result = engine
        .search_intelligently(
            "",
            &context(),
            &SearchFilters::default(),
            SearchOptions::default().with_discovery(true),
        )
        .await;

    assert!(!result.discovery.is_empty());
    assert_eq!(
        result
            .analytics
            .warnings
            .iter()
            .filter(|w| w.starts_with("trending scorer fault on place p-blue"))
            .count(),
        2
    );
}
