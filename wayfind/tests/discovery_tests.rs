mod common;

use wayfind::SearchEngine;
use wayfind::models::{DiscoveryItem, ItemKind, SearchContext, User, UserHistory};
use wayfind::search::ScorerKind;

use common::*;

fn engine() -> SearchEngine {
    SearchEngine::with_defaults(shared(repository())).unwrap()
}

#[tokio::test]
async fn test_recommendations_are_ordered_and_capped() {
    let recommendations = engine().get_personalized_recommendations(&context(), 3).await;

    assert!(!recommendations.is_empty());
    assert!(recommendations.len() <= 3);
    for pair in recommendations.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence);
    }
    for rec in &recommendations {
        assert!((0.0..=1.0).contains(&rec.confidence));
        assert!(!rec.reasons.is_empty());
        assert_eq!(rec.item_type, rec.item.kind());
    }
}

#[tokio::test]
async fn test_saved_and_owned_items_are_excluded() {
    let me = User::new("u-sara", "Sara Chen", "sarac");
    let history = UserHistory {
        saved_places: vec!["p-taqueria".to_string()],
        liked_lists: vec!["l-stranger".to_string()],
        ..Default::default()
    };
    let ctx = SearchContext::for_user(me).with_history(history);

    let recommendations = engine().get_personalized_recommendations(&ctx, 10).await;
    let ids: Vec<&str> = recommendations.iter().map(|r| r.item.id()).collect();

    assert!(!ids.contains(&"p-taqueria"));
    assert!(!ids.contains(&"l-stranger"));
    // owned by the caller
    assert!(!ids.contains(&"l-sara"));
}

#[tokio::test]
async fn test_network_saves_drive_collaborative_picks() {
    let friend = User::new("u-sara", "Sara Chen", "sarac").with_saved_places(["p-tartine"]);
    let ctx = SearchContext::for_user(me()).with_friends(vec![friend]);

    let recommendations = engine().get_personalized_recommendations(&ctx, 10).await;
    let tartine = recommendations
        .iter()
        .find(|r| r.item.id() == "p-tartine")
        .expect("tartine recommended");

    assert_eq!(tartine.item_type, ItemKind::Place);
    assert!(matches!(tartine.item, DiscoveryItem::Place(_)));
    assert!(
        tartine.algorithm == ScorerKind::Collaborative
            || tartine.reasons.iter().any(|r| r == "Saved by people you follow")
    );
}

#[tokio::test]
async fn test_zero_count_returns_nothing() {
    assert!(engine().get_personalized_recommendations(&context(), 0).await.is_empty());
}
