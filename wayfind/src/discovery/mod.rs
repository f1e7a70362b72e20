//! Personalized discovery
//!
//! Query-less recommendations built from the same scorers as search, minus
//! text matching. Each scorer nominates its best places and lists on its own;
//! the nominations are merged, deduplicated and ordered by confidence.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::models::{Candidate, DiscoveryItem, ItemKind, Place, PlaceList, SearchContext};
use crate::search::intent::QueryIntent;
use crate::search::scorers::{
    MAX_SCORE, PoolStats, Scorer, ScorerKind, ScorerRegistry, ScoringContext, SocialSignals,
    evaluate,
};
use crate::telemetry::EngineWarning;

/// Scorers consulted for discovery, in nomination order
pub const DISCOVERY_SCORERS: [ScorerKind; 4] = [
    ScorerKind::Collaborative,
    ScorerKind::Preference,
    ScorerKind::Trending,
    ScorerKind::Social,
];

/// A recommended place or list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscoveryRecommendation {
    pub item: DiscoveryItem,
    /// `place` or `list`, always consistent with `item`
    pub item_type: ItemKind,
    /// Scorer behind the strongest nomination
    pub algorithm: ScorerKind,
    /// Scorer value divided by 100
    pub confidence: f64,
    pub reasons: Vec<String>,
}

impl DiscoveryRecommendation {
    fn new(item: DiscoveryItem, algorithm: ScorerKind, value: f64, reasons: Vec<String>) -> Self {
        Self {
            item_type: item.kind(),
            item,
            algorithm,
            confidence: (value / MAX_SCORE).clamp(0.0, 1.0),
            reasons,
        }
    }

    /// Fold another nomination of the same item into this one
    fn absorb(&mut self, other: DiscoveryRecommendation) {
        if other.confidence > self.confidence {
            self.confidence = other.confidence;
            self.algorithm = other.algorithm;
        }
        for reason in other.reasons {
            if !self.reasons.contains(&reason) {
                self.reasons.push(reason);
            }
        }
    }
}

/// Recommendations together with the scorer faults hit while building them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoveryOutcome {
    pub recommendations: Vec<DiscoveryRecommendation>,
    /// One `ScorerFault` warning per failed scorer evaluation
    pub faults: Vec<EngineWarning>,
}

/// Confidence desc, popularity desc, id asc
fn compare_recommendations(a: &DiscoveryRecommendation, b: &DiscoveryRecommendation) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| b.item.popularity().cmp(&a.item.popularity()))
        .then_with(|| a.item.id().cmp(b.item.id()))
}

/// Builds discovery recommendations from a scorer registry
#[derive(Debug, Clone)]
pub struct DiscoveryRecommender {
    registry: Arc<ScorerRegistry>,
}

impl Default for DiscoveryRecommender {
    fn default() -> Self {
        Self::new(Arc::new(ScorerRegistry::default()))
    }
}

impl DiscoveryRecommender {
    pub fn new(registry: Arc<ScorerRegistry>) -> Self {
        Self { registry }
    }

    /// Recommend up to `count` places and lists using every discovery scorer
    pub fn recommend(
        &self,
        context: &SearchContext,
        places: &[Place],
        lists: &[PlaceList],
        count: usize,
    ) -> DiscoveryOutcome {
        self.recommend_with(context, places, lists, count, &DISCOVERY_SCORERS)
    }

    /// Recommend using only `algorithms`
    ///
    /// Items the user owns, saved or liked are never recommended.
    pub fn recommend_with(
        &self,
        context: &SearchContext,
        places: &[Place],
        lists: &[PlaceList],
        count: usize,
        algorithms: &[ScorerKind],
    ) -> DiscoveryOutcome {
        if count == 0 {
            return DiscoveryOutcome::default();
        }

        let signals = SocialSignals::build(context, places, lists);
        let intent = QueryIntent::default();

        let eligible_places: Vec<&Place> = places
            .iter()
            .filter(|p| !signals.already_has(&Candidate::Place(p)))
            .collect();
        let eligible_lists: Vec<&PlaceList> = lists
            .iter()
            .filter(|l| !signals.already_has(&Candidate::List(l)))
            .collect();

        let place_ctx = ScoringContext {
            search: context,
            intent: &intent,
            signals: &signals,
            pool: PoolStats::from_candidates(eligible_places.iter().map(|p| Candidate::Place(*p))),
        };
        let list_ctx = ScoringContext {
            pool: PoolStats::from_candidates(eligible_lists.iter().map(|l| Candidate::List(*l))),
            ..place_ctx
        };

        let mut merged: Vec<DiscoveryRecommendation> = Vec::new();
        let mut index: BTreeMap<(ItemKind, String), usize> = BTreeMap::new();
        let mut faults: Vec<EngineWarning> = Vec::new();

        for kind in algorithms {
            let Some(scorer) = self.registry.get(*kind) else {
                continue;
            };

            let nominated_places = nominate(
                scorer.as_ref(),
                eligible_places.iter().map(|p| Candidate::Place(*p)),
                &place_ctx,
                count,
                &mut faults,
            );
            let nominated_lists = nominate(
                scorer.as_ref(),
                eligible_lists.iter().map(|l| Candidate::List(*l)),
                &list_ctx,
                count,
                &mut faults,
            );

            for (candidate, value, reasons) in nominated_places.into_iter().chain(nominated_lists) {
                let item = match candidate {
                    Candidate::Place(p) => DiscoveryItem::Place(p.clone()),
                    Candidate::List(l) => DiscoveryItem::List(l.clone()),
                    _ => continue,
                };
                let recommendation = DiscoveryRecommendation::new(item, *kind, value, reasons);
                let key = (recommendation.item_type, recommendation.item.id().to_string());
                match index.get(&key).copied() {
                    Some(i) => merged[i].absorb(recommendation),
                    None => {
                        index.insert(key, merged.len());
                        merged.push(recommendation);
                    }
                }
            }
        }

        merged.sort_by(compare_recommendations);
        merged.truncate(count);
        debug!(
            "Discovery produced {} recommendations from {} places and {} lists ({} scorer faults)",
            merged.len(),
            places.len(),
            lists.len(),
            faults.len()
        );
        DiscoveryOutcome {
            recommendations: merged,
            faults,
        }
    }
}

/// Top `count` positive candidates of one pool for one scorer
fn nominate<'a, I>(
    scorer: &dyn Scorer,
    candidates: I,
    ctx: &ScoringContext<'_>,
    count: usize,
    faults: &mut Vec<EngineWarning>,
) -> Vec<(Candidate<'a>, f64, Vec<String>)>
where
    I: Iterator<Item = Candidate<'a>>,
{
    let mut nominated: Vec<(Candidate<'a>, f64, Vec<String>)> = Vec::new();
    for candidate in candidates {
        if !scorer.applies_to(candidate.kind()) {
            continue;
        }
        match evaluate(scorer, &candidate, ctx) {
            Ok(outcome) if outcome.value > 0.0 => {
                nominated.push((candidate, outcome.value, outcome.reasons));
            }
            Ok(_) => {}
            Err(fault) => faults.push(EngineWarning::ScorerFault {
                scorer: scorer.kind(),
                pool: candidate.kind(),
                item_id: candidate.id().to_string(),
                detail: fault.to_string(),
            }),
        }
    }

    nominated.sort_by(|(ca, va, _), (cb, vb, _)| {
        vb.total_cmp(va)
            .then_with(|| cb.popularity().cmp(&ca.popularity()))
            .then_with(|| ca.id().cmp(cb.id()))
    });
    nominated.truncate(count);
    nominated
}
