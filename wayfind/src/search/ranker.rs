//! Result aggregation
//!
//! The ranker fans every active scorer over one candidate pool, folds their
//! outputs into a weighted mean, labels each item with the category of its
//! dominant scorer, then drops, sorts and truncates.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

use super::category::MatchCategory;
use super::intent::QueryIntent;
use super::options::{BudgetStop, RankBudget};
use super::result::{ScoreBreakdown, ScoredItem, ScorerContribution};
use super::scorers::{
    FaultKind, PoolStats, Scorer, ScorerKind, ScorerRegistry, ScoringContext, SocialSignals,
    evaluate, sanitise,
};
use super::scoring::RankingConfig;
use crate::models::{Rankable, SearchContext};

/// Call-scoped inputs shared by the four pool rankings
#[derive(Debug, Clone)]
pub struct RankInputs {
    pub context: SearchContext,
    pub intent: QueryIntent,
    pub signals: SocialSignals,
    /// Scorers allowed for this call, canonical order
    pub active: Vec<ScorerKind>,
    pub max_results: usize,
    pub budget: RankBudget,
}

/// A scorer that panicked or returned garbage for one item
#[derive(Debug, Clone, PartialEq)]
pub struct ScorerFault {
    pub scorer: ScorerKind,
    pub item_id: String,
    pub fault: FaultKind,
}

/// Outcome of ranking one pool
#[derive(Debug, Clone)]
pub struct RankedPool<T> {
    /// Sorted, floored and truncated items
    pub items: Vec<ScoredItem<T>>,
    /// Pool size before truncation
    pub candidate_count: usize,
    /// Candidates actually scored
    pub evaluated: usize,
    /// Set when the budget ran out before every candidate was scored
    pub stopped: Option<BudgetStop>,
    pub faults: Vec<ScorerFault>,
}

impl<T> RankedPool<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            candidate_count: 0,
            evaluated: 0,
            stopped: None,
            faults: Vec::new(),
        }
    }

    /// Scorers with a positive weighted contribution to a returned item
    pub fn contributing_scorers(&self) -> BTreeSet<ScorerKind> {
        self.items
            .iter()
            .flat_map(|item| item.breakdown.contributions.iter())
            .filter(|c| c.value > 0.0 && c.weight > 0.0)
            .map(|c| c.scorer)
            .collect()
    }
}

/// Combines scorer outputs into ranked pools
#[derive(Debug, Clone)]
pub struct Ranker {
    config: RankingConfig,
    registry: Arc<ScorerRegistry>,
}

impl Default for Ranker {
    fn default() -> Self {
        Self {
            config: RankingConfig::default(),
            registry: Arc::new(ScorerRegistry::default()),
        }
    }
}

impl Ranker {
    /// Create a ranker, returning an error if the configuration is invalid
    pub fn try_new(config: RankingConfig, registry: Arc<ScorerRegistry>) -> Result<Self, String> {
        config.validate()?;
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ScorerRegistry> {
        &self.registry
    }

    /// Same configuration, different scorers
    pub fn with_registry(&self, registry: Arc<ScorerRegistry>) -> Self {
        Self {
            config: self.config.clone(),
            registry,
        }
    }

    /// Scorers that run for items of type `T`, with their effective weights
    fn weighted_scorers<T: Rankable>(&self, inputs: &RankInputs) -> Vec<(Arc<dyn Scorer>, f64)> {
        let applicable: Vec<Arc<dyn Scorer>> = inputs
            .active
            .iter()
            .filter_map(|kind| self.registry.get(*kind))
            .filter(|scorer| scorer.applies_to(T::KIND))
            .cloned()
            .collect();
        let kinds: Vec<ScorerKind> = applicable.iter().map(|s| s.kind()).collect();
        let has_text = inputs.intent.has_text();

        applicable
            .into_iter()
            .map(|scorer| {
                let weight = self.config.effective_weight(
                    scorer.kind(),
                    inputs.intent.intent_label,
                    has_text,
                    &kinds,
                );
                (scorer, weight)
            })
            .collect()
    }

    /// Rank one pool
    pub fn rank<T: Rankable>(&self, pool: Vec<T>, inputs: &RankInputs) -> RankedPool<T> {
        let mut ranked = RankedPool::empty();
        ranked.candidate_count = pool.len();
        if pool.is_empty() {
            return ranked;
        }

        let scorers = self.weighted_scorers::<T>(inputs);
        let ctx = ScoringContext {
            search: &inputs.context,
            intent: &inputs.intent,
            signals: &inputs.signals,
            pool: PoolStats::from_candidates(pool.iter().map(|i| i.candidate())),
        };

        let mut items = Vec::with_capacity(pool.len());
        for item in pool {
            if let Some(stop) = inputs.budget.check() {
                ranked.stopped = Some(stop);
                break;
            }
            ranked.evaluated += 1;

            let scored = self.score_item(item, &scorers, &ctx, &mut ranked.faults);
            if scored.score >= self.config.score_floor {
                items.push(scored);
            }
        }

        items.sort_by(compare_scored);
        items.truncate(inputs.max_results);
        ranked.items = items;

        debug!(
            "Ranked {} pool: {} candidates, {} evaluated, {} returned",
            T::KIND,
            ranked.candidate_count,
            ranked.evaluated,
            ranked.items.len()
        );
        ranked
    }

    fn score_item<T: Rankable>(
        &self,
        item: T,
        scorers: &[(Arc<dyn Scorer>, f64)],
        ctx: &ScoringContext<'_>,
        faults: &mut Vec<ScorerFault>,
    ) -> ScoredItem<T> {
        let candidate = item.candidate();
        let mut contributions = Vec::with_capacity(scorers.len());
        let mut weighted: Vec<(f64, MatchCategory, Vec<String>)> = Vec::new();
        let mut total_weight = 0.0_f64;
        let mut total = 0.0_f64;

        for (scorer, weight) in scorers {
            let weight = *weight;
            let outcome = match evaluate(scorer.as_ref(), &candidate, ctx) {
                Ok(outcome) => outcome,
                Err(fault) => {
                    warn!(
                        "Scorer {} failed on {} {}: {}",
                        scorer.kind(),
                        T::KIND,
                        candidate.id(),
                        fault
                    );
                    faults.push(ScorerFault {
                        scorer: scorer.kind(),
                        item_id: candidate.id().to_string(),
                        fault,
                    });
                    contributions.push(ScorerContribution {
                        scorer: scorer.kind(),
                        value: 0.0,
                        weight,
                    });
                    total_weight += weight;
                    continue;
                }
            };

            total_weight += weight;
            total += weight * outcome.value;
            if weight * outcome.value > 0.0 {
                weighted.push((weight * outcome.value, outcome.category, outcome.reasons));
            }
            contributions.push(ScorerContribution {
                scorer: scorer.kind(),
                value: outcome.value,
                weight,
            });
        }

        let score = if total_weight > 0.0 {
            sanitise(total / total_weight)
        } else {
            0.0
        };

        let category = MatchCategory::dominant(weighted.iter().map(|(v, c, _)| (*c, *v)));

        // Strongest contribution first; the sort is stable so equal values keep canonical order
        weighted.sort_by(|a, b| b.0.total_cmp(&a.0));
        let mut reasons: Vec<String> = Vec::new();
        if score > 0.0 {
            for reason in weighted.into_iter().flat_map(|(_, _, r)| r) {
                if !reasons.contains(&reason) {
                    reasons.push(reason);
                }
            }
        }

        ScoredItem {
            item,
            score,
            reasons,
            category,
            breakdown: ScoreBreakdown { contributions },
        }
    }
}

/// Score desc, popularity desc, id asc
pub fn compare_scored<T: Rankable>(a: &ScoredItem<T>, b: &ScoredItem<T>) -> Ordering {
    let (ca, cb) = (a.item.candidate(), b.item.candidate());
    b.score
        .total_cmp(&a.score)
        .then_with(|| cb.popularity().cmp(&ca.popularity()))
        .then_with(|| ca.id().cmp(cb.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Candidate, Place, PlaceList, User};
    use crate::search::intent::{IntentLabel, QueryInterpreter};
    use crate::search::options::{AlgorithmFlags, CancellationFlag};
    use crate::search::scorers::{ScoreOutcome, tag_vocabulary};
    use std::time::Duration;

    fn cozy_pool() -> Vec<Place> {
        vec![
            Place::builder("Blue Bottle Coffee")
                .id("p-blue")
                .tags(["coffee", "cozy"])
                .saved_count(45)
                .build(),
            Place::builder("Tartine Bakery")
                .id("p-tartine")
                .tags(["bakery", "cozy"])
                .saved_count(67)
                .build(),
            Place::builder("La Taqueria")
                .id("p-taqueria")
                .tags(["tacos"])
                .saved_count(89)
                .build(),
        ]
    }

    fn inputs(query: &str, context: SearchContext, places: &[Place], lists: &[PlaceList]) -> RankInputs {
        let vocabulary = tag_vocabulary(places, lists, &[], &[]);
        let intent = QueryInterpreter::new(&context, &vocabulary).interpret(query);
        let active = AlgorithmFlags::default().active_scorers(intent.has_text());
        RankInputs {
            signals: SocialSignals::build(&context, places, lists),
            context,
            intent,
            active,
            max_results: 20,
            budget: RankBudget::unlimited(),
        }
    }

    #[test]
    fn test_cozy_scenario() {
        let pool = cozy_pool();
        let inputs = inputs("cozy", SearchContext::default(), &pool, &[]);
        assert_eq!(inputs.intent.intent_label, IntentLabel::TagLookup);

        let ranked = Ranker::default().rank(pool, &inputs);
        let ids: Vec<_> = ranked.items.iter().map(|i| i.item.id.as_str()).collect();
        assert_eq!(ids, vec!["p-tartine", "p-blue"]);
        for item in &ranked.items {
            assert_eq!(item.category, MatchCategory::SemanticMatch);
            assert!(!item.reasons.is_empty());
        }
        assert_eq!(ranked.candidate_count, 3);
    }

    #[test]
    fn test_scores_bounded_and_sorted() {
        let pool = cozy_pool();
        let inputs = inputs("", SearchContext::default(), &pool, &[]);
        let ranked = Ranker::default().rank(pool, &inputs);
        assert!(!ranked.items.is_empty());
        for pair in ranked.items.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for item in &ranked.items {
            assert!((0.0..=100.0).contains(&item.score));
            assert_eq!(item.reasons.is_empty(), item.score == 0.0);
        }
    }

    #[test]
    fn test_tie_break_popularity_then_id() {
        let pool = vec![
            Place::builder("Cafe B").id("b").tags(["coffee"]).saved_count(10).build(),
            Place::builder("Cafe A").id("a").tags(["coffee"]).saved_count(10).build(),
            Place::builder("Cafe C").id("c").tags(["coffee"]).saved_count(20).build(),
        ];
        let mut inputs = inputs("coffee", SearchContext::default(), &pool, &[]);
        inputs.active = vec![ScorerKind::Lexical];
        let ranked = Ranker::default().rank(pool, &inputs);
        let ids: Vec<_> = ranked.items.iter().map(|i| i.item.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_truncation_is_prefix() {
        let pool: Vec<Place> = (0..10)
            .map(|i| {
                Place::builder(format!("Cafe {}", i))
                    .id(format!("p{}", i))
                    .tags(["coffee"])
                    .saved_count(i * 3)
                    .build()
            })
            .collect();
        let mut full_inputs = inputs("coffee", SearchContext::default(), &pool, &[]);
        let full = Ranker::default().rank(pool.clone(), &full_inputs);
        full_inputs.max_results = 4;
        let short = Ranker::default().rank(pool, &full_inputs);

        let full_ids: Vec<_> = full.items.iter().map(|i| i.item.id.clone()).collect();
        let short_ids: Vec<_> = short.items.iter().map(|i| i.item.id.clone()).collect();
        assert_eq!(short_ids.len(), 4);
        assert_eq!(short_ids[..], full_ids[..4]);
    }

    #[test]
    fn test_possessive_boost() {
        let sara = User::new("u-sara", "Sara Chen", "sarac");
        let context = SearchContext::for_user(User::new("me", "Me", "me")).with_friends(vec![sara]);
        let lists = vec![
            PlaceList::new("l-stranger", "Coffee Spots", "u-stranger")
                .with_tags(["coffee"])
                .with_likes(300),
            PlaceList::new("l-sara", "Morning coffee", "u-sara")
                .with_tags(["coffee"])
                .with_likes(12),
        ];
        let inputs = inputs("sara's coffee spots", context, &[], &lists);
        assert_eq!(inputs.intent.intent_label, IntentLabel::PersonLookup);

        let ranked = Ranker::default().rank(lists, &inputs);
        assert_eq!(ranked.items[0].item.id, "l-sara");
        assert_eq!(ranked.items[0].category, MatchCategory::UserConnection);
        assert!(ranked.items[0].reasons.contains(&"Sara Chen's content".to_string()));
    }

    #[test]
    fn test_empty_pool() {
        let inputs = inputs("anything", SearchContext::default(), &[], &[]);
        let ranked = Ranker::default().rank(Vec::<Place>::new(), &inputs);
        assert!(ranked.items.is_empty());
        assert_eq!(ranked.candidate_count, 0);
    }

    #[test]
    fn test_cancelled_budget_returns_partial() {
        let pool = cozy_pool();
        let flag = CancellationFlag::new();
        flag.cancel();
        let mut inputs = inputs("cozy", SearchContext::default(), &pool, &[]);
        inputs.budget = RankBudget::new(None, Some(flag));
        let ranked = Ranker::default().rank(pool, &inputs);
        assert_eq!(ranked.stopped, Some(BudgetStop::Cancelled));
        assert_eq!(ranked.evaluated, 0);
        assert_eq!(ranked.candidate_count, 3);
    }

    #[derive(Debug)]
    struct Panicky;

    impl Scorer for Panicky {
        fn kind(&self) -> ScorerKind {
            ScorerKind::Trending
        }

        fn score(&self, candidate: &Candidate<'_>, _ctx: &ScoringContext<'_>) -> ScoreOutcome {
            if candidate.id() == "p-blue" {
                panic!("bad data");
            }
            ScoreOutcome::new(50.0, vec!["Fine".into()], MatchCategory::Trending)
        }
    }

    #[test]
    fn test_scorer_fault_is_isolated() {
        let mut registry = ScorerRegistry::default();
        registry.register(Arc::new(Panicky));
        let ranker = Ranker::try_new(RankingConfig::default(), Arc::new(registry)).unwrap();

        let pool = cozy_pool();
        let inputs = inputs("cozy", SearchContext::default(), &pool, &[]);
        let ranked = ranker.rank(pool, &inputs);

        assert_eq!(ranked.faults.len(), 1);
        assert_eq!(ranked.faults[0].item_id, "p-blue");
        assert_eq!(ranked.faults[0].scorer, ScorerKind::Trending);
        assert!(ranked.items.iter().any(|i| i.item.id == "p-blue"));
    }

    /// Scores `p<i>` as `10 * (i + 1)` after a fixed delay
    #[derive(Debug)]
    struct Sluggish(Duration);

    impl Scorer for Sluggish {
        fn kind(&self) -> ScorerKind {
            ScorerKind::Trending
        }

        fn score(&self, candidate: &Candidate<'_>, _ctx: &ScoringContext<'_>) -> ScoreOutcome {
            std::thread::sleep(self.0);
            let rank: f64 = candidate.id()[1..].parse().unwrap();
            ScoreOutcome::new(10.0 * (rank + 1.0), vec!["Slow".into()], MatchCategory::Trending)
        }
    }

    #[test]
    fn test_deadline_mid_pool_returns_sorted_prefix() {
        let mut registry = ScorerRegistry::default();
        registry.register(Arc::new(Sluggish(Duration::from_millis(40))));
        let ranker = Ranker::try_new(RankingConfig::default(), Arc::new(registry)).unwrap();

        let pool: Vec<Place> = (0..6)
            .map(|i| Place::builder(format!("Cafe {}", i)).id(format!("p{}", i)).build())
            .collect();
        let mut inputs = inputs("", SearchContext::default(), &pool, &[]);
        inputs.active = vec![ScorerKind::Trending];
        inputs.max_results = 2;
        inputs.budget = RankBudget::starting_now(Some(Duration::from_millis(100)), None);

        let ranked = ranker.rank(pool, &inputs);

        assert_eq!(ranked.stopped, Some(BudgetStop::Timeout));
        assert_eq!(ranked.candidate_count, 6);
        assert!(ranked.evaluated >= 1 && ranked.evaluated < 6, "{}", ranked.evaluated);

        // best of the scored prefix first, capped at max_results
        let expected: Vec<String> = (0..ranked.evaluated)
            .rev()
            .take(2)
            .map(|i| format!("p{}", i))
            .collect();
        let ids: Vec<String> = ranked.items.iter().map(|i| i.item.id.clone()).collect();
        assert_eq!(ids, expected);
        assert_eq!(ranked.items[0].score, 10.0 * ranked.evaluated as f64);
    }

    #[test]
    fn test_contributing_scorers() {
        let pool = cozy_pool();
        let inputs = inputs("cozy", SearchContext::default(), &pool, &[]);
        let ranked = Ranker::default().rank(pool, &inputs);
        let used = ranked.contributing_scorers();
        assert!(used.contains(&ScorerKind::Lexical));
        assert!(used.contains(&ScorerKind::Trending));
        assert!(!used.contains(&ScorerKind::Social));
    }
}
