//! Popularity relative to the current pool

use super::{MAX_SCORE, ScoreOutcome, Scorer, ScorerKind, ScoringContext};
use crate::models::Candidate;
use crate::search::category::MatchCategory;
use crate::search::scoring::TrendingSettings;

/// Min-max normalizes the popularity counter over the pool being ranked
///
/// The counter is `saved_count` for places, `likes` for lists and posts and
/// `follower_count` for users. A pool with no spread scores zero.
#[derive(Debug, Clone, Default)]
pub struct TrendingScorer {
    settings: TrendingSettings,
}

impl TrendingScorer {
    pub fn new(settings: TrendingSettings) -> Self {
        Self { settings }
    }
}

impl Scorer for TrendingScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Trending
    }

    fn score(&self, candidate: &Candidate<'_>, ctx: &ScoringContext<'_>) -> ScoreOutcome {
        let min = ctx.pool.min_popularity;
        let max = ctx.pool.max_popularity;
        if max <= min {
            return ScoreOutcome::zero(MatchCategory::Trending);
        }

        let count = candidate.popularity().clamp(min, max);
        let value = MAX_SCORE * (count - min) as f64 / (max - min) as f64;
        let reason = if value >= self.settings.popular_threshold {
            "Popular"
        } else if value > 0.0 {
            "Gaining popularity"
        } else {
            return ScoreOutcome::zero(MatchCategory::Trending);
        };

        ScoreOutcome::new(value, vec![reason.to_string()], MatchCategory::Trending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Place, SearchContext};
    use crate::search::intent::QueryIntent;
    use crate::search::scorers::{PoolStats, SocialSignals};

    fn run(pool: &[Place], index: usize) -> ScoreOutcome {
        let search = SearchContext::default();
        let intent = QueryIntent::default();
        let signals = SocialSignals::default();
        let ctx = ScoringContext {
            search: &search,
            intent: &intent,
            signals: &signals,
            pool: PoolStats::from_candidates(pool.iter().map(Candidate::Place)),
        };
        TrendingScorer::default().score(&Candidate::Place(&pool[index]), &ctx)
    }

    fn pool() -> Vec<Place> {
        vec![
            Place::builder("Blue Bottle").saved_count(45).build(),
            Place::builder("Tartine").saved_count(67).build(),
            Place::builder("La Taqueria").saved_count(89).build(),
        ]
    }

    #[test]
    fn test_min_max_normalization() {
        let pool = pool();
        assert_eq!(run(&pool, 0).value, 0.0);
        assert!(run(&pool, 0).reasons.is_empty());

        let mid = run(&pool, 1);
        assert!((mid.value - 50.0).abs() < 1e-9);
        assert_eq!(mid.reasons, vec!["Gaining popularity"]);

        let top = run(&pool, 2);
        assert_eq!(top.value, 100.0);
        assert_eq!(top.reasons, vec!["Popular"]);
        assert_eq!(top.category, MatchCategory::Trending);
    }

    #[test]
    fn test_flat_pool_scores_zero() {
        let pool = vec![
            Place::builder("a").saved_count(5).build(),
            Place::builder("b").saved_count(5).build(),
        ];
        assert_eq!(run(&pool, 0).value, 0.0);
        assert_eq!(run(&pool[..1], 0).value, 0.0);
    }
}
