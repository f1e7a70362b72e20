//! Geographic proximity

use super::{MAX_SCORE, ScoreOutcome, Scorer, ScorerKind, ScoringContext};
use crate::models::{Candidate, ItemKind};
use crate::search::category::MatchCategory;
use crate::search::scoring::LocationSettings;

/// Scores places by exponential distance decay from the caller
#[derive(Debug, Clone, Default)]
pub struct LocationScorer {
    settings: LocationSettings,
}

impl LocationScorer {
    pub fn new(settings: LocationSettings) -> Self {
        Self { settings }
    }
}

impl Scorer for LocationScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Location
    }

    fn applies_to(&self, kind: ItemKind) -> bool {
        kind == ItemKind::Place
    }

    fn score(&self, candidate: &Candidate<'_>, ctx: &ScoringContext<'_>) -> ScoreOutcome {
        let (Some(origin), Some(target)) = (ctx.search.location, candidate.coordinates()) else {
            return ScoreOutcome::zero(MatchCategory::LocationBased);
        };
        if !origin.is_valid() || !target.is_valid() || !(self.settings.decay_km > 0.0) {
            return ScoreOutcome::zero(MatchCategory::LocationBased);
        }

        let distance = origin.distance_km(&target);
        let value = MAX_SCORE * (-distance / self.settings.decay_km).exp();
        ScoreOutcome::new(
            value,
            vec![format!("Nearby ({:.1}km)", distance)],
            MatchCategory::LocationBased,
        )
    }
}
