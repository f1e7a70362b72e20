//! Taste of the caller's network

use super::{ScoreOutcome, Scorer, ScorerKind, ScoringContext, tag_overlap};
use crate::models::Candidate;
use crate::search::category::MatchCategory;

/// Scores the share of an item's tags that also appear on places and lists
/// saved or liked by friends and followed users
#[derive(Debug, Clone, Copy, Default)]
pub struct CollaborativeScorer;

impl Scorer for CollaborativeScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Collaborative
    }

    fn score(&self, candidate: &Candidate<'_>, ctx: &ScoringContext<'_>) -> ScoreOutcome {
        let tags = candidate.tag_set();
        let (value, matched) = tag_overlap(&tags, &ctx.signals.network_tags);
        if matched.is_empty() {
            return ScoreOutcome::zero(MatchCategory::UserConnection);
        }
        ScoreOutcome::new(
            value,
            vec!["Saved by people you follow".to_string()],
            MatchCategory::UserConnection,
        )
    }
}
