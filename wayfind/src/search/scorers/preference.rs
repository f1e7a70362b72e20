//! Match against the caller's own interests

use super::{ScoreOutcome, Scorer, ScorerKind, ScoringContext, tag_overlap};
use crate::models::Candidate;
use crate::search::category::MatchCategory;

/// Maximum number of tags listed in the reason
const MAX_LISTED_TAGS: usize = 3;

/// Scores the share of an item's tags found among the user's favorite
/// categories, own tags and the tags of what they saved or liked
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferenceScorer;

impl Scorer for PreferenceScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Preference
    }

    fn score(&self, candidate: &Candidate<'_>, ctx: &ScoringContext<'_>) -> ScoreOutcome {
        let tags = candidate.tag_set();
        let (value, matched) = tag_overlap(&tags, &ctx.signals.interest_tags);
        if matched.is_empty() {
            return ScoreOutcome::zero(MatchCategory::PreferenceMatch);
        }
        let listed: Vec<&str> = matched.into_iter().take(MAX_LISTED_TAGS).collect();
        ScoreOutcome::new(
            value,
            vec![format!("Matches your interests: {}", listed.join(", "))],
            MatchCategory::PreferenceMatch,
        )
    }
}
