//! Social-graph proximity of an item's owner

use super::{MAX_SCORE, ScoreOutcome, Scorer, ScorerKind, ScoringContext};
use crate::models::{Candidate, Relation};
use crate::search::category::MatchCategory;
use crate::search::scoring::SocialSettings;

/// Scores items by who owns or authored them
///
/// Content of the user named in the query scores highest; otherwise friends
/// and followed users add a fixed bonus. A user candidate is its own owner.
#[derive(Debug, Clone, Default)]
pub struct SocialScorer {
    settings: SocialSettings,
}

impl SocialScorer {
    pub fn new(settings: SocialSettings) -> Self {
        Self { settings }
    }
}

impl Scorer for SocialScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Social
    }

    fn score(&self, candidate: &Candidate<'_>, ctx: &ScoringContext<'_>) -> ScoreOutcome {
        let owner = candidate.owner_id();
        if owner.is_empty() {
            return ScoreOutcome::zero(MatchCategory::UserConnection);
        }

        if let Some(mentioned) = &ctx.intent.mentioned_user {
            if mentioned.id == owner {
                return ScoreOutcome::new(
                    self.settings.mention_score,
                    vec![format!("{}'s content", mentioned.label())],
                    MatchCategory::UserConnection,
                );
            }
        }

        let Some((user, relation)) = ctx.search.relation_to(owner) else {
            return ScoreOutcome::zero(MatchCategory::UserConnection);
        };

        let (bonus, reason) = match relation {
            Relation::Friend => (
                self.settings.friend_score,
                format!("From your friend {}", user.label()),
            ),
            Relation::Following => (
                self.settings.following_score,
                format!("From {}, who you follow", user.label()),
            ),
        };

        ScoreOutcome::new(
            bonus.min(MAX_SCORE),
            vec![reason],
            MatchCategory::UserConnection,
        )
    }
}
