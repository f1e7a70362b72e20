//! Ranked results and call analytics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::MatchCategory;
use super::intent::QueryIntent;
use super::scorers::ScorerKind;
use crate::discovery::DiscoveryRecommendation;
use crate::models::{Place, PlaceList, Post, User};

/// One scorer's part in a final score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScorerContribution {
    pub scorer: ScorerKind,
    /// Raw scorer value in `[0, 100]`
    pub value: f64,
    /// Effective weight after intent reweighting
    pub weight: f64,
}

/// Per-scorer explanation of a final score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub contributions: Vec<ScorerContribution>,
}

impl ScoreBreakdown {
    pub fn value_of(&self, scorer: ScorerKind) -> Option<f64> {
        self.contributions
            .iter()
            .find(|c| c.scorer == scorer)
            .map(|c| c.value)
    }

    /// Sum of the weights of every evaluated scorer
    pub fn total_weight(&self) -> f64 {
        self.contributions.iter().map(|c| c.weight).sum()
    }
}

/// An item with its final score and explanation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredItem<T> {
    pub item: T,
    /// Final score in `[0, 100]`
    pub score: f64,
    /// Non-empty iff `score > 0`
    pub reasons: Vec<String>,
    pub category: MatchCategory,
    pub breakdown: ScoreBreakdown,
}

/// What the engine understood of the query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct QuerySummary {
    pub raw: String,
    pub intent: QueryIntent,
    pub confidence: f64,
}

impl From<QueryIntent> for QuerySummary {
    fn from(intent: QueryIntent) -> Self {
        Self {
            raw: intent.raw_text.clone(),
            confidence: intent.confidence,
            intent,
        }
    }
}

/// Diagnostics for one call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchAnalytics {
    /// Scorers that contributed to at least one returned item, canonical order
    pub algorithms_used: Vec<ScorerKind>,
    /// Pool sizes after filtering and before truncation
    pub candidate_counts: BTreeMap<String, usize>,
    pub latency_ms: u64,
    pub timed_out: bool,
    pub warnings: Vec<String>,
}

/// Result of [`crate::core::SearchEngine::search_intelligently`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct IntelligentSearchResult {
    pub query: QuerySummary,
    pub places: Vec<ScoredItem<Place>>,
    pub lists: Vec<ScoredItem<PlaceList>>,
    pub users: Vec<ScoredItem<User>>,
    pub posts: Vec<ScoredItem<Post>>,
    /// Recommendations for empty or very short queries
    pub discovery: Vec<DiscoveryRecommendation>,
    pub analytics: SearchAnalytics,
}

impl IntelligentSearchResult {
    /// Number of scored items across the four pools
    pub fn total_results(&self) -> usize {
        self.places.len() + self.lists.len() + self.users.len() + self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_results() == 0 && self.discovery.is_empty()
    }
}
