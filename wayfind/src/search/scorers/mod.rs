//! Independent relevance scorers
//!
//! Each scorer looks at one candidate through one lens (text, social graph,
//! network taste, personal taste, distance, popularity) and returns a value in
//! `[0, 100]` with the reasons behind it. Scorers never fail: missing data
//! yields a zero outcome. The ranker combines their outputs.
//!
//! # Examples
//!
//! ```
//! use wayfind::search::scorers::{Scorer, ScorerKind, ScoreOutcome, ScoringContext};
//! use wayfind::search::MatchCategory;
//! use wayfind::models::Candidate;
//!
//! #[derive(Debug)]
//! struct LongNames;
//!
//! impl Scorer for LongNames {
//!     fn kind(&self) -> ScorerKind {
//!         ScorerKind::Lexical
//!     }
//!
//!     fn score(&self, candidate: &Candidate<'_>, _ctx: &ScoringContext<'_>) -> ScoreOutcome {
//!         let len = candidate.name().len() as f64;
//!         ScoreOutcome::new(len, vec!["Long name".into()], MatchCategory::SemanticMatch)
//!     }
//! }
//! ```

pub mod collaborative;
pub mod lexical;
pub mod location;
pub mod preference;
pub mod registry;
pub mod signals;
pub mod social;
pub mod trending;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use super::category::MatchCategory;
use super::intent::QueryIntent;
use crate::models::{Candidate, ItemKind, SearchContext};

pub use collaborative::CollaborativeScorer;
pub use lexical::LexicalScorer;
pub use location::LocationScorer;
pub use preference::PreferenceScorer;
pub use registry::ScorerRegistry;
pub use signals::{SocialSignals, tag_vocabulary};
pub use social::SocialScorer;
pub use trending::TrendingScorer;

/// Upper bound of every score
pub const MAX_SCORE: f64 = 100.0;

/// The six scoring strategies, in canonical order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    Lexical,
    Social,
    Collaborative,
    Preference,
    Location,
    Trending,
}

impl ScorerKind {
    /// All scorers in canonical order
    pub const ALL: [ScorerKind; 6] = [
        ScorerKind::Lexical,
        ScorerKind::Social,
        ScorerKind::Collaborative,
        ScorerKind::Preference,
        ScorerKind::Location,
        ScorerKind::Trending,
    ];

    /// Category reported when this scorer dominates and has no better idea
    pub fn default_category(self) -> MatchCategory {
        match self {
            Self::Lexical => MatchCategory::SemanticMatch,
            Self::Social | Self::Collaborative => MatchCategory::UserConnection,
            Self::Preference => MatchCategory::PreferenceMatch,
            Self::Location => MatchCategory::LocationBased,
            Self::Trending => MatchCategory::Trending,
        }
    }

    /// Reason used when a scorer reports a positive value without one
    fn fallback_reason(self) -> &'static str {
        match self {
            Self::Lexical => "Matches your search",
            Self::Social => "From your network",
            Self::Collaborative => "Saved by people you follow",
            Self::Preference => "Matches your interests",
            Self::Location => "Nearby",
            Self::Trending => "Gaining popularity",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Social => "social",
            Self::Collaborative => "collaborative",
            Self::Preference => "preference",
            Self::Location => "location",
            Self::Trending => "trending",
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one scorer for one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    /// Partial score in `[0, 100]`
    pub value: f64,
    /// Human-readable justification; non-empty iff `value > 0`
    pub reasons: Vec<String>,
    /// Category this outcome argues for
    pub category: MatchCategory,
}

impl ScoreOutcome {
    pub fn new(value: f64, reasons: Vec<String>, category: MatchCategory) -> Self {
        Self {
            value,
            reasons,
            category,
        }
    }

    /// A zero outcome
    pub fn zero(category: MatchCategory) -> Self {
        Self::new(0.0, Vec::new(), category)
    }

    /// Clamp the value into `[0, 100]` and enforce the reasons invariant
    ///
    /// Non-finite values become zero.
    pub fn sanitised(mut self, kind: ScorerKind) -> Self {
        self.value = sanitise(self.value);
        if self.value > 0.0 {
            if self.reasons.is_empty() {
                self.reasons.push(kind.fallback_reason().to_string());
            }
        } else {
            self.reasons.clear();
        }
        self
    }
}

/// Clamp a raw score into `[0, 100]`; NaN and infinities become 0
pub fn sanitise(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, MAX_SCORE)
    } else {
        0.0
    }
}

/// Popularity range of the pool being scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    pub min_popularity: u64,
    pub max_popularity: u64,
}

impl PoolStats {
    pub fn from_candidates<'a, I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Candidate<'a>>,
    {
        let mut stats: Option<PoolStats> = None;
        for candidate in candidates {
            let p = candidate.popularity();
            stats = Some(match stats {
                None => PoolStats {
                    min_popularity: p,
                    max_popularity: p,
                },
                Some(s) => PoolStats {
                    min_popularity: s.min_popularity.min(p),
                    max_popularity: s.max_popularity.max(p),
                },
            });
        }
        stats.unwrap_or_default()
    }
}

/// Everything a scorer may look at besides the candidate itself
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub search: &'a SearchContext,
    pub intent: &'a QueryIntent,
    pub signals: &'a SocialSignals,
    pub pool: PoolStats,
}

/// A single scoring strategy
///
/// Implementations must be pure: the same candidate and context always
/// produce the same outcome. They should return raw values; the ranker
/// sanitises them and treats panics and non-finite values as faults.
pub trait Scorer: Send + Sync + fmt::Debug {
    /// Which strategy this is
    fn kind(&self) -> ScorerKind;

    /// Whether the scorer has anything to say about this item kind
    fn applies_to(&self, _kind: ItemKind) -> bool {
        true
    }

    /// Score one candidate
    fn score(&self, candidate: &Candidate<'_>, ctx: &ScoringContext<'_>) -> ScoreOutcome;
}

/// How a scorer misbehaved
#[derive(Debug, Clone, PartialEq)]
pub enum FaultKind {
    Panicked(String),
    NonFinite(f64),
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Panicked(msg) => write!(f, "panicked: {}", msg),
            FaultKind::NonFinite(v) => write!(f, "returned non-finite value {}", v),
        }
    }
}

/// Run a scorer, isolating panics and non-finite output
///
/// On success the outcome is already sanitised.
pub fn evaluate(
    scorer: &dyn Scorer,
    candidate: &Candidate<'_>,
    ctx: &ScoringContext<'_>,
) -> Result<ScoreOutcome, FaultKind> {
    let kind = scorer.kind();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| scorer.score(candidate, ctx)))
        .map_err(|payload| FaultKind::Panicked(panic_message(payload.as_ref())))?;
    if !outcome.value.is_finite() {
        return Err(FaultKind::NonFinite(outcome.value));
    }
    Ok(outcome.sanitised(kind))
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// `100 * |item ∩ reference| / |item|` with the matched tags
pub(crate) fn tag_overlap<'t>(
    item_tags: &'t BTreeSet<String>,
    reference: &BTreeSet<String>,
) -> (f64, Vec<&'t str>) {
    if item_tags.is_empty() || reference.is_empty() {
        return (0.0, Vec::new());
    }
    let matched: Vec<&str> = item_tags
        .iter()
        .filter(|t| reference.contains(*t))
        .map(String::as_str)
        .collect();
    let value = MAX_SCORE * matched.len() as f64 / item_tags.len() as f64;
    (value, matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Place;

    #[derive(Debug)]
    struct Exploding;

    impl Scorer for Exploding {
        fn kind(&self) -> ScorerKind {
            ScorerKind::Trending
        }

        fn score(&self, _candidate: &Candidate<'_>, _ctx: &ScoringContext<'_>) -> ScoreOutcome {
            panic!("boom")
        }
    }

    #[derive(Debug)]
    struct NotANumber;

    impl Scorer for NotANumber {
        fn kind(&self) -> ScorerKind {
            ScorerKind::Lexical
        }

        fn score(&self, _candidate: &Candidate<'_>, _ctx: &ScoringContext<'_>) -> ScoreOutcome {
            ScoreOutcome::new(f64::NAN, vec!["?".into()], MatchCategory::SemanticMatch)
        }
    }

    fn with_ctx<R>(f: impl FnOnce(&ScoringContext<'_>) -> R) -> R {
        let search = SearchContext::default();
        let intent = QueryIntent::default();
        let signals = SocialSignals::default();
        let ctx = ScoringContext {
            search: &search,
            intent: &intent,
            signals: &signals,
            pool: PoolStats::default(),
        };
        f(&ctx)
    }

    #[test]
    fn test_sanitise() {
        assert_eq!(sanitise(f64::NAN), 0.0);
        assert_eq!(sanitise(f64::INFINITY), 0.0);
        assert_eq!(sanitise(-3.0), 0.0);
        assert_eq!(sanitise(250.0), 100.0);
        assert_eq!(sanitise(42.5), 42.5);
    }

    #[test]
    fn test_sanitised_enforces_reasons() {
        let outcome = ScoreOutcome::new(0.0, vec!["stale".into()], MatchCategory::Trending)
            .sanitised(ScorerKind::Trending);
        assert!(outcome.reasons.is_empty());

        let outcome = ScoreOutcome::new(10.0, vec![], MatchCategory::Trending)
            .sanitised(ScorerKind::Trending);
        assert_eq!(outcome.reasons, vec!["Gaining popularity"]);
    }

    #[test]
    fn test_evaluate_catches_panic() {
        let place = Place::new("p1", "Somewhere");
        let result = with_ctx(|ctx| evaluate(&Exploding, &Candidate::Place(&place), ctx));
        assert!(matches!(result, Err(FaultKind::Panicked(msg)) if msg == "boom"));
    }

    #[test]
    fn test_evaluate_rejects_non_finite() {
        let place = Place::new("p1", "Somewhere");
        let result = with_ctx(|ctx| evaluate(&NotANumber, &Candidate::Place(&place), ctx));
        assert!(matches!(result, Err(FaultKind::NonFinite(_))));
    }

    #[test]
    fn test_pool_stats() {
        let a = Place::builder("a").saved_count(10).build();
        let b = Place::builder("b").saved_count(3).build();
        let stats = PoolStats::from_candidates([Candidate::Place(&a), Candidate::Place(&b)]);
        assert_eq!(stats.min_popularity, 3);
        assert_eq!(stats.max_popularity, 10);
        assert_eq!(PoolStats::from_candidates([]), PoolStats::default());
    }

    #[test]
    fn test_canonical_order() {
        let mut sorted = ScorerKind::ALL.to_vec();
        sorted.sort();
        assert_eq!(sorted, ScorerKind::ALL);
    }
}
