//! Intelligent search
//!
//! This module turns a raw query plus a per-user context into ranked,
//! explained results:
//!
//! - [`intent`] interprets the query (tokens, mentioned user, tags, intent)
//! - [`scorers`] hold the six independent relevance strategies
//! - [`scoring`] holds the weights and tuning that combine them
//! - [`ranker`] aggregates scorer outputs per pool
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use wayfind::models::{Place, SearchContext};
//! use wayfind::search::{AlgorithmFlags, QueryInterpreter, RankBudget, RankInputs, Ranker, SocialSignals};
//!
//! let places = vec![
//!     Place::builder("Blue Bottle Coffee").tags(["coffee", "cozy"]).saved_count(45).build(),
//!     Place::builder("La Taqueria").tags(["tacos"]).saved_count(89).build(),
//! ];
//! let context = SearchContext::default();
//! let vocabulary: BTreeSet<String> = ["coffee", "cozy", "tacos"].map(String::from).into();
//! let intent = QueryInterpreter::new(&context, &vocabulary).interpret("cozy coffee");
//!
//! let inputs = RankInputs {
//!     signals: SocialSignals::build(&context, &places, &[]),
//!     active: AlgorithmFlags::default().active_scorers(intent.has_text()),
//!     context,
//!     intent,
//!     max_results: 10,
//!     budget: RankBudget::unlimited(),
//! };
//! let ranked = Ranker::default().rank(places, &inputs);
//! assert_eq!(ranked.items[0].item.name, "Blue Bottle Coffee");
//! ```

pub mod category;
pub mod intent;
pub mod options;
pub mod ranker;
pub mod result;
pub mod scorers;
pub mod scoring;
pub mod text;

pub use category::MatchCategory;
pub use intent::{IntentLabel, QueryIntent, QueryInterpreter};
pub use options::{AlgorithmFlags, BudgetStop, CancellationFlag, RankBudget, SearchOptions};
pub use ranker::{RankInputs, RankedPool, Ranker, ScorerFault};
pub use result::{
    IntelligentSearchResult, QuerySummary, ScoreBreakdown, ScoredItem, ScorerContribution,
    SearchAnalytics,
};
pub use scorers::{ScoreOutcome, Scorer, ScorerKind, ScorerRegistry, SocialSignals};
pub use scoring::{RankingConfig, ScorerSettings, ScorerWeights};
