//! Per-call search options and the ranking budget

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::scorers::ScorerKind;

/// Switches for the individual ranking algorithms
///
/// `enable_content_based` gates the preference scorer. Lexical matching is
/// the search itself and always runs when the query has tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AlgorithmFlags {
    pub enable_nlp: bool,
    pub enable_collaborative: bool,
    pub enable_content_based: bool,
    pub enable_social: bool,
    pub enable_location: bool,
    pub enable_trending: bool,
}

impl Default for AlgorithmFlags {
    fn default() -> Self {
        Self {
            enable_nlp: true,
            enable_collaborative: true,
            enable_content_based: true,
            enable_social: true,
            enable_location: true,
            enable_trending: true,
        }
    }
}

impl AlgorithmFlags {
    /// Whether the scorer may run at all
    pub fn allows(&self, kind: ScorerKind) -> bool {
        match kind {
            ScorerKind::Lexical => true,
            ScorerKind::Social => self.enable_social,
            ScorerKind::Collaborative => self.enable_collaborative,
            ScorerKind::Preference => self.enable_content_based,
            ScorerKind::Location => self.enable_location,
            ScorerKind::Trending => self.enable_trending,
        }
    }

    /// Scorers to evaluate for a query, in canonical order
    ///
    /// Without query text only preference and trending run.
    pub fn active_scorers(&self, has_text: bool) -> Vec<ScorerKind> {
        ScorerKind::ALL
            .into_iter()
            .filter(|kind| self.allows(*kind))
            .filter(|kind| {
                has_text || matches!(kind, ScorerKind::Preference | ScorerKind::Trending)
            })
            .collect()
    }
}

/// Shared flag the caller can set to stop ranking early
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl PartialEq for CancellationFlag {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Options for one search call
///
/// Fields left as `None` take the engine configuration's value
/// (`ranking.max_results`, `search.include_discovery`,
/// `search.default_timeout`). All algorithms are on by default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchOptions {
    /// Per-pool result cap
    pub max_results: Option<usize>,

    /// Fill `discovery` for empty or very short queries
    pub include_discovery: Option<bool>,

    /// Algorithm switches
    pub algorithms: AlgorithmFlags,

    /// Budget for the whole call
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,

    /// Caller-controlled cancellation
    #[serde(skip)]
    pub cancellation: Option<CancellationFlag>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: None,
            include_discovery: None,
            algorithms: AlgorithmFlags::default(),
            timeout: None,
            cancellation: None,
        }
    }
}

impl SearchOptions {
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_discovery(mut self, include: bool) -> Self {
        self.include_discovery = Some(include);
        self
    }

    pub fn with_algorithms(mut self, algorithms: AlgorithmFlags) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }
}

/// Why ranking stopped before the pool was exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStop {
    Timeout,
    Cancelled,
}

/// Deadline and cancellation checked before every candidate
#[derive(Debug, Clone, Default)]
pub struct RankBudget {
    deadline: Option<Instant>,
    cancellation: Option<CancellationFlag>,
}

impl RankBudget {
    /// A budget that never runs out
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn new(deadline: Option<Instant>, cancellation: Option<CancellationFlag>) -> Self {
        Self {
            deadline,
            cancellation,
        }
    }

    /// Budget starting now and lasting `timeout`
    pub fn starting_now(timeout: Option<Duration>, cancellation: Option<CancellationFlag>) -> Self {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        Self::new(deadline, cancellation)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline; `None` when unbounded
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Reason to stop, if any; cancellation wins over the deadline
    pub fn check(&self) -> Option<BudgetStop> {
        if self.cancellation.as_ref().is_some_and(|c| c.is_cancelled()) {
            return Some(BudgetStop::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(BudgetStop::Timeout);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.max_results, None);
        assert_eq!(options.include_discovery, None);
        assert!(options.algorithms.enable_nlp);
        assert!(options.timeout.is_none());
    }

    #[test]
    fn test_active_scorers_without_text() {
        let active = AlgorithmFlags::default().active_scorers(false);
        assert_eq!(active, vec![ScorerKind::Preference, ScorerKind::Trending]);

        let flags = AlgorithmFlags {
            enable_trending: false,
            ..Default::default()
        };
        assert_eq!(flags.active_scorers(false), vec![ScorerKind::Preference]);
    }

    #[test]
    fn test_active_scorers_respect_flags() {
        let flags = AlgorithmFlags {
            enable_location: false,
            enable_social: false,
            ..Default::default()
        };
        let active = flags.active_scorers(true);
        assert!(!active.contains(&ScorerKind::Location));
        assert!(!active.contains(&ScorerKind::Social));
        assert!(active.contains(&ScorerKind::Lexical));
    }

    #[test]
    fn test_budget_cancellation() {
        let flag = CancellationFlag::new();
        let budget = RankBudget::new(None, Some(flag.clone()));
        assert_eq!(budget.check(), None);
        flag.cancel();
        assert_eq!(budget.check(), Some(BudgetStop::Cancelled));
    }

    #[test]
    fn test_budget_deadline() {
        let budget = RankBudget::starting_now(Some(Duration::ZERO), None);
        assert_eq!(budget.check(), Some(BudgetStop::Timeout));
        assert_eq!(budget.remaining(), Some(Duration::ZERO));
        assert_eq!(RankBudget::unlimited().check(), None);
    }

    #[test]
    fn test_options_deserialize_timeout() {
        let options: SearchOptions =
            serde_json::from_str(r#"{"max_results": 5, "timeout": "250ms"}"#).unwrap();
        assert_eq!(options.max_results, Some(5));
        assert_eq!(options.include_discovery, None);
        assert_eq!(options.timeout, Some(Duration::from_millis(250)));
    }
}
