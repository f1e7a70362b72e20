//! Degradation warnings and the telemetry seam
//!
//! Nothing that goes wrong inside a search reaches the caller as an error.
//! Instead every degradation becomes an [`EngineWarning`], is listed in the
//! result analytics and is handed to the engine's [`TelemetrySink`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

use crate::models::ItemKind;
use crate::search::options::BudgetStop;
use crate::search::result::{QuerySummary, SearchAnalytics};
use crate::search::scorers::ScorerKind;

/// A non-fatal problem encountered during one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineWarning {
    /// A pool could not be retrieved or ranked and was replaced by an empty one
    PartialData { pool: ItemKind, reason: String },

    /// The time budget ran out during `stage`
    Timeout { stage: String },

    /// The caller cancelled the call during `stage`
    Cancelled { stage: String },

    /// A scorer panicked or produced a non-finite value for one item
    ScorerFault {
        scorer: ScorerKind,
        pool: ItemKind,
        item_id: String,
        detail: String,
    },

    /// The context carried no current user; personal signals are unavailable
    MissingCurrentUser,
}

impl EngineWarning {
    /// Warning for a ranking stage stopped by the budget
    pub fn budget(stop: BudgetStop, stage: impl Into<String>) -> Self {
        match stop {
            BudgetStop::Timeout => EngineWarning::Timeout {
                stage: stage.into(),
            },
            BudgetStop::Cancelled => EngineWarning::Cancelled {
                stage: stage.into(),
            },
        }
    }
}

impl fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineWarning::PartialData { pool, reason } => {
                write!(f, "{} pool unavailable: {}", pool.pool_name(), reason)
            }
            EngineWarning::Timeout { stage } => write!(f, "timed out during {}", stage),
            EngineWarning::Cancelled { stage } => write!(f, "cancelled during {}", stage),
            EngineWarning::ScorerFault {
                scorer,
                pool,
                item_id,
                detail,
            } => write!(f, "{} scorer fault on {} {}: {}", scorer, pool, item_id, detail),
            EngineWarning::MissingCurrentUser => {
                write!(f, "no current user; personal signals unavailable")
            }
        }
    }
}

/// Receives analytics and degradation warnings
///
/// Implementations must be cheap and must not block; they are called inline
/// at the end of every search.
#[cfg_attr(test, mockall::automock)]
pub trait TelemetrySink: Send + Sync + fmt::Debug {
    /// Called once per degradation, in the order they were observed
    fn record_warning(&self, warning: &EngineWarning);

    /// Called once per search with the final analytics
    fn record_analytics(&self, query: &QuerySummary, analytics: &SearchAnalytics);
}

/// Default sink: logs through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn record_warning(&self, warning: &EngineWarning) {
        warn!("Search degraded: {}", warning);
    }

    fn record_analytics(&self, query: &QuerySummary, analytics: &SearchAnalytics) {
        let algorithms: Vec<&str> = analytics.algorithms_used.iter().map(|a| a.as_str()).collect();
        info!(
            "Search '{}' ({}, confidence {:.2}) in {}ms: {:?} candidates, algorithms [{}], timed_out={}, {} warnings",
            query.raw,
            query.intent.intent_label,
            query.confidence,
            analytics.latency_ms,
            analytics.candidate_counts,
            algorithms.join(", "),
            analytics.timed_out,
            analytics.warnings.len()
        );
    }
}
