//! The search engine facade
//!
//! [`SearchEngine`] wires a [`CandidateRepository`] to the query interpreter,
//! the ranker and the discovery recommender. Both entry points are
//! infallible: anything that goes wrong during a call degrades the result
//! and is reported as an [`EngineWarning`].

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinError;
use tracing::debug;

use crate::config::{EngineConfig, validate_config};
use crate::discovery::{DiscoveryRecommendation, DiscoveryRecommender};
use crate::models::{ItemKind, Place, PlaceList, Post, Rankable, SearchContext, User};
use crate::search::intent::{QueryIntent, QueryInterpreter};
use crate::search::options::{BudgetStop, RankBudget, SearchOptions};
use crate::search::ranker::{RankInputs, RankedPool, Ranker};
use crate::search::result::{IntelligentSearchResult, QuerySummary, ScoredItem, SearchAnalytics};
use crate::search::scorers::{Scorer, ScorerKind, ScorerRegistry, SocialSignals, tag_vocabulary};
use crate::storage::{CandidateRepository, SearchFilters, StorageError};
use crate::telemetry::{EngineWarning, TelemetrySink, TracingTelemetry};
use crate::{Result, WayfindError};

/// Scorers behind the discovery block attached to short searches
const SEARCH_DISCOVERY_SCORERS: [ScorerKind; 2] = [ScorerKind::Preference, ScorerKind::Trending];

/// Ranks places, lists, users and posts for a query and a caller
///
/// The engine holds no per-call state and caches nothing; every call reads
/// fresh pools from the repository.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    repository: Arc<dyn CandidateRepository>,
    config: EngineConfig,
    ranker: Arc<Ranker>,
    recommender: DiscoveryRecommender,
    telemetry: Arc<dyn TelemetrySink>,
}

impl SearchEngine {
    /// Create an engine, returning an error if the configuration is invalid
    pub fn new(repository: Arc<dyn CandidateRepository>, config: EngineConfig) -> Result<Self> {
        validate_config(&config)?;

        let registry = Arc::new(ScorerRegistry::with_defaults(&config.scorers));
        let ranker = Ranker::try_new(config.ranking.clone(), Arc::clone(&registry))
            .map_err(WayfindError::Configuration)?;

        Ok(Self {
            repository,
            recommender: DiscoveryRecommender::new(registry),
            ranker: Arc::new(ranker),
            config,
            telemetry: Arc::new(TracingTelemetry),
        })
    }

    /// Create an engine with the default configuration
    pub fn with_defaults(repository: Arc<dyn CandidateRepository>) -> Result<Self> {
        Self::new(repository, EngineConfig::default())
    }

    /// Send warnings and analytics to `telemetry` instead of the log
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Register a scorer, replacing the built-in scorer of the same kind
    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        let mut registry = ScorerRegistry::clone(self.ranker.registry());
        registry.register(scorer);
        let registry = Arc::new(registry);

        self.ranker = Arc::new(self.ranker.with_registry(Arc::clone(&registry)));
        self.recommender = DiscoveryRecommender::new(registry);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<dyn CandidateRepository> {
        &self.repository
    }

    /// Ask the repository whether it can serve pools
    pub async fn health_check(&self) -> Result<bool> {
        Ok(self.repository.health_check().await?)
    }

    /// Search options with every unset field filled from the configuration
    pub fn default_options(&self) -> SearchOptions {
        self.resolve(SearchOptions::default())
    }

    fn resolve(&self, options: SearchOptions) -> SearchOptions {
        SearchOptions {
            max_results: options.max_results.or(Some(self.config.ranking.max_results)),
            include_discovery: options
                .include_discovery
                .or(Some(self.config.search.include_discovery)),
            timeout: options.timeout.or(self.config.search.default_timeout),
            ..options
        }
    }

    /// Interpret `query`, rank the four candidate pools for `context` and
    /// attach discovery recommendations for short queries when asked to
    ///
    /// Without a current user the query is not interpreted: ranking falls
    /// back to the general intent with preference and trending only.
    pub async fn search_intelligently(
        &self,
        query: &str,
        context: &SearchContext,
        filters: &SearchFilters,
        options: SearchOptions,
    ) -> IntelligentSearchResult {
        let started = Instant::now();
        let options = self.resolve(options);
        let budget = RankBudget::starting_now(options.timeout, options.cancellation.clone());
        let mut report = CallReport::default();

        let has_user = context.current_user.is_some();
        if !has_user {
            report.warn(EngineWarning::MissingCurrentUser);
        }

        let (places, lists, users, posts) = self.fetch_pools(filters, &budget, &mut report).await;

        let center = context.location;
        let places: Vec<Place> = places
            .into_iter()
            .filter(|p| filters.matches_place(p, center))
            .collect();
        let lists: Vec<PlaceList> = lists.into_iter().filter(|l| filters.matches_list(l)).collect();
        let current_user_id = context.current_user_id();
        let users: Vec<User> = users
            .into_iter()
            .filter(|u| filters.matches_user(u) && current_user_id != Some(u.id.as_str()))
            .collect();
        let posts: Vec<Post> = posts.into_iter().filter(|p| filters.matches_post(p)).collect();

        let intent = if has_user {
            let vocabulary = tag_vocabulary(&places, &lists, &users, &posts);
            QueryInterpreter::new(context, &vocabulary)
                .with_nlp(options.algorithms.enable_nlp)
                .interpret(query)
        } else {
            QueryIntent::empty(query)
        };
        debug!(
            "Query '{}' interpreted as {} (confidence {:.2})",
            query, intent.intent_label, intent.confidence
        );

        let include_discovery = options.include_discovery.unwrap_or_default();
        let discovery = if include_discovery && self.is_short_query(query) {
            let algorithms: Vec<ScorerKind> = SEARCH_DISCOVERY_SCORERS
                .into_iter()
                .filter(|kind| options.algorithms.allows(*kind))
                .collect();
            let outcome = self.recommender.recommend_with(
                context,
                &places,
                &lists,
                self.config.discovery.default_count,
                &algorithms,
            );
            for fault in outcome.faults {
                report.warn(fault);
            }
            report
                .algorithms
                .extend(outcome.recommendations.iter().map(|r| r.algorithm));
            outcome.recommendations
        } else {
            Vec::new()
        };

        let inputs = Arc::new(RankInputs {
            signals: SocialSignals::build(context, &places, &lists),
            active: options.algorithms.active_scorers(intent.has_text()),
            context: context.clone(),
            intent: intent.clone(),
            max_results: options.max_results.unwrap_or(self.config.ranking.max_results),
            budget,
        });

        let (ranked_places, ranked_lists, ranked_users, ranked_posts) = futures::join!(
            self.rank_blocking(places, &inputs),
            self.rank_blocking(lists, &inputs),
            self.rank_blocking(users, &inputs),
            self.rank_blocking(posts, &inputs),
        );

        let result = IntelligentSearchResult {
            places: report.settle(ranked_places),
            lists: report.settle(ranked_lists),
            users: report.settle(ranked_users),
            posts: report.settle(ranked_posts),
            discovery,
            query: QuerySummary::from(intent),
            analytics: SearchAnalytics::default(),
        };

        self.finish(result, report, started)
    }

    /// Query-less recommendations for `context` from every discovery scorer
    pub async fn get_personalized_recommendations(
        &self,
        context: &SearchContext,
        count: usize,
    ) -> Vec<DiscoveryRecommendation> {
        let filters = SearchFilters::default();
        let limit = self.config.search.default_timeout;

        let (places, lists) = futures::join!(
            fetch_pool(ItemKind::Place, self.repository.places(&filters), limit),
            fetch_pool(ItemKind::List, self.repository.lists(&filters), limit),
        );

        let mut report = CallReport::default();
        let places = report.take_fetched(places);
        let lists = report.take_fetched(lists);

        let outcome = self.recommender.recommend(context, &places, &lists, count);
        for fault in outcome.faults {
            report.warn(fault);
        }
        for warning in &report.warnings {
            self.telemetry.record_warning(warning);
        }
        debug!(
            "Recommended {} items from {} places and {} lists",
            outcome.recommendations.len(),
            places.len(),
            lists.len()
        );
        outcome.recommendations
    }

    fn is_short_query(&self, query: &str) -> bool {
        query.trim().chars().count() < self.config.discovery.short_query_len
    }

    /// Fetch the four pools concurrently, each bounded by the remaining budget
    async fn fetch_pools(
        &self,
        filters: &SearchFilters,
        budget: &RankBudget,
        report: &mut CallReport,
    ) -> (Vec<Place>, Vec<PlaceList>, Vec<User>, Vec<Post>) {
        let limit = budget.remaining();
        let repository = &self.repository;

        let (places, lists, users, posts) = futures::join!(
            fetch_pool(ItemKind::Place, repository.places(filters), limit),
            fetch_pool(ItemKind::List, repository.lists(filters), limit),
            fetch_pool(ItemKind::User, repository.users(filters), limit),
            fetch_pool(ItemKind::Post, repository.posts(filters), limit),
        );

        (
            report.take_fetched(places),
            report.take_fetched(lists),
            report.take_fetched(users),
            report.take_fetched(posts),
        )
    }

    /// Rank one pool on the blocking thread pool
    async fn rank_blocking<T: Rankable>(
        &self,
        pool: Vec<T>,
        inputs: &Arc<RankInputs>,
    ) -> (ItemKind, std::result::Result<RankedPool<T>, JoinError>) {
        let ranker = Arc::clone(&self.ranker);
        let inputs = Arc::clone(inputs);
        let ranked = tokio::task::spawn_blocking(move || ranker.rank(pool, &inputs)).await;
        (T::KIND, ranked)
    }

    /// Fill in analytics and hand everything to telemetry
    fn finish(
        &self,
        mut result: IntelligentSearchResult,
        report: CallReport,
        started: Instant,
    ) -> IntelligentSearchResult {
        result.analytics = SearchAnalytics {
            algorithms_used: report.algorithms.into_iter().collect(),
            candidate_counts: report.counts,
            latency_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            timed_out: report.timed_out,
            warnings: report.warnings.iter().map(|w| w.to_string()).collect(),
        };

        for warning in &report.warnings {
            self.telemetry.record_warning(warning);
        }
        self.telemetry
            .record_analytics(&result.query, &result.analytics);

        debug!(
            "Search returned {} results in {}ms",
            result.total_results(),
            result.analytics.latency_ms
        );
        result
    }
}

/// Outcome of fetching one pool
struct Fetched<T> {
    kind: ItemKind,
    items: Vec<T>,
    warning: Option<EngineWarning>,
}

/// Fetch one pool, degrading to empty on error or when `limit` runs out
async fn fetch_pool<T, F>(kind: ItemKind, fetch: F, limit: Option<Duration>) -> Fetched<T>
where
    F: Future<Output = std::result::Result<Vec<T>, StorageError>>,
{
    let outcome = match limit {
        Some(limit) => match tokio::time::timeout(limit, fetch).await {
            Ok(outcome) => outcome,
            Err(_) => {
                return Fetched {
                    kind,
                    items: Vec::new(),
                    warning: Some(EngineWarning::budget(
                        BudgetStop::Timeout,
                        format!("fetching {}", kind.pool_name()),
                    )),
                };
            }
        },
        None => fetch.await,
    };

    match outcome {
        Ok(items) => Fetched {
            kind,
            items,
            warning: None,
        },
        Err(e) => Fetched {
            kind,
            items: Vec::new(),
            warning: Some(EngineWarning::PartialData {
                pool: kind,
                reason: e.to_string(),
            }),
        },
    }
}

/// Everything a call accumulates besides the ranked items
#[derive(Debug, Default)]
struct CallReport {
    warnings: Vec<EngineWarning>,
    algorithms: BTreeSet<ScorerKind>,
    counts: BTreeMap<String, usize>,
    timed_out: bool,
}

impl CallReport {
    fn warn(&mut self, warning: EngineWarning) {
        if matches!(warning, EngineWarning::Timeout { .. }) {
            self.timed_out = true;
        }
        debug!("Degraded: {}", warning);
        self.warnings.push(warning);
    }

    fn take_fetched<T>(&mut self, fetched: Fetched<T>) -> Vec<T> {
        if let Some(warning) = fetched.warning {
            self.warn(warning);
        }
        debug!(
            "Fetched {} {}",
            fetched.items.len(),
            fetched.kind.pool_name()
        );
        fetched.items
    }

    fn settle<T>(
        &mut self,
        (kind, ranked): (ItemKind, std::result::Result<RankedPool<T>, JoinError>),
    ) -> Vec<ScoredItem<T>> {
        let pool_name = kind.pool_name();
        let ranked = match ranked {
            Ok(ranked) => ranked,
            Err(e) => {
                self.counts.insert(pool_name.to_string(), 0);
                self.warn(EngineWarning::PartialData {
                    pool: kind,
                    reason: format!("ranking task failed: {}", e),
                });
                return Vec::new();
            }
        };

        self.counts
            .insert(pool_name.to_string(), ranked.candidate_count);
        self.algorithms.extend(ranked.contributing_scorers());
        if let Some(stop) = ranked.stopped {
            debug!(
                "Ranking {} stopped after {} of {} candidates",
                pool_name, ranked.evaluated, ranked.candidate_count
            );
            self.warn(EngineWarning::budget(stop, format!("ranking {}", pool_name)));
        }
        for fault in ranked.faults {
            self.warn(EngineWarning::ScorerFault {
                scorer: fault.scorer,
                pool: kind,
                item_id: fault.item_id,
                detail: fault.fault.to_string(),
            });
        }
        ranked.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryRepository;
    use crate::search::IntentLabel;
    use crate::telemetry::MockTelemetrySink;

    fn repository() -> Arc<dyn CandidateRepository> {
        Arc::new(InMemoryRepository::with_data(
            vec![
                Place::builder("Blue Bottle").id("p1").tags(["coffee"]).saved_count(5).build(),
                Place::builder("Zuni Cafe").id("p2").tags(["oysters"]).saved_count(50).build(),
            ],
            Vec::new(),
            vec![User::new("u1", "Alex Park", "alexp")],
            Vec::new(),
        ))
    }

    #[tokio::test]
    async fn test_missing_user_warning_reaches_sink() {
        let mut sink = MockTelemetrySink::new();
        sink.expect_record_warning()
            .withf(|w| *w == EngineWarning::MissingCurrentUser)
            .times(1)
            .return_const(());
        sink.expect_record_analytics().times(1).return_const(());

        let engine = SearchEngine::with_defaults(repository())
            .unwrap()
            .with_telemetry(Arc::new(sink));
        let result = engine
            .search_intelligently(
                "coffee",
                &SearchContext::default(),
                &SearchFilters::default(),
                SearchOptions::default(),
            )
            .await;

        assert_eq!(result.query.intent.intent_label, IntentLabel::General);
        assert_eq!(result.query.confidence, 0.0);
        assert_eq!(result.analytics.algorithms_used, vec![ScorerKind::Trending]);
        assert_eq!(result.analytics.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_candidate_counts_cover_every_pool() {
        let engine = SearchEngine::with_defaults(repository()).unwrap();
        let ctx = SearchContext::for_user(User::new("u1", "Alex Park", "alexp"));
        let result = engine
            .search_intelligently("", &ctx, &SearchFilters::default(), SearchOptions::default())
            .await;

        let counts = &result.analytics.candidate_counts;
        assert_eq!(counts.get("places"), Some(&2));
        assert_eq!(counts.get("lists"), Some(&0));
        // the caller is never a candidate
        assert_eq!(counts.get("users"), Some(&0));
        assert_eq!(counts.get("posts"), Some(&0));
        assert_eq!(result.analytics.algorithms_used, vec![ScorerKind::Trending]);
    }

    #[test]
    fn test_short_query_threshold() {
        let engine = SearchEngine::with_defaults(repository()).unwrap();
        assert!(engine.is_short_query(""));
        assert!(engine.is_short_query("  ab "));
        assert!(!engine.is_short_query("abc"));
    }
}
