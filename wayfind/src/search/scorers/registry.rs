//! Registry of the active scorer implementations

use std::sync::Arc;
use tracing::debug;

use super::{
    CollaborativeScorer, LexicalScorer, LocationScorer, PreferenceScorer, Scorer, ScorerKind,
    SocialScorer, TrendingScorer,
};
use crate::search::scoring::ScorerSettings;

/// One implementation per [`ScorerKind`]
///
/// The registry starts with the built-in scorers; registering a scorer of an
/// existing kind replaces it. Lookups are by kind and iteration follows the
/// canonical order.
#[derive(Debug, Clone)]
pub struct ScorerRegistry {
    scorers: Vec<Arc<dyn Scorer>>,
}

impl ScorerRegistry {
    /// An empty registry
    pub fn empty() -> Self {
        Self {
            scorers: Vec::new(),
        }
    }

    /// The six built-in scorers tuned by `settings`
    pub fn with_defaults(settings: &ScorerSettings) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(LexicalScorer::new(settings.lexical.clone())));
        registry.register(Arc::new(SocialScorer::new(settings.social.clone())));
        registry.register(Arc::new(CollaborativeScorer));
        registry.register(Arc::new(PreferenceScorer));
        registry.register(Arc::new(LocationScorer::new(settings.location.clone())));
        registry.register(Arc::new(TrendingScorer::new(settings.trending.clone())));
        registry
    }

    /// Add a scorer, replacing any scorer of the same kind
    pub fn register(&mut self, scorer: Arc<dyn Scorer>) {
        let kind = scorer.kind();
        self.scorers.retain(|s| s.kind() != kind);
        self.scorers.push(scorer);
        self.scorers.sort_by_key(|s| s.kind());
        debug!("Scorer registered: {}", kind);
    }

    /// Scorer for `kind`, if registered
    pub fn get(&self, kind: ScorerKind) -> Option<&Arc<dyn Scorer>> {
        self.scorers.iter().find(|s| s.kind() == kind)
    }

    /// Registered scorers in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Scorer>> {
        self.scorers.iter()
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }
}

impl Default for ScorerRegistry {
    fn default() -> Self {
        Self::with_defaults(&ScorerSettings::default())
    }
}
