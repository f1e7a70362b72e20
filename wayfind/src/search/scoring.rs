//! Ranking weights and per-scorer tuning
//!
//! This module holds the static, configurable numbers that drive ranking:
//! base weights for each scorer, the intent-dependent reweighting applied
//! on top of them, the score floor, and the constants each scorer uses.

use serde::{Deserialize, Serialize};

use super::intent::IntentLabel;
use super::scorers::ScorerKind;

/// Base weight of every scorer in the weighted mean
///
/// Weights are relative; only their ratios matter. Default: all equal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScorerWeights {
    pub lexical: f64,
    pub social: f64,
    pub collaborative: f64,
    pub preference: f64,
    pub location: f64,
    pub trending: f64,
}

impl Default for ScorerWeights {
    fn default() -> Self {
        Self {
            lexical: 1.0,
            social: 1.0,
            collaborative: 1.0,
            preference: 1.0,
            location: 1.0,
            trending: 1.0,
        }
    }
}

impl ScorerWeights {
    /// Base weight for a scorer
    pub fn get(&self, kind: ScorerKind) -> f64 {
        match kind {
            ScorerKind::Lexical => self.lexical,
            ScorerKind::Social => self.social,
            ScorerKind::Collaborative => self.collaborative,
            ScorerKind::Preference => self.preference,
            ScorerKind::Location => self.location,
            ScorerKind::Trending => self.trending,
        }
    }

    fn all(&self) -> [(ScorerKind, f64); 6] {
        ScorerKind::ALL.map(|kind| (kind, self.get(kind)))
    }
}

/// Multipliers applied to the base weights depending on the query intent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IntentWeighting {
    /// Lexical multiplier whenever the query carries text (general and tag lookups)
    pub text_lexical_boost: f64,

    /// Trending multiplier for general text queries
    pub text_trending_damping: f64,

    /// Trending multiplier for tag lookups
    pub tag_trending_damping: f64,

    /// Lexical multiplier for person and location lookups
    pub secondary_lexical_boost: f64,

    /// Minimum ratio of the social weight over every other active weight
    /// for person lookups
    pub social_dominance: f64,

    /// Location multiplier for location lookups
    pub location_boost: f64,
}

impl Default for IntentWeighting {
    fn default() -> Self {
        Self {
            text_lexical_boost: 3.0,
            text_trending_damping: 0.5,
            tag_trending_damping: 0.25,
            secondary_lexical_boost: 1.5,
            social_dominance: 2.0,
            location_boost: 3.0,
        }
    }
}

/// Configuration for combining scorer outputs into a final score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RankingConfig {
    /// Candidates scoring below this are dropped. Default: 5
    pub score_floor: f64,

    /// Default per-pool result cap. Default: 20
    pub max_results: usize,

    /// Base scorer weights
    pub weights: ScorerWeights,

    /// Intent reweighting
    pub intent: IntentWeighting,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            score_floor: 5.0,
            max_results: 20,
            weights: ScorerWeights::default(),
            intent: IntentWeighting::default(),
        }
    }
}

impl RankingConfig {
    /// Create a new ranking configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Favor content from the user's social graph
    pub fn social_focused() -> Self {
        Self {
            weights: ScorerWeights {
                social: 2.0,
                collaborative: 1.5,
                trending: 0.5,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Favor places close to the user
    pub fn nearby_focused() -> Self {
        Self {
            weights: ScorerWeights {
                location: 2.5,
                trending: 0.75,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Effective weight of `kind` for a query with the given intent
    ///
    /// `active` lists the scorers that will be evaluated; it is needed to
    /// enforce the social dominance rule of person lookups.
    pub fn effective_weight(
        &self,
        kind: ScorerKind,
        label: IntentLabel,
        has_text: bool,
        active: &[ScorerKind],
    ) -> f64 {
        let table = self.intent_weights(label, has_text);
        if label == IntentLabel::PersonLookup && kind == ScorerKind::Social {
            let max_other = table
                .iter()
                .filter(|(k, _)| *k != ScorerKind::Social && active.contains(k))
                .map(|(_, w)| *w)
                .fold(0.0_f64, f64::max);
            let social = table
                .iter()
                .find(|(k, _)| *k == ScorerKind::Social)
                .map(|(_, w)| *w)
                .unwrap_or(0.0);
            return social.max(max_other * self.intent.social_dominance);
        }
        table
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    fn intent_weights(&self, label: IntentLabel, has_text: bool) -> [(ScorerKind, f64); 6] {
        let iw = &self.intent;
        self.weights.all().map(|(kind, base)| {
            let multiplier = match (label, kind) {
                _ if !has_text => 1.0,
                (IntentLabel::General, ScorerKind::Lexical) => iw.text_lexical_boost,
                (IntentLabel::General, ScorerKind::Trending) => iw.text_trending_damping,
                (IntentLabel::TagLookup, ScorerKind::Lexical) => iw.text_lexical_boost,
                (IntentLabel::TagLookup, ScorerKind::Trending) => iw.tag_trending_damping,
                (IntentLabel::PersonLookup, ScorerKind::Lexical) => iw.secondary_lexical_boost,
                (IntentLabel::PersonLookup, ScorerKind::Trending) => iw.text_trending_damping,
                (IntentLabel::LocationLookup, ScorerKind::Location) => iw.location_boost,
                (IntentLabel::LocationLookup, ScorerKind::Lexical) => iw.secondary_lexical_boost,
                (IntentLabel::LocationLookup, ScorerKind::Trending) => iw.text_trending_damping,
                _ => 1.0,
            };
            (kind, base * multiplier)
        })
    }

    /// Validate the configuration
    ///
    /// Returns an error if any parameters are invalid:
    /// - All weights and multipliers must be >= 0.0
    /// - score_floor must lie in [0, 100]
    /// - max_results must be > 0
    pub fn validate(&self) -> Result<(), String> {
        for (kind, weight) in self.weights.all() {
            if !(weight >= 0.0) {
                return Err(format!("{} weight must be >= 0.0", kind));
            }
        }
        if self.weights.all().iter().all(|(_, w)| *w == 0.0) {
            return Err("at least one scorer weight must be > 0.0".to_string());
        }
        let iw = &self.intent;
        let multipliers = [
            ("text_lexical_boost", iw.text_lexical_boost),
            ("text_trending_damping", iw.text_trending_damping),
            ("tag_trending_damping", iw.tag_trending_damping),
            ("secondary_lexical_boost", iw.secondary_lexical_boost),
            ("social_dominance", iw.social_dominance),
            ("location_boost", iw.location_boost),
        ];
        for (name, value) in multipliers {
            if !(value >= 0.0) {
                return Err(format!("{} must be >= 0.0", name));
            }
        }
        if !(0.0..=100.0).contains(&self.score_floor) {
            return Err("score_floor must be between 0 and 100".to_string());
        }
        if self.max_results == 0 {
            return Err("max_results must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Field weights for lexical matching; they should sum to 1.0
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LexicalSettings {
    pub name_weight: f64,
    pub tags_weight: f64,
    pub description_weight: f64,
    pub address_weight: f64,
}

impl Default for LexicalSettings {
    fn default() -> Self {
        Self {
            name_weight: 0.4,
            tags_weight: 0.3,
            description_weight: 0.2,
            address_weight: 0.1,
        }
    }
}

/// Scores assigned by relationship
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SocialSettings {
    /// Item belongs to the user named in the query
    pub mention_score: f64,
    /// Item belongs to a friend
    pub friend_score: f64,
    /// Item belongs to someone the user follows
    pub following_score: f64,
}

impl Default for SocialSettings {
    fn default() -> Self {
        Self {
            mention_score: 95.0,
            friend_score: 40.0,
            following_score: 20.0,
        }
    }
}

/// Distance decay for the location scorer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocationSettings {
    /// Distance at which the score falls to 1/e of its maximum. Default: 5km
    pub decay_km: f64,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self { decay_km: 5.0 }
    }
}

/// Popularity labelling for the trending scorer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrendingSettings {
    /// Values at or above this are labelled "Popular". Default: 60
    pub popular_threshold: f64,
}

impl Default for TrendingSettings {
    fn default() -> Self {
        Self {
            popular_threshold: 60.0,
        }
    }
}

/// Tuning for the individual scorers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ScorerSettings {
    pub lexical: LexicalSettings,
    pub social: SocialSettings,
    pub location: LocationSettings,
    pub trending: TrendingSettings,
}

impl ScorerSettings {
    /// Validate the scorer settings
    pub fn validate(&self) -> Result<(), String> {
        let lx = &self.lexical;
        let fields = [lx.name_weight, lx.tags_weight, lx.description_weight, lx.address_weight];
        if fields.iter().any(|w| !(*w >= 0.0)) {
            return Err("lexical field weights must be >= 0.0".to_string());
        }
        let total: f64 = fields.iter().sum();
        if total <= 0.0 || total > 1.0 + 1e-9 {
            return Err("lexical field weights must sum to a value in (0, 1]".to_string());
        }
        let social = &self.social;
        for (name, value) in [
            ("mention_score", social.mention_score),
            ("friend_score", social.friend_score),
            ("following_score", social.following_score),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(format!("{} must be between 0 and 100", name));
            }
        }
        if !(self.location.decay_km > 0.0) {
            return Err("decay_km must be > 0.0".to_string());
        }
        if !(0.0..=100.0).contains(&self.trending.popular_threshold) {
            return Err("popular_threshold must be between 0 and 100".to_string());
        }
        Ok(())
    }
}
