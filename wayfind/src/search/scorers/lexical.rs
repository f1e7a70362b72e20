//! Field-weighted text matching

use std::collections::BTreeSet;

use super::{MAX_SCORE, ScoreOutcome, Scorer, ScorerKind, ScoringContext};
use crate::models::Candidate;
use crate::search::category::MatchCategory;
use crate::search::scoring::LexicalSettings;
use crate::search::text::{contains_phrase, token_set};

/// Scores token overlap between the query and an item's name, tags,
/// description and address
///
/// A query phrase found intact in the name (or a user's handle) scores 100
/// and reports [`MatchCategory::ExactMatch`].
#[derive(Debug, Clone, Default)]
pub struct LexicalScorer {
    settings: LexicalSettings,
}

impl LexicalScorer {
    pub fn new(settings: LexicalSettings) -> Self {
        Self { settings }
    }
}

/// Does `token` match a field token, allowing a trailing plural `s` on either side
fn token_matches(token: &str, field: &BTreeSet<String>) -> bool {
    if field.contains(token) {
        return true;
    }
    if let Some(singular) = token.strip_suffix('s') {
        if singular.len() > 1 && field.contains(singular) {
            return true;
        }
    }
    field.contains(&format!("{}s", token))
}

impl Scorer for LexicalScorer {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Lexical
    }

    fn score(&self, candidate: &Candidate<'_>, ctx: &ScoringContext<'_>) -> ScoreOutcome {
        let tokens = &ctx.intent.normalized_tokens;
        if tokens.is_empty() {
            return ScoreOutcome::zero(MatchCategory::SemanticMatch);
        }

        let phrase = ctx.intent.phrase();
        let exact = contains_phrase(candidate.name(), &phrase)
            || candidate
                .alt_name()
                .is_some_and(|alt| contains_phrase(alt, &phrase));
        if exact {
            return ScoreOutcome::new(
                MAX_SCORE,
                vec!["Exact name match".to_string()],
                MatchCategory::ExactMatch,
            );
        }

        let mut name = token_set(candidate.name());
        if let Some(alt) = candidate.alt_name() {
            name.extend(token_set(alt));
        }
        let tags: BTreeSet<String> = candidate
            .tag_set()
            .iter()
            .flat_map(|t| token_set(t))
            .collect();
        let description = token_set(candidate.description());
        let address = candidate.address().map(token_set).unwrap_or_default();

        let s = &self.settings;
        let fields = [
            ("name", s.name_weight, &name),
            ("tags", s.tags_weight, &tags),
            ("description", s.description_weight, &description),
            ("address", s.address_weight, &address),
        ];

        let mut overlap = 0.0;
        let mut matched_fields = Vec::new();
        for (label, weight, field) in fields {
            let hits = tokens.iter().filter(|t| token_matches(t, field)).count();
            if hits > 0 {
                overlap += weight * hits as f64 / tokens.len() as f64;
                matched_fields.push(label);
            }
        }

        if matched_fields.is_empty() {
            return ScoreOutcome::zero(MatchCategory::SemanticMatch);
        }

        ScoreOutcome::new(
            MAX_SCORE * overlap,
            vec![format!("Matches {}", matched_fields.join(", "))],
            MatchCategory::SemanticMatch,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Place, SearchContext, User};
    use crate::search::intent::QueryIntent;
    use crate::search::scorers::{PoolStats, SocialSignals};
    use crate::search::text::tokenize;

    fn score_with(query: &str, candidate: Candidate<'_>) -> ScoreOutcome {
        let search = SearchContext::default();
        let intent = QueryIntent {
            raw_text: query.to_string(),
            normalized_tokens: tokenize(query),
            ..Default::default()
        };
        let signals = SocialSignals::default();
        let ctx = ScoringContext {
            search: &search,
            intent: &intent,
            signals: &signals,
            pool: PoolStats::default(),
        };
        LexicalScorer::default().score(&candidate, &ctx).sanitised(ScorerKind::Lexical)
    }

    #[test]
    fn test_tag_overlap_is_semantic() {
        let place = Place::builder("Blue Bottle Coffee").tags(["coffee", "cozy"]).build();
        let outcome = score_with("cozy", Candidate::Place(&place));
        assert!((outcome.value - 30.0).abs() < 1e-9);
        assert_eq!(outcome.category, MatchCategory::SemanticMatch);
        assert_eq!(outcome.reasons, vec!["Matches tags"]);
    }

    #[test]
    fn test_exact_name_phrase() {
        let place = Place::builder("Blue Bottle Coffee").build();
        let outcome = score_with("blue bottle", Candidate::Place(&place));
        assert_eq!(outcome.value, 100.0);
        assert_eq!(outcome.category, MatchCategory::ExactMatch);
        assert_eq!(outcome.reasons, vec!["Exact name match"]);
    }

    #[test]
    fn test_username_exact() {
        let user = User::new("u1", "Sara Chen", "sarac");
        let outcome = score_with("sarac", Candidate::User(&user));
        assert_eq!(outcome.category, MatchCategory::ExactMatch);
    }

    #[test]
    fn test_multiple_fields() {
        let place = Place::builder("Mission Tacos")
            .description("Late night tacos")
            .address("Mission St, San Francisco")
            .build();
        let outcome = score_with("tacos", Candidate::Place(&place));
        assert_eq!(outcome.category, MatchCategory::ExactMatch);

        let outcome = score_with("late mission", Candidate::Place(&place));
        // name 0.4 * 1/2 + description 0.2 * 1/2 + address 0.1 * 1/2
        assert!((outcome.value - 35.0).abs() < 1e-9, "{}", outcome.value);
        assert_eq!(outcome.reasons, vec!["Matches name, description, address"]);
    }

    #[test]
    fn test_plural_folding() {
        let place = Place::builder("La Taqueria").tags(["taco"]).build();
        let outcome = score_with("tacos", Candidate::Place(&place));
        assert!((outcome.value - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_tokens_or_no_match() {
        let place = Place::builder("Tartine").tags(["bakery"]).build();
        assert_eq!(score_with("", Candidate::Place(&place)).value, 0.0);
        let miss = score_with("ramen", Candidate::Place(&place));
        assert_eq!(miss.value, 0.0);
        assert!(miss.reasons.is_empty());
    }
}
