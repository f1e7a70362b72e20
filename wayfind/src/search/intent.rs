//! Query interpretation
//!
//! Turns raw query text into a [`QueryIntent`]: normalized tokens, an optional
//! reference to a known user ("sara's coffee spots"), tags from the candidate
//! vocabulary, an intent label and a confidence in `[0, 1]`.
//!
//! Interpretation never fails. Empty or unparseable input yields a general
//! intent with zero confidence.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::text::{self, contains_phrase, normalize, tokenize};
use crate::models::{SearchContext, User, UserRef};

/// Words that turn a query into a proximity lookup
const PROXIMITY_WORDS: &[&str] = &["around", "close", "closest", "near", "nearby", "nearest"];

/// Confidence for an exact display-name match
const EXACT_NAME_CONFIDENCE: f64 = 0.95;
/// Confidence for an exact username match
const USERNAME_CONFIDENCE: f64 = 0.9;
/// Floor of the partial-match band
const PARTIAL_BASE: f64 = 0.4;
/// Width of the partial band for possessive mentions ("sara's")
const POSSESSIVE_SPAN: f64 = 0.3;
/// Width of the partial band for bare mentions ("with sara")
const BARE_SPAN: f64 = 0.2;
/// Confidence of a location lookup
const LOCATION_CONFIDENCE: f64 = 0.6;
/// Confidence contributed by each token of a general query
const GENERAL_PER_TOKEN: f64 = 0.15;
/// Cap for general queries
const GENERAL_CAP: f64 = 0.5;

lazy_static! {
    static ref POSSESSIVE_REGEX: Regex =
        Regex::new(r"([\p{L}\p{N}_.\-]+)['’][sS]\b").unwrap();
    static ref HANDLE_REGEX: Regex = Regex::new(r"@([\p{L}\p{N}_.]+)").unwrap();
}

/// What the user appears to be looking for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    #[default]
    General,
    PersonLookup,
    TagLookup,
    LocationLookup,
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::General => write!(f, "general"),
            Self::PersonLookup => write!(f, "person_lookup"),
            Self::TagLookup => write!(f, "tag_lookup"),
            Self::LocationLookup => write!(f, "location_lookup"),
        }
    }
}

/// Structured interpretation of one query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct QueryIntent {
    /// Query exactly as typed
    pub raw_text: String,
    /// Lowercased tokens without stopwords
    pub normalized_tokens: Vec<String>,
    /// Known user referenced by the query
    pub mentioned_user: Option<UserRef>,
    /// Vocabulary tags found in the query
    pub mentioned_tags: Vec<String>,
    /// Detected intent
    pub intent_label: IntentLabel,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

impl QueryIntent {
    /// Intent for an empty or unusable query
    pub fn empty(raw_text: &str) -> Self {
        Self {
            raw_text: raw_text.to_string(),
            ..Default::default()
        }
    }

    /// Whether the query carries any searchable token
    pub fn has_text(&self) -> bool {
        !self.normalized_tokens.is_empty()
    }

    /// Tokens joined back into a phrase
    pub fn phrase(&self) -> String {
        self.normalized_tokens.join(" ")
    }
}

/// Interprets raw query text against a search context and tag vocabulary
#[derive(Debug, Clone, Copy)]
pub struct QueryInterpreter<'a> {
    context: &'a SearchContext,
    vocabulary: &'a BTreeSet<String>,
    enable_nlp: bool,
}

impl<'a> QueryInterpreter<'a> {
    /// Create an interpreter; `vocabulary` holds the normalized tags seen in the candidate pools
    pub fn new(context: &'a SearchContext, vocabulary: &'a BTreeSet<String>) -> Self {
        Self {
            context,
            vocabulary,
            enable_nlp: true,
        }
    }

    /// Toggle entity and intent detection; tokenization always runs
    pub fn with_nlp(mut self, enable_nlp: bool) -> Self {
        self.enable_nlp = enable_nlp;
        self
    }

    /// Interpret `raw_text`
    pub fn interpret(&self, raw_text: &str) -> QueryIntent {
        let tokens = tokenize(raw_text);
        if tokens.is_empty() {
            return QueryIntent::empty(raw_text);
        }

        let mut intent = QueryIntent {
            raw_text: raw_text.to_string(),
            confidence: general_confidence(tokens.len()),
            normalized_tokens: tokens,
            ..Default::default()
        };

        if !self.enable_nlp {
            return intent;
        }

        intent.mentioned_tags = self.detect_tags(&intent.normalized_tokens, raw_text);

        if let Some((user, confidence)) = self.detect_user(raw_text, &intent.normalized_tokens) {
            intent.mentioned_user = Some(user.to_ref());
            intent.intent_label = IntentLabel::PersonLookup;
            intent.confidence = confidence;
        } else if !intent.mentioned_tags.is_empty() {
            intent.intent_label = IntentLabel::TagLookup;
            intent.confidence = (0.6 + 0.1 * (intent.mentioned_tags.len() - 1) as f64).min(0.85);
        } else if intent
            .normalized_tokens
            .iter()
            .any(|t| PROXIMITY_WORDS.contains(&t.as_str()))
        {
            intent.intent_label = IntentLabel::LocationLookup;
            intent.confidence = LOCATION_CONFIDENCE;
        }

        intent
    }

    fn detect_tags(&self, tokens: &[String], raw_text: &str) -> Vec<String> {
        self.vocabulary
            .iter()
            .filter(|tag| {
                if tag.contains(char::is_whitespace) {
                    contains_phrase(raw_text, tag)
                } else {
                    tokens
                        .iter()
                        .any(|t| t == *tag || t.strip_suffix('s') == Some(tag.as_str()))
                }
            })
            .cloned()
            .collect()
    }

    fn detect_user(&self, raw_text: &str, tokens: &[String]) -> Option<(&'a User, f64)> {
        let possessives: BTreeSet<String> = POSSESSIVE_REGEX
            .captures_iter(raw_text)
            .filter_map(|c| c.get(1))
            .map(|m| normalize(m.as_str()).trim().to_string())
            .collect();
        let handles: BTreeSet<String> = HANDLE_REGEX
            .captures_iter(raw_text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_lowercase())
            .collect();

        let mut best: Option<(&'a User, f64)> = None;
        for (user, _) in self.context.known_users() {
            let Some(confidence) = self.match_user(user, raw_text, tokens, &possessives, &handles)
            else {
                continue;
            };
            // Strictly greater keeps the earlier user (friends before following) on ties
            if best.is_none_or(|(_, c)| confidence > c) {
                best = Some((user, confidence));
            }
        }
        best
    }

    fn match_user(
        &self,
        user: &User,
        raw_text: &str,
        tokens: &[String],
        possessives: &BTreeSet<String>,
        handles: &BTreeSet<String>,
    ) -> Option<f64> {
        let name_tokens: Vec<String> = normalize(&user.display_name)
            .split_whitespace()
            .map(str::to_string)
            .collect();

        if !name_tokens.is_empty() && contains_phrase(raw_text, &user.display_name) {
            return Some(EXACT_NAME_CONFIDENCE);
        }

        let username = user.username.trim_start_matches('@').to_lowercase();
        if !username.is_empty()
            && (handles.contains(&username) || tokens.iter().any(|t| *t == username))
        {
            return Some(USERNAME_CONFIDENCE);
        }

        let total_chars: usize = name_tokens.iter().map(|t| t.chars().count()).sum();
        if total_chars == 0 {
            return None;
        }

        let mut matched_chars = 0;
        let mut possessive = false;
        for name_token in &name_tokens {
            if name_token.chars().count() < 3 || text::is_stopword(name_token) {
                continue;
            }
            let is_possessive = possessives.contains(name_token);
            let is_bare = tokens.iter().any(|t| t == name_token);
            // A bare word that is also a tag is more likely a topic than a person
            if is_bare && !is_possessive && self.vocabulary.contains(name_token) {
                continue;
            }
            if is_possessive || is_bare {
                matched_chars += name_token.chars().count();
                possessive |= is_possessive;
            }
        }

        if matched_chars == 0 {
            return None;
        }

        let ratio = matched_chars as f64 / total_chars as f64;
        let span = if possessive { POSSESSIVE_SPAN } else { BARE_SPAN };
        Some(PARTIAL_BASE + span * ratio.min(1.0))
    }
}

fn general_confidence(token_count: usize) -> f64 {
    (GENERAL_PER_TOKEN * token_count as f64).min(GENERAL_CAP)
}
