//! Tokenization shared by query interpretation and lexical scoring

use std::collections::BTreeSet;

/// Words that carry no search signal
pub const STOPWORDS: &[&str] = &[
    "a", "an", "and", "any", "are", "at", "be", "by", "for", "from", "get", "go", "good", "i",
    "in", "is", "it", "its", "me", "my", "of", "on", "or", "our", "some", "that", "the", "their",
    "to", "was", "what", "where", "which", "who", "with", "you", "your",
];

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.binary_search(&token).is_ok()
}

/// Lowercase `text` and replace everything but letters and digits with spaces
///
/// Apostrophes are dropped together with the possessive suffix so that
/// "Sara's" and "sara" normalize the same way.
pub fn normalize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch.is_alphanumeric() {
            normalized.extend(ch.to_lowercase());
        } else if (ch == '\'' || ch == '\u{2019}')
            && matches!(chars.peek(), Some('s') | Some('S'))
        {
            chars.next();
            let at_boundary = chars.peek().is_none_or(|c| !c.is_alphanumeric());
            if !at_boundary {
                normalized.push(' ');
                normalized.push('s');
            }
        } else {
            normalized.push(' ');
        }
    }

    normalized
}

/// Tokens of `text` in order, without stopwords, duplicates or 1-char noise
pub fn tokenize(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut seen = BTreeSet::new();

    for token in normalize(text).split_whitespace() {
        if token.chars().count() < 2 && !token.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if is_stopword(token) {
            continue;
        }
        if seen.insert(token.to_string()) {
            out.push(token.to_string());
        }
    }

    out
}

/// Token set of a field, for overlap checks
pub fn token_set(text: &str) -> BTreeSet<String> {
    tokenize(text).into_iter().collect()
}

/// Whether `phrase` occurs in `text` on token boundaries
///
/// Both sides are normalized, so "blue bottle" matches "Blue Bottle Coffee"
/// but "tar" does not match "Tartine".
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    let phrase = normalize(phrase).split_whitespace().collect::<Vec<_>>().join(" ");
    if phrase.is_empty() {
        return false;
    }
    let text = normalize(text).split_whitespace().collect::<Vec<_>>().join(" ");
    format!(" {} ", text).contains(&format!(" {} ", phrase))
}
