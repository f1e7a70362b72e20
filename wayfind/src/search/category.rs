//! Match categories and their precedence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an item matched, as shown to the user
///
/// Declaration order is the tie-break precedence, highest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    ExactMatch,
    UserConnection,
    LocationBased,
    PreferenceMatch,
    Trending,
    #[default]
    SemanticMatch,
}

impl MatchCategory {
    /// All categories in precedence order
    pub const PRECEDENCE: [MatchCategory; 6] = [
        MatchCategory::ExactMatch,
        MatchCategory::UserConnection,
        MatchCategory::LocationBased,
        MatchCategory::PreferenceMatch,
        MatchCategory::Trending,
        MatchCategory::SemanticMatch,
    ];

    /// Rank in the precedence order; lower wins
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Whether `self` beats `other` on a tie
    pub fn outranks(self, other: MatchCategory) -> bool {
        self.rank() < other.rank()
    }

    /// Pick the category of the largest contribution
    ///
    /// Contributions are `(category, weighted value)`. Equal values are
    /// resolved by precedence. With no positive contribution the result is
    /// [`MatchCategory::SemanticMatch`].
    pub fn dominant<I>(contributions: I) -> MatchCategory
    where
        I: IntoIterator<Item = (MatchCategory, f64)>,
    {
        let mut best: Option<(MatchCategory, f64)> = None;
        for (category, value) in contributions {
            if !(value > 0.0) {
                continue;
            }
            best = match best {
                None => Some((category, value)),
                Some((c, v)) if value > v || (value == v && category.outranks(c)) => {
                    Some((category, value))
                }
                keep => keep,
            };
        }
        best.map(|(c, _)| c).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExactMatch => "exact_match",
            Self::UserConnection => "user_connection",
            Self::LocationBased => "location_based",
            Self::PreferenceMatch => "preference_match",
            Self::Trending => "trending",
            Self::SemanticMatch => "semantic_match",
        }
    }
}

impl fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
