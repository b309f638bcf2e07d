/*!
 * Source-text canonicalization for TM keys.
 *
 * The same normalization must be applied when indexing and when querying,
 * or exact matching silently degrades — so both paths go through
 * `normalize` with the store's configured mode. The function is pure and
 * total, and idempotent under every mode.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::app_config::NormalizationMode;

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{P}+").unwrap());

/// A canonicalized TM key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// The canonical text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the canonical text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonicalize `text` under the given mode.
///
/// All modes collapse whitespace runs to single spaces and trim the ends;
/// the stronger modes additionally fold case and strip punctuation.
pub fn normalize(text: &str, mode: NormalizationMode) -> NormalizedKey {
    let collapsed = collapse_whitespace(text);

    let key = match mode {
        NormalizationMode::Whitespace => collapsed,
        NormalizationMode::WhitespaceCase => collapsed.to_lowercase(),
        NormalizationMode::WhitespaceCasePunctuation => {
            let folded = collapsed.to_lowercase();
            let stripped = PUNCTUATION.replace_all(&folded, "");
            // Stripping can leave adjacent spaces behind
            collapse_whitespace(&stripped)
        }
    };

    NormalizedKey(key)
}

/// Split the canonical text into word tokens
pub fn tokenize(key: &str) -> Vec<String> {
    key.split_whitespace().map(str::to_string).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
