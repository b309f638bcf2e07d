/*!
 * Fuzzy-match scoring and candidate reduction.
 *
 * Two-stage lookup: a cheap pre-filter narrows the TM to candidates that
 * share tokens with the query (and whose lengths could still reach the
 * threshold), then each survivor is fully scored with a blend of
 * normalized Levenshtein similarity and a Dice coefficient over word
 * tokens. The store composes these pieces in `TmStore::lookup_fuzzy`;
 * this module holds the math so it stays independently testable.
 */

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// Caller-supplied budget for one fuzzy query.
///
/// Exceeding the budget returns the best results found so far rather
/// than failing.
#[derive(Debug, Clone)]
pub struct FuzzyBudget {
    /// Maximum candidates fully scored
    pub max_candidates: usize,

    /// Optional wall-clock cutoff
    pub deadline: Option<Instant>,
}

impl Default for FuzzyBudget {
    fn default() -> Self {
        Self {
            max_candidates: 2_000,
            deadline: None,
        }
    }
}

impl FuzzyBudget {
    /// Budget bounded by candidate count only
    pub fn with_max_candidates(max_candidates: usize) -> Self {
        Self {
            max_candidates,
            deadline: None,
        }
    }

    /// Add a wall-clock limit measured from now
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.deadline = Some(Instant::now() + limit);
        self
    }

    /// True once the wall-clock cutoff has passed
    pub fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Gather candidate entry ids sharing at least one token with the query.
///
/// Ranked by shared-token count descending, then most-recent first, and
/// truncated to `max`. Independent of the similarity threshold, so
/// lowering the threshold can only widen the surviving result set.
pub fn gather_candidates(
    postings: &HashMap<String, Vec<usize>>,
    query_tokens: &[String],
    max: usize,
) -> Vec<usize> {
    let mut shared: HashMap<usize, usize> = HashMap::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for token in query_tokens {
        // A repeated query token must not double-count its postings
        if !seen.insert(token.as_str()) {
            continue;
        }
        if let Some(ids) = postings.get(token.as_str()) {
            for &id in ids {
                *shared.entry(id).or_insert(0) += 1;
            }
        }
    }

    let mut ranked: Vec<(usize, usize)> = shared.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
    ranked.truncate(max);
    ranked.into_iter().map(|(id, _)| id).collect()
}

/// Length pre-filter: can a candidate of `candidate_chars` still reach
/// `threshold` against a query of `query_chars`?
///
/// The Levenshtein half of the blend is at most `1 - diff/max_len` and
/// the Dice half is at most 1, so the blend is bounded by
/// `(2 - diff/max_len) / 2`; anything below the threshold at that bound
/// is skipped without scoring.
pub fn length_compatible(query_chars: usize, candidate_chars: usize, threshold: f32) -> bool {
    let max_len = query_chars.max(candidate_chars);
    if max_len == 0 {
        return true;
    }

    let diff = query_chars.abs_diff(candidate_chars) as f32;
    let upper_bound = (2.0 - diff / max_len as f32) / 2.0;
    upper_bound >= threshold
}

/// Dice coefficient over word-token sets, in [0.0, 1.0]
pub fn dice_coefficient(a_tokens: &[String], b_tokens: &[String]) -> f64 {
    if a_tokens.is_empty() && b_tokens.is_empty() {
        return 1.0;
    }
    if a_tokens.is_empty() || b_tokens.is_empty() {
        return 0.0;
    }

    let a_set: HashSet<&str> = a_tokens.iter().map(String::as_str).collect();
    let b_set: HashSet<&str> = b_tokens.iter().map(String::as_str).collect();
    let shared = a_set.intersection(&b_set).count();

    (2.0 * shared as f64) / (a_set.len() + b_set.len()) as f64
}

/// Blended similarity over normalized texts: the mean of normalized
/// Levenshtein similarity and the token Dice coefficient.
pub fn similarity(a: &str, a_tokens: &[String], b: &str, b_tokens: &[String]) -> f32 {
    let lev = strsim::normalized_levenshtein(a, b);
    let dice = dice_coefficient(a_tokens, b_tokens);

    (((lev + dice) / 2.0) as f32).clamp(0.0, 1.0)
}
