/*!
 * Translation-memory lookup: exact and approximate retrieval over an
 * append-only history of translation records.
 *
 * - `normalize`: canonicalization shared by indexing and querying
 * - `store`: the append-only store, its log collaborators, exact lookup
 * - `fuzzy`: similarity scoring and candidate reduction
 */

// Re-export main types for easier usage
pub use self::fuzzy::FuzzyBudget;
pub use self::normalize::{normalize, NormalizedKey};
pub use self::store::{JsonlLog, MatchKind, MemoryLog, TmLog, TmMatch, TmStore};

// Submodules
pub mod fuzzy;
pub mod normalize;
pub mod store;
