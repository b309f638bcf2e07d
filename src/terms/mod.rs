/*!
 * Term extraction over glossary source terms.
 *
 * This module contains the multi-pattern matching side of the engine:
 *
 * - `index`: failure-link automaton reporting every raw occurrence
 * - `matcher`: query-time overlap resolution and result capping
 * - `highlight`: bracket markup rendering for terminal verification
 */

// Re-export main types for easier usage
pub use self::index::{TermHit, TermIndex, TermIndexBuilder};
pub use self::matcher::TermMatcher;

// Submodules
pub mod highlight;
pub mod index;
pub mod matcher;
