/*!
 * # localcat - Local CAT Matching Engine
 *
 * A Rust library for local, privacy-preserving computer-aided-translation
 * support: terminology recognition and translation-memory retrieval over
 * project-local corpora.
 *
 * ## Features
 *
 * - Multi-pattern term extraction over glossary source terms with
 *   longest-match overlap resolution
 * - Exact translation-memory lookup over normalized source keys
 * - Fuzzy translation-memory lookup with candidate pre-filtering and a
 *   caller-supplied budget
 * - Append-only TM history with most-recent-first retrieval
 * - Pull-based, bounded-memory corpus ingestion (CSV glossaries, JSONL
 *   translation memories)
 * - PO file parsing into immutable source units
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `ingest`: Pull-based glossary/TM readers and load reporting
 * - `terms`: Term index, matching policy, and highlighting:
 *   - `terms::index`: failure-link multi-pattern automaton
 *   - `terms::matcher`: overlap resolution and result capping
 *   - `terms::highlight`: bracket markup for terminal output
 * - `tm`: Translation-memory store and scoring:
 *   - `tm::normalize`: key canonicalization
 *   - `tm::store`: append-only store and log collaborators
 *   - `tm::fuzzy`: similarity scoring and candidate reduction
 * - `engine`: The engine facade combining both sides
 * - `po_processor`: Source units and PO parsing
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the engine
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod engine;
pub mod errors;
pub mod file_utils;
pub mod ingest;
pub mod po_processor;
pub mod terms;
pub mod tm;

// Re-export main types for easier usage
pub use app_config::{Config, NormalizationMode};
pub use engine::{Engine, MatchEngine, Suggestions};
pub use errors::{EngineError, IndexError, IngestError, TmError};
pub use ingest::{GlossaryEntry, LoadReport, TmEntry};
pub use po_processor::SourceUnit;
pub use terms::{TermHit, TermIndex, TermMatcher};
pub use tm::{FuzzyBudget, MatchKind, TmMatch, TmStore};
