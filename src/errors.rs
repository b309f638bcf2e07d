/*!
 * Error types for the localcat engine.
 *
 * This module contains custom error types for different parts of the engine,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while ingesting glossary or TM corpora
#[derive(Error, Debug)]
pub enum IngestError {
    /// A single record failed shape validation; ingestion continues past it
    #[error("Malformed entry at record {line}: {reason}")]
    MalformedEntry {
        /// 1-based line or record number in the source
        line: usize,
        /// What was wrong with the record
        reason: String,
    },

    /// The backing source could not be read
    #[error("I/O error reading corpus: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV record could not be decoded at all
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors that can occur when building or querying the term index
#[derive(Error, Debug)]
pub enum IndexError {
    /// The glossary produced zero usable terms
    #[error("Glossary produced no usable terms")]
    EmptyIndex,
}

/// Errors that can occur on the TM write path
#[derive(Error, Debug)]
pub enum TmError {
    /// The durable log collaborator rejected an append
    #[error("TM log append failed: {0}")]
    Log(#[source] std::io::Error),

    /// A record could not be serialized for the log
    #[error("TM record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Main engine error type that wraps all other errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed or missing project context
    #[error("Configuration error: {0}")]
    Config(String),

    /// A corpus collaborator failed to read
    #[error("Failed to read source {path}: {source}")]
    SourceIo {
        /// Path of the corpus that failed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Error from corpus ingestion
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Error from the term index
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Error from the translation memory
    #[error("TM error: {0}")]
    Tm(#[from] TmError),
}

impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        Self::Ingest(IngestError::Io(error))
    }
}
