/*!
 * Bounded-memory corpus ingestion.
 *
 * Glossaries and translation memories can reach gigabyte scale, so neither
 * is ever materialized wholesale: both readers are pull-based iterators
 * over buffered file handles, yielding one entry at a time. Malformed
 * records are surfaced as recoverable errors so callers can skip and count
 * them instead of aborting a load.
 *
 * - `glossary`: CSV glossary reader producing `GlossaryEntry`
 * - `tm`: JSONL translation-memory reader producing `TmEntry`
 */

pub use self::glossary::{GlossaryEntry, GlossaryReader};
pub use self::tm::{TmEntry, TmReader};

pub mod glossary;
pub mod tm;

/// Summary of a project-context load: what was ingested and what was skipped.
///
/// A partially failed corpus still yields a usable engine; the skipped
/// counts are the diagnostic surface for that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of glossary files ingested
    pub glossary_files: usize,
    /// Number of glossary terms indexed
    pub terms_loaded: usize,
    /// Number of TM files ingested
    pub tm_files: usize,
    /// Number of TM entries loaded
    pub tm_entries_loaded: usize,
    /// Number of malformed records skipped across all sources
    pub skipped: usize,
}

impl LoadReport {
    /// Merge another report into this one
    pub fn absorb(&mut self, other: &LoadReport) {
        self.glossary_files += other.glossary_files;
        self.terms_loaded += other.terms_loaded;
        self.tm_files += other.tm_files;
        self.tm_entries_loaded += other.tm_entries_loaded;
        self.skipped += other.skipped;
    }
}
