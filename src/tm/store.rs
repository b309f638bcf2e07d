/*!
 * Translation-memory store.
 *
 * The durable form is an append-only log of immutable records; the store
 * derives read-side indexes from it (normalized source -> entry ids, and
 * token postings for the fuzzy pre-filter). A new translation of an
 * already-seen source is a new entry, never an in-place edit, and
 * retrieval considers the full history most-recent first.
 *
 * Writes go through a `TmLog` collaborator so durability stays the
 * storage layer's concern; the JSONL implementation matches the on-disk
 * format the `TmReader` ingests.
 */

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::Utc;
use log::{debug, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::app_config::NormalizationMode;
use crate::errors::{IngestError, TmError};
use crate::ingest::tm::{TmEntry, TmRecord};
use crate::po_processor::SourceUnit;
use crate::tm::fuzzy::{self, FuzzyBudget};
use crate::tm::normalize::{normalize, tokenize, NormalizedKey};

/// Kind of TM match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchKind {
    /// Normalized source equals the normalized query
    Exact,
    /// Similar-but-not-identical source, scored
    Fuzzy,
    /// Reserved for context-aware scoring; never produced by the
    /// baseline lookups
    Context,
}

/// A TM query result: a read-time projection of a stored entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TmMatch {
    /// Source text of the stored entry
    pub source: String,

    /// Target text of the stored entry
    pub target: String,

    /// Similarity score in [0.0, 1.0]
    pub similarity: f32,

    /// How this match was found
    pub match_type: MatchKind,

    /// Name of the owning translation memory
    pub tm_name: String,

    /// Usage counter of the stored entry
    pub usage_count: u32,

    /// ISO-8601 timestamp of last use
    pub last_used: String,
}

/// Durable append sink for TM records
pub trait TmLog: Send + Sync {
    /// Durably append one record; errors propagate to the caller
    fn append(&self, record: &TmRecord) -> Result<(), TmError>;

    /// Name of this log; becomes `tm_name` on appended entries
    fn name(&self) -> &str;
}

/// JSONL file log, one record per line, append-only
pub struct JsonlLog {
    name: String,
    file: Mutex<File>,
}

impl JsonlLog {
    /// Open (or create) a JSONL log at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            name,
            file: Mutex::new(file),
        })
    }
}

impl TmLog for JsonlLog {
    fn append(&self, record: &TmRecord) -> Result<(), TmError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = self.file.lock();
        file.write_all(line.as_bytes()).map_err(TmError::Log)?;
        file.flush().map_err(TmError::Log)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// In-memory log for tests and ephemeral sessions
pub struct MemoryLog {
    name: String,
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    /// Create an empty in-memory log
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the appended lines
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl TmLog for MemoryLog {
    fn append(&self, record: &TmRecord) -> Result<(), TmError> {
        let line = serde_json::to_string(record)?;
        self.lines.lock().push(line);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// One loaded entry plus its precomputed query-side forms
struct StoredEntry {
    entry: TmEntry,
    norm: String,
    tokens: Vec<String>,
    chars: usize,
}

#[derive(Default)]
struct TmShared {
    /// Log order; index doubles as the recency sequence
    entries: Vec<StoredEntry>,
    /// Normalized source -> entry ids in append order
    exact: HashMap<NormalizedKey, Vec<usize>>,
    /// Token -> entry ids, the fuzzy pre-filter
    postings: HashMap<String, Vec<usize>>,
}

/// Append-only TM store with exact and fuzzy lookup
pub struct TmStore {
    mode: NormalizationMode,
    log: Box<dyn TmLog>,
    shared: RwLock<TmShared>,
}

impl TmStore {
    /// Create a store writing to the given log
    pub fn new(log: Box<dyn TmLog>, mode: NormalizationMode) -> Self {
        Self {
            mode,
            log,
            shared: RwLock::new(TmShared::default()),
        }
    }

    /// Create a store with an in-memory log (for testing)
    pub fn new_in_memory(name: &str, mode: NormalizationMode) -> Self {
        Self::new(Box::new(MemoryLog::new(name)), mode)
    }

    /// Create a store backed by a JSONL file log
    pub fn open_jsonl<P: AsRef<Path>>(path: P, mode: NormalizationMode) -> io::Result<Self> {
        Ok(Self::new(Box::new(JsonlLog::open(path)?), mode))
    }

    /// Number of entries currently loaded
    pub fn len(&self) -> usize {
        self.shared.read().entries.len()
    }

    /// True when no entries are loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The normalization mode shared by indexing and querying
    pub fn mode(&self) -> NormalizationMode {
        self.mode
    }

    /// Load already-durable entries from a pull-based source.
    ///
    /// Malformed entries are skipped and counted; I/O failures abort and
    /// propagate. Returns `(loaded, skipped)`.
    pub fn load<I>(&self, entries: I) -> Result<(usize, usize), IngestError>
    where
        I: IntoIterator<Item = Result<TmEntry, IngestError>>,
    {
        let mut loaded = 0usize;
        let mut skipped = 0usize;

        let mut shared = self.shared.write();
        for item in entries {
            match item {
                Ok(entry) => {
                    Self::insert(&mut shared, entry, self.mode);
                    loaded += 1;
                }
                Err(IngestError::MalformedEntry { line, reason }) => {
                    warn!("Skipping malformed TM entry at record {}: {}", line, reason);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok((loaded, skipped))
    }

    fn insert(shared: &mut TmShared, entry: TmEntry, mode: NormalizationMode) {
        let norm = normalize(&entry.source, mode);
        let tokens = tokenize(norm.as_str());
        let chars = norm.as_str().chars().count();
        let id = shared.entries.len();

        shared.exact.entry(norm.clone()).or_default().push(id);
        for token in &tokens {
            let ids = shared.postings.entry(token.clone()).or_default();
            // A token repeated inside one entry still posts only once
            if ids.last() != Some(&id) {
                ids.push(id);
            }
        }

        shared.entries.push(StoredEntry {
            entry,
            norm: norm.into_string(),
            tokens,
            chars,
        });
    }

    /// Append a new translation record.
    ///
    /// This is the sole mutation path: the record is written durably
    /// through the log collaborator first, then published to the
    /// in-memory indexes, so a successful return is immediately visible
    /// to subsequent lookups.
    pub fn append(&self, unit: &SourceUnit, target: &str) -> Result<TmEntry, TmError> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string();

        let entry = TmEntry {
            source: unit.text.clone(),
            target: target.to_string(),
            tm_name: self.log.name().to_string(),
            usage_count: 1,
            last_used: timestamp,
            context_prev: unit.context_prev.clone(),
            context_next: unit.context_next.clone(),
            speaker: unit.speaker.clone(),
            file_source: (!unit.file_source.is_empty()).then(|| unit.file_source.clone()),
        };

        let record = TmRecord::from(&entry);

        // Holding the write lock across the log write serializes appends
        // and keeps log order identical to in-memory recency order
        let mut shared = self.shared.write();
        self.log.append(&record)?;
        Self::insert(&mut shared, entry.clone(), self.mode);
        debug!("Appended TM entry for '{}'", truncate(&entry.source, 40));

        Ok(entry)
    }

    /// Every entry whose normalized source equals the normalized query,
    /// most-recently-used first, similarity fixed at 1.0
    pub fn lookup_exact(&self, text: &str) -> Vec<TmMatch> {
        let key = normalize(text, self.mode);
        let shared = self.shared.read();

        let Some(ids) = shared.exact.get(&key) else {
            return Vec::new();
        };

        ids.iter()
            .rev()
            .map(|&id| to_match(&shared.entries[id].entry, 1.0, MatchKind::Exact))
            .collect()
    }

    /// Score candidate entries against the query and return the top-k at
    /// or above `threshold`, best first, recency breaking ties.
    ///
    /// The candidate set is narrowed by token postings and a length
    /// bound before any full scoring runs, so lookup cost tracks the
    /// candidate set rather than the corpus. An exhausted budget returns
    /// the best results found so far.
    pub fn lookup_fuzzy(
        &self,
        text: &str,
        threshold: f32,
        top_k: usize,
        budget: &FuzzyBudget,
    ) -> Vec<TmMatch> {
        let threshold = threshold.clamp(0.0, 1.0);
        let key = normalize(text, self.mode);
        let query_tokens = tokenize(key.as_str());
        let query_chars = key.as_str().chars().count();

        let shared = self.shared.read();
        let candidates =
            fuzzy::gather_candidates(&shared.postings, &query_tokens, budget.max_candidates);

        let mut scored: Vec<(f32, usize)> = Vec::new();
        for id in candidates {
            if budget.expired() {
                debug!("Fuzzy budget expired; returning best-so-far");
                break;
            }

            let stored = &shared.entries[id];
            if !fuzzy::length_compatible(query_chars, stored.chars, threshold) {
                continue;
            }

            let score =
                fuzzy::similarity(key.as_str(), &query_tokens, &stored.norm, &stored.tokens);
            if score >= threshold {
                scored.push((score, id));
            }
        }

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(b.1.cmp(&a.1)));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(score, id)| to_match(&shared.entries[id].entry, score, MatchKind::Fuzzy))
            .collect()
    }
}

fn to_match(entry: &TmEntry, similarity: f32, match_type: MatchKind) -> TmMatch {
    TmMatch {
        source: entry.source.clone(),
        target: entry.target.clone(),
        similarity,
        match_type,
        tm_name: entry.tm_name.clone(),
        usage_count: entry.usage_count,
        last_used: entry.last_used.clone(),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
