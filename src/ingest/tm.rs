/*!
 * Translation-memory ingestion from JSONL sources.
 *
 * One JSON record per line, append-only on disk. The reader is a
 * pull-based iterator over a buffered handle; invalid lines are surfaced
 * as recoverable `MalformedEntry` errors, matching the load policy of
 * the glossary reader.
 */

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::IngestError;

/// One stored translation unit, as held in memory.
///
/// Entries are append-only: a new translation of the same source text is
/// a new entry, never an in-place edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmEntry {
    /// Source text as originally translated
    pub source: String,

    /// Target text produced for it
    pub target: String,

    /// Name of the owning translation memory
    pub tm_name: String,

    /// How many times this entry has been used
    pub usage_count: u32,

    /// ISO-8601 timestamp of last use
    pub last_used: String,

    /// Preceding context at translation time, if recorded
    pub context_prev: Option<String>,

    /// Following context at translation time, if recorded
    pub context_next: Option<String>,

    /// Speaker tag at translation time, if recorded
    pub speaker: Option<String>,

    /// File the source unit came from, if recorded
    pub file_source: Option<String>,
}

/// Wire form of one TM log line.
///
/// Context fields are stored for future context-aware scoring but do not
/// participate in baseline matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmRecord {
    /// Source text
    pub source: String,

    /// Target text
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_prev: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_next: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_source: Option<String>,

    /// ISO-8601 timestamp of last use
    #[serde(default)]
    pub last_used: String,

    /// Usage counter
    #[serde(default)]
    pub usage_count: u32,
}

impl TmRecord {
    /// Attach a TM name, producing the in-memory entry form
    pub fn into_entry(self, tm_name: &str) -> TmEntry {
        TmEntry {
            source: self.source,
            target: self.target,
            tm_name: tm_name.to_string(),
            usage_count: self.usage_count,
            last_used: self.last_used,
            context_prev: self.context_prev,
            context_next: self.context_next,
            speaker: self.speaker,
            file_source: self.file_source,
        }
    }
}

impl From<&TmEntry> for TmRecord {
    fn from(entry: &TmEntry) -> Self {
        Self {
            source: entry.source.clone(),
            target: entry.target.clone(),
            context_prev: entry.context_prev.clone(),
            context_next: entry.context_next.clone(),
            speaker: entry.speaker.clone(),
            file_source: entry.file_source.clone(),
            last_used: entry.last_used.clone(),
            usage_count: entry.usage_count,
        }
    }
}

/// Pull-based reader yielding one `TmEntry` per JSONL line
pub struct TmReader<R: io::BufRead> {
    lines: io::Lines<R>,
    tm_name: String,
    line_num: usize,
}

impl TmReader<BufReader<File>> {
    /// Open a JSONL TM file; the TM name is the file name
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), &name))
    }
}

impl<R: io::BufRead> TmReader<R> {
    /// Create a reader over any buffered source, tagged with a TM name
    pub fn new(reader: R, tm_name: &str) -> Self {
        Self {
            lines: reader.lines(),
            tm_name: tm_name.to_string(),
            line_num: 0,
        }
    }
}

impl<R: io::BufRead> Iterator for TmReader<R> {
    type Item = Result<TmEntry, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(IngestError::Io(e))),
            };
            self.line_num += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let record: TmRecord = match serde_json::from_str(trimmed) {
                Ok(record) => record,
                Err(e) => {
                    return Some(Err(IngestError::MalformedEntry {
                        line: self.line_num,
                        reason: format!("invalid JSON: {}", e),
                    }));
                }
            };

            if record.source.is_empty() {
                return Some(Err(IngestError::MalformedEntry {
                    line: self.line_num,
                    reason: "empty source text".to_string(),
                }));
            }

            return Some(Ok(record.into_entry(&self.tm_name)));
        }
    }
}
