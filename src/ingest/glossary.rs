/*!
 * Glossary ingestion from CSV sources.
 *
 * Row convention: column 1 = source term, column 2 = target term,
 * optional column 3 = definition, optional column 4 = priority.
 * Rows with a missing source or target are malformed and reported
 * per-record so the caller can skip them without aborting the load.
 */

use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::IngestError;

/// One term pair owned by a named glossary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    /// Term in the source language
    pub source: String,

    /// Translation of the term
    pub target: String,

    /// Name of the owning glossary
    pub glossary: String,

    /// Optional free-text definition
    pub definition: Option<String>,

    /// Priority used for tie-breaking; higher wins
    pub priority: i32,
}

impl GlossaryEntry {
    /// Create an entry with default priority
    pub fn new(source: &str, target: &str, glossary: &str) -> Self {
        Self::with_priority(source, target, glossary, 1)
    }

    /// Create an entry with an explicit priority
    pub fn with_priority(source: &str, target: &str, glossary: &str, priority: i32) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            glossary: glossary.to_string(),
            definition: None,
            priority,
        }
    }
}

/// Pull-based reader yielding one `GlossaryEntry` per CSV record.
///
/// Never buffers more than one record, regardless of file size.
pub struct GlossaryReader<R: io::Read> {
    records: csv::StringRecordsIntoIter<R>,
    glossary: String,
    record_num: usize,
}

impl GlossaryReader<File> {
    /// Open a CSV glossary file; the glossary name is the file name
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let file = File::open(path)?;
        Ok(Self::new(file, &name))
    }
}

impl<R: io::Read> GlossaryReader<R> {
    /// Create a reader over any byte source, tagged with a glossary name
    pub fn new(reader: R, glossary: &str) -> Self {
        let csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        Self {
            records: csv_reader.into_records(),
            glossary: glossary.to_string(),
            record_num: 0,
        }
    }

    fn parse_record(&self, record: &csv::StringRecord) -> Result<GlossaryEntry, IngestError> {
        let source = record.get(0).map(str::trim).unwrap_or_default();
        let target = record.get(1).map(str::trim).unwrap_or_default();

        if source.is_empty() {
            return Err(IngestError::MalformedEntry {
                line: self.record_num,
                reason: "empty source term".to_string(),
            });
        }

        if target.is_empty() {
            return Err(IngestError::MalformedEntry {
                line: self.record_num,
                reason: "empty target term".to_string(),
            });
        }

        let definition = record
            .get(2)
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let priority = match record.get(3).map(str::trim) {
            None | Some("") => 1,
            Some(raw) => raw.parse::<i32>().map_err(|_| IngestError::MalformedEntry {
                line: self.record_num,
                reason: format!("invalid priority '{}'", raw),
            })?,
        };

        Ok(GlossaryEntry {
            source: source.to_string(),
            target: target.to_string(),
            glossary: self.glossary.clone(),
            definition,
            priority,
        })
    }
}

impl<R: io::Read> Iterator for GlossaryReader<R> {
    type Item = Result<GlossaryEntry, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => return Some(Err(IngestError::Csv(e))),
            };
            self.record_num += 1;

            // Skip fully blank records instead of reporting them
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            return Some(self.parse_record(&record));
        }
    }
}
