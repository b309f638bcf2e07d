/*!
 * Engine facade.
 *
 * Combines term extraction and TM lookup behind a single query contract.
 * The engine holds no session state: its handles are immutable snapshots
 * (`Arc<TermIndex>`, `Arc<TmStore>`) published by atomic swap, so reads
 * need no external synchronization and a reload never disturbs in-flight
 * queries.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::app_config::Config;
use crate::errors::{EngineError, IngestError};
use crate::ingest::{GlossaryReader, LoadReport, TmReader};
use crate::po_processor::SourceUnit;
use crate::terms::index::TermIndexBuilder;
use crate::terms::{TermHit, TermIndex, TermMatcher};
use crate::tm::{FuzzyBudget, TmMatch, TmStore};

/// File name of the primary TM log inside a project directory
pub const PRIMARY_TM_LOG: &str = "tm.jsonl";

/// Combined result record for one queried unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    /// Resolved term hits, in reading order
    pub terms: Vec<TermHit>,

    /// TM matches, best first
    pub tm_matches: Vec<TmMatch>,
}

impl Suggestions {
    /// True when neither side produced anything
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.tm_matches.is_empty()
    }
}

/// Capability contract between the engine and any presentation backend.
///
/// All payloads crossing this boundary are immutable structured records.
pub trait Engine: Send + Sync {
    /// Load (or reload) glossaries and TM from a project directory
    fn load_project_context(&self, path: &Path) -> Result<LoadReport, EngineError>;

    /// Query term hits and TM matches for one source unit
    fn get_suggestions(&self, unit: &SourceUnit) -> Result<Suggestions, EngineError>;

    /// Record a new translation; returns false for blank input
    fn add_to_tm(&self, unit: &SourceUnit, translation: &str) -> Result<bool, EngineError>;
}

/// The matching engine: term index + TM store behind swap-published handles
pub struct MatchEngine {
    config: Config,
    /// None until a context is loaded, or when the glossary had no terms
    index: RwLock<Option<Arc<TermIndex>>>,
    /// None until a context is loaded
    tm: RwLock<Option<Arc<TmStore>>>,
}

impl MatchEngine {
    /// Create an engine with no project context loaded yet
    pub fn new(config: Config) -> Self {
        Self {
            config,
            index: RwLock::new(None),
            tm: RwLock::new(None),
        }
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn fuzzy_budget(&self) -> FuzzyBudget {
        let mut budget = FuzzyBudget::with_max_candidates(self.config.fuzzy_max_candidates);
        if let Some(ms) = self.config.fuzzy_budget_ms {
            budget = budget.with_time_limit(Duration::from_millis(ms));
        }
        budget
    }

    fn tm_snapshot(&self) -> Result<Arc<TmStore>, EngineError> {
        self.tm
            .read()
            .clone()
            .ok_or_else(|| EngineError::Config("no project context loaded".to_string()))
    }

    /// Build a fresh term index from every glossary file found under `path`
    fn build_index(
        &self,
        files: &[PathBuf],
        report: &mut LoadReport,
    ) -> Result<Option<Arc<TermIndex>>, EngineError> {
        let mut builder = TermIndexBuilder::new(self.config.case_sensitive);

        for file in files {
            let reader = GlossaryReader::open(file).map_err(|e| source_io(file, e))?;
            report.glossary_files += 1;

            for item in reader {
                match item {
                    Ok(entry) => {
                        builder.push(entry);
                        report.terms_loaded += 1;
                    }
                    Err(IngestError::Io(e)) => return Err(source_io(file, IngestError::Io(e))),
                    Err(e) => {
                        warn!("Skipping glossary record in {:?}: {}", file, e);
                        report.skipped += 1;
                    }
                }
            }
        }

        match builder.build() {
            Ok(index) => Ok(Some(Arc::new(index))),
            Err(_) => {
                // Empty glossary is policy, not failure: no terms to match
                warn!("Glossaries under the project produced no usable terms");
                Ok(None)
            }
        }
    }

    /// Build a fresh TM store from every TM file found under `path`
    fn build_tm(
        &self,
        project: &Path,
        files: &[PathBuf],
        report: &mut LoadReport,
    ) -> Result<Arc<TmStore>, EngineError> {
        let log_path = project.join(PRIMARY_TM_LOG);
        let store = TmStore::open_jsonl(&log_path, self.config.normalization_mode)
            .map_err(|e| EngineError::SourceIo {
                path: log_path.clone(),
                source: e,
            })?;

        for file in files {
            let reader = TmReader::open(file).map_err(|e| source_io(file, e))?;
            report.tm_files += 1;

            let (loaded, skipped) = store.load(reader).map_err(|e| source_io(file, e))?;
            report.tm_entries_loaded += loaded;
            report.skipped += skipped;
        }

        Ok(Arc::new(store))
    }
}

impl Engine for MatchEngine {
    fn load_project_context(&self, path: &Path) -> Result<LoadReport, EngineError> {
        if !path.is_dir() {
            return Err(EngineError::Config(format!(
                "project context {:?} is not a directory",
                path
            )));
        }

        let (glossary_files, tm_files) = scan_project(path);
        let mut report = LoadReport::default();

        // Build both structures off to the side
        let index = self.build_index(&glossary_files, &mut report)?;
        let tm = self.build_tm(path, &tm_files, &mut report)?;

        // Publish together; in-flight readers keep their snapshots
        {
            let mut index_slot = self.index.write();
            let mut tm_slot = self.tm.write();
            *index_slot = index;
            *tm_slot = Some(tm);
        }

        info!(
            "Loaded project context from {:?}: {} terms from {} glossaries, {} TM entries from {} files, {} skipped",
            path,
            report.terms_loaded,
            report.glossary_files,
            report.tm_entries_loaded,
            report.tm_files,
            report.skipped
        );

        Ok(report)
    }

    fn get_suggestions(&self, unit: &SourceUnit) -> Result<Suggestions, EngineError> {
        let tm = self.tm_snapshot()?;

        let terms = match self.index.read().clone() {
            Some(index) => {
                TermMatcher::with_max_hits(index, self.config.max_term_hits).extract(unit)
            }
            None => Vec::new(),
        };

        let mut tm_matches = tm.lookup_exact(&unit.text);
        if tm_matches.is_empty() {
            tm_matches = tm.lookup_fuzzy(
                &unit.text,
                self.config.fuzzy_threshold,
                self.config.fuzzy_top_k,
                &self.fuzzy_budget(),
            );
        }

        debug!(
            "Unit {}: {} term hit(s), {} TM match(es)",
            unit.id,
            terms.len(),
            tm_matches.len()
        );

        Ok(Suggestions { terms, tm_matches })
    }

    fn add_to_tm(&self, unit: &SourceUnit, translation: &str) -> Result<bool, EngineError> {
        if unit.text.trim().is_empty() || translation.trim().is_empty() {
            return Ok(false);
        }

        let tm = self.tm_snapshot()?;
        tm.append(unit, translation)?;
        Ok(true)
    }
}

/// Locate glossary (.csv) and TM (.jsonl) files directly under a project
/// directory, in stable order
fn scan_project(path: &Path) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut glossaries = Vec::new();
    let mut tms = Vec::new();

    for entry in WalkDir::new(path)
        .max_depth(2)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let entry_path = entry.path();
        if !entry_path.is_file() {
            continue;
        }

        match entry_path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("csv") => glossaries.push(entry_path.to_path_buf()),
            Some("jsonl") => tms.push(entry_path.to_path_buf()),
            _ => {}
        }
    }

    glossaries.sort();
    tms.sort();
    (glossaries, tms)
}

fn source_io(path: &Path, error: IngestError) -> EngineError {
    match error {
        IngestError::Io(e) => EngineError::SourceIo {
            path: path.to_path_buf(),
            source: e,
        },
        other => EngineError::Ingest(other),
    }
}
