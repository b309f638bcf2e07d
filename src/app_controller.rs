use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::Path;
use std::time::Duration;

use crate::app_config::Config;
use crate::engine::{Engine, MatchEngine};
use crate::file_utils::FileManager;
use crate::po_processor::{PoParser, SourceUnit};
use crate::terms::highlight;
use crate::tm::MatchKind;

// @module: Main application controller

/// Counts gathered over one suggestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Units processed
    pub units: usize,
    /// Units answered from the TM (exact hit)
    pub tm_hits: usize,
    /// Units with term hits (no exact TM hit)
    pub term_units: usize,
    /// Units with nothing to offer
    pub no_match: usize,
}

/// Controller wiring configuration, engine, and PO input together
pub struct Controller {
    config: Config,
    engine: MatchEngine,
}

impl Controller {
    /// Create a controller from a validated configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let engine = MatchEngine::new(config.clone());
        Ok(Self { config, engine })
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the project context with a progress spinner
    fn load_context(&self, project_dir: &Path) -> Result<()> {
        if !FileManager::dir_exists(project_dir) {
            return Err(anyhow!("Project directory does not exist: {:?}", project_dir));
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Loading project context from {:?}", project_dir));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let report = self
            .engine
            .load_project_context(project_dir)
            .with_context(|| format!("Failed to load project context from {:?}", project_dir))?;

        spinner.finish_and_clear();
        info!(
            "Context ready: {} terms, {} TM entries ({} records skipped)",
            report.terms_loaded, report.tm_entries_loaded, report.skipped
        );
        if report.skipped > 0 {
            warn!("{} malformed records were skipped during load", report.skipped);
        }

        Ok(())
    }

    /// Process PO input against the project context and print suggestions.
    ///
    /// With no explicit file, every `.po` file in the project directory is
    /// processed.
    pub fn run(&self, project_dir: &Path, po_file: Option<&Path>) -> Result<RunSummary> {
        self.load_context(project_dir)?;

        let po_files = match po_file {
            Some(file) => {
                if !FileManager::file_exists(file) {
                    return Err(anyhow!("PO file does not exist: {:?}", file));
                }
                vec![file.to_path_buf()]
            }
            None => {
                let found = FileManager::find_files(project_dir, "po")?;
                if found.is_empty() {
                    return Err(anyhow!(
                        "No PO files found under project directory: {:?}",
                        project_dir
                    ));
                }
                found
            }
        };

        let mut summary = RunSummary::default();
        for file in &po_files {
            let units = PoParser::parse_file(file)?;
            info!("Processing {} unit(s) from {:?}", units.len(), file);

            for unit in &units {
                summary.units += 1;
                self.print_unit(unit, &mut summary)?;
            }
        }

        println!(
            "\n{} unit(s): {} from TM, {} with terms, {} without suggestions",
            summary.units, summary.tm_hits, summary.term_units, summary.no_match
        );
        Ok(summary)
    }

    fn print_unit(&self, unit: &SourceUnit, summary: &mut RunSummary) -> Result<()> {
        let suggestions = self.engine.get_suggestions(unit)?;

        println!("\n[{}]", unit.id);
        println!("  Text: {}", unit.text);
        if let Some(context) = &unit.context_prev {
            println!("  Context: {}", context);
        }

        let exact_hit = suggestions
            .tm_matches
            .first()
            .is_some_and(|m| m.match_type == MatchKind::Exact);

        if exact_hit {
            // A remembered translation answers the unit outright
            summary.tm_hits += 1;
            for m in &suggestions.tm_matches {
                println!(
                    "  TM {:>3.0}% ({}): {}",
                    m.similarity * 100.0,
                    m.tm_name,
                    m.target
                );
            }
            return Ok(());
        }

        for m in &suggestions.tm_matches {
            println!(
                "  TM {:>3.0}% ({}): {} -> {}",
                m.similarity * 100.0,
                m.tm_name,
                m.source,
                m.target
            );
        }

        if suggestions.terms.is_empty() {
            if suggestions.tm_matches.is_empty() {
                summary.no_match += 1;
                println!("  No suggestions.");
            }
            return Ok(());
        }

        summary.term_units += 1;
        println!(
            "  Terms ({}): {}",
            suggestions.terms.len(),
            highlight::highlight(&unit.text, &suggestions.terms)
        );
        for hit in &suggestions.terms {
            println!(
                "    - {} -> {} ({})",
                hit.source_term, hit.target_term, hit.glossary
            );
        }

        Ok(())
    }

    /// Record one translation into the project TM
    pub fn add_translation(&self, project_dir: &Path, source: &str, target: &str) -> Result<bool> {
        self.load_context(project_dir)?;

        let unit = SourceUnit::new("cli", source, "");
        let stored = self.engine.add_to_tm(&unit, target)?;

        if stored {
            info!("Recorded translation for '{}'", source);
        } else {
            warn!("Nothing recorded: source and translation must be non-empty");
        }

        Ok(stored)
    }
}
