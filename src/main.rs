// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::app_controller::Controller;

mod app_config;
mod app_controller;
mod engine;
mod errors;
mod file_utils;
mod ingest;
mod po_processor;
mod terms;
mod tm;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show term and TM suggestions for PO units (default command)
    Suggest(SuggestArgs),

    /// Record one translation into the project TM
    Add(AddArgs),

    /// Generate shell completions for localcat
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct SuggestArgs {
    /// Project directory holding glossaries (.csv) and TM files (.jsonl)
    #[arg(value_name = "PROJECT_DIR")]
    project_dir: PathBuf,

    /// PO file to process (default: every .po file in the project)
    #[arg(short, long)]
    po_file: Option<PathBuf>,

    /// Minimum fuzzy similarity (0.0 - 1.0)
    #[arg(short = 't', long)]
    fuzzy_threshold: Option<f32>,

    /// Maximum fuzzy matches per unit
    #[arg(short = 'k', long)]
    fuzzy_top_k: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "localcat.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct AddArgs {
    /// Project directory holding the TM log
    #[arg(value_name = "PROJECT_DIR")]
    project_dir: PathBuf,

    /// Source text
    #[arg(short, long)]
    source: String,

    /// Translation of the source text
    #[arg(short = 'r', long)]
    translation: String,

    /// Configuration file path
    #[arg(short, long, default_value = "localcat.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// localcat - Local CAT Matching Engine
///
/// Recognizes glossary terminology and retrieves prior translations for
/// PO source units, entirely offline.
#[derive(Parser, Debug)]
#[command(name = "localcat")]
#[command(version = "1.0.0")]
#[command(about = "Local terminology and translation-memory suggestions")]
#[command(long_about = "localcat matches PO source units against project glossaries and an
append-only translation memory, entirely on the local machine.

EXAMPLES:
    localcat ./project                          # Suggest for every .po file
    localcat ./project -p strings.po            # Suggest for one PO file
    localcat -t 0.8 -k 3 ./project              # Stricter fuzzy matching
    localcat add ./project -s \"Save\" -r \"保存\"   # Record a translation
    localcat completions bash > localcat.bash   # Generate bash completions

PROJECT LAYOUT:
    Glossaries are .csv files (source,target[,definition[,priority]]);
    translation memories are .jsonl files; new translations are appended
    to tm.jsonl. Configuration is stored in localcat.json by default and
    a default one is created when missing.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project directory holding glossaries (.csv) and TM files (.jsonl)
    #[arg(value_name = "PROJECT_DIR")]
    project_dir: Option<PathBuf>,

    /// PO file to process (default: every .po file in the project)
    #[arg(short, long)]
    po_file: Option<PathBuf>,

    /// Minimum fuzzy similarity (0.0 - 1.0)
    #[arg(short = 't', long)]
    fuzzy_threshold: Option<f32>,

    /// Maximum fuzzy matches per unit
    #[arg(short = 'k', long)]
    fuzzy_top_k: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "localcat.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "localcat", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Suggest(args)) => run_suggest(args),
        Some(Commands::Add(args)) => run_add(args),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let project_dir = cli
                .project_dir
                .ok_or_else(|| anyhow!("PROJECT_DIR is required when no subcommand is specified"))?;

            run_suggest(SuggestArgs {
                project_dir,
                po_file: cli.po_file,
                fuzzy_threshold: cli.fuzzy_threshold,
                fuzzy_top_k: cli.fuzzy_top_k,
                config_path: cli.config_path,
                log_level: cli.log_level,
            })
        }
    }
}

/// Load the configuration, creating a default file when missing, and
/// apply the CLI log level
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    if let Some(cli_level) = log_level {
        config.log_level = cli_level.into();
    }
    log::set_max_level(level_filter(config.log_level));

    Ok(config)
}

fn run_suggest(args: SuggestArgs) -> Result<()> {
    let mut config = load_config(&args.config_path, args.log_level)?;

    if let Some(threshold) = args.fuzzy_threshold {
        config.fuzzy_threshold = threshold;
    }
    if let Some(top_k) = args.fuzzy_top_k {
        config.fuzzy_top_k = top_k;
    }

    let controller = Controller::with_config(config)?;
    controller.run(&args.project_dir, args.po_file.as_deref())?;
    Ok(())
}

fn run_add(args: AddArgs) -> Result<()> {
    let config = load_config(&args.config_path, args.log_level)?;

    let controller = Controller::with_config(config)?;
    let stored = controller.add_translation(&args.project_dir, &args.source, &args.translation)?;
    if !stored {
        return Err(anyhow!("Translation was not recorded"));
    }
    Ok(())
}
