use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the engine configuration including loading,
/// validating and saving configuration settings.
/// Represents the engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Whether term matching is case sensitive
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,

    /// Minimum similarity score for fuzzy TM matches (0.0 - 1.0)
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f32,

    /// Maximum number of fuzzy TM matches returned per query
    #[serde(default = "default_fuzzy_top_k")]
    pub fuzzy_top_k: usize,

    /// Normalization applied to TM keys and queries
    #[serde(default)]
    pub normalization_mode: NormalizationMode,

    /// Maximum term hits returned per unit (None = unbounded)
    #[serde(default)]
    pub max_term_hits: Option<usize>,

    /// Maximum fuzzy candidates fully scored per query
    #[serde(default = "default_fuzzy_max_candidates")]
    pub fuzzy_max_candidates: usize,

    /// Wall-clock budget for a fuzzy query in milliseconds (None = unbounded)
    #[serde(default)]
    pub fuzzy_budget_ms: Option<u64>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Normalization mode applied when deriving TM keys
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizationMode {
    /// Collapse runs of whitespace only
    #[serde(rename = "whitespace")]
    Whitespace,
    /// Collapse whitespace and fold case
    #[default]
    #[serde(rename = "whitespace+case")]
    WhitespaceCase,
    /// Collapse whitespace, fold case, and strip punctuation
    #[serde(rename = "whitespace+case+punctuation")]
    WhitespaceCasePunctuation,
}

impl std::fmt::Display for NormalizationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Whitespace => "whitespace",
            Self::WhitespaceCase => "whitespace+case",
            Self::WhitespaceCasePunctuation => "whitespace+case+punctuation",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for NormalizationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "whitespace" => Ok(Self::Whitespace),
            "whitespace+case" => Ok(Self::WhitespaceCase),
            "whitespace+case+punctuation" => Ok(Self::WhitespaceCasePunctuation),
            _ => Err(anyhow!("Invalid normalization mode: {}", s)),
        }
    }
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

fn default_case_sensitive() -> bool {
    true
}

fn default_fuzzy_threshold() -> f32 {
    0.7
}

fn default_fuzzy_top_k() -> usize {
    5
}

fn default_fuzzy_max_candidates() -> usize {
    2_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            case_sensitive: default_case_sensitive(),
            fuzzy_threshold: default_fuzzy_threshold(),
            fuzzy_top_k: default_fuzzy_top_k(),
            normalization_mode: NormalizationMode::default(),
            max_term_hits: None,
            fuzzy_max_candidates: default_fuzzy_max_candidates(),
            fuzzy_budget_ms: None,
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(anyhow!(
                "fuzzy_threshold must be within [0.0, 1.0], got {}",
                self.fuzzy_threshold
            ));
        }

        if self.fuzzy_top_k == 0 {
            return Err(anyhow!("fuzzy_top_k must be at least 1"));
        }

        if self.fuzzy_max_candidates == 0 {
            return Err(anyhow!("fuzzy_max_candidates must be at least 1"));
        }

        if let Some(max_hits) = self.max_term_hits {
            if max_hits == 0 {
                return Err(anyhow!("max_term_hits must be at least 1 when set"));
            }
        }

        Ok(())
    }
}
