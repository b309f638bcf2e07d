/*!
 * Source-unit model and PO file processing.
 *
 * Turns gettext-style `.po` files into immutable `SourceUnit`s for the
 * engine to query. `msgctxt` is carried as the unit's preceding context;
 * the empty header `msgid ""` is skipped. Units are identified by a
 * stable content-derived hash so re-parsing the same file yields the
 * same ids.
 */

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// Leading keyword plus first quoted segment, e.g. `msgid "Open File"`
static KEYWORD_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(msgctxt|msgid|msgstr)\s+"(.*)"\s*$"#).unwrap());

// Bare continuation string, e.g. `"second line"`
static CONTINUATION_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^"(.*)"\s*$"#).unwrap());

/// An immutable unit of text to translate.
///
/// Created by the parsing layer; consumed read-only by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    /// Stable identifier
    pub id: String,

    /// Source text to be translated
    pub text: String,

    /// Preceding context text, if any
    pub context_prev: Option<String>,

    /// Following context text, if any
    pub context_next: Option<String>,

    /// Speaker tag, if any
    pub speaker: Option<String>,

    /// Label of the originating file
    pub file_source: String,

    /// Open extension mapping for auxiliary metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl SourceUnit {
    /// Create a unit with no context or speaker
    pub fn new(id: &str, text: &str, file_source: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            context_prev: None,
            context_next: None,
            speaker: None,
            file_source: file_source.to_string(),
            metadata: HashMap::new(),
        }
    }

    /// Attach preceding/following context
    pub fn with_context(mut self, prev: Option<&str>, next: Option<&str>) -> Self {
        self.context_prev = prev.map(str::to_string);
        self.context_next = next.map(str::to_string);
        self
    }

    /// Attach a speaker tag
    pub fn with_speaker(mut self, speaker: &str) -> Self {
        self.speaker = Some(speaker.to_string());
        self
    }
}

impl fmt::Display for SourceUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.text)
    }
}

/// Parser for gettext-style PO files
pub struct PoParser;

#[derive(PartialEq)]
enum Field {
    None,
    Ctxt,
    Id,
    Str,
}

impl PoParser {
    /// Parse a PO file into source units
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<SourceUnit>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read PO file: {:?}", path))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::parse_str(&content, &file_name))
    }

    /// Parse PO content into source units, labeling them with `file_source`
    pub fn parse_str(content: &str, file_source: &str) -> Vec<SourceUnit> {
        let mut units = Vec::new();

        let mut ctxt: Option<String> = None;
        let mut msgid: Option<String> = None;
        let mut field = Field::None;

        for raw_line in content.lines() {
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(caps) = KEYWORD_LINE.captures(line) {
                let keyword = caps.get(1).map_or("", |m| m.as_str());
                let value = unescape(caps.get(2).map_or("", |m| m.as_str()));

                match keyword {
                    "msgctxt" => {
                        // A new block may start with msgctxt
                        if field == Field::Str {
                            Self::flush(&mut units, &mut ctxt, &mut msgid, file_source);
                        }
                        ctxt = Some(value);
                        field = Field::Ctxt;
                    }
                    "msgid" => {
                        if field == Field::Str {
                            Self::flush(&mut units, &mut ctxt, &mut msgid, file_source);
                        }
                        msgid = Some(value);
                        field = Field::Id;
                    }
                    "msgstr" => {
                        field = Field::Str;
                    }
                    _ => unreachable!("regex admits only known keywords"),
                }
            } else if let Some(caps) = CONTINUATION_LINE.captures(line) {
                let value = unescape(caps.get(1).map_or("", |m| m.as_str()));
                match field {
                    Field::Ctxt => {
                        if let Some(c) = ctxt.as_mut() {
                            c.push_str(&value);
                        }
                    }
                    Field::Id => {
                        if let Some(id) = msgid.as_mut() {
                            id.push_str(&value);
                        }
                    }
                    // msgstr content is the prior translation, not input
                    Field::Str | Field::None => {}
                }
            }
        }

        Self::flush(&mut units, &mut ctxt, &mut msgid, file_source);
        units
    }

    fn flush(
        units: &mut Vec<SourceUnit>,
        ctxt: &mut Option<String>,
        msgid: &mut Option<String>,
        file_source: &str,
    ) {
        let text = msgid.take().unwrap_or_default();
        let context = ctxt.take();

        // The header block has an empty msgid
        if text.is_empty() {
            return;
        }

        let id = unit_id(file_source, units.len(), &text);
        let unit = SourceUnit::new(&id, &text, file_source)
            .with_context(context.as_deref(), None);
        units.push(unit);
    }
}

/// Stable content-derived unit id
fn unit_id(file_source: &str, seq: usize, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_source.as_bytes());
    hasher.update([0u8]);
    hasher.update(seq.to_le_bytes());
    hasher.update(text.as_bytes());

    let digest = hasher.finalize();
    let hex: String = digest.iter().take(6).map(|b| format!("{:02x}", b)).collect();
    format!("{}:{}:{}", file_source, seq, hex)
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
