/*!
 * Multi-pattern term index.
 *
 * A failure-link automaton (Aho-Corasick construction) over glossary
 * source terms. `search` walks the input once and reports every raw
 * occurrence of every indexed term, so the cost per query is
 * O(n + z) for text length n and z occurrences, independent of how many
 * terms are indexed. Overlap policy is deliberately not applied here;
 * the index reports ground truth and `TermMatcher` applies policy.
 *
 * The index is immutable once built. A glossary reload builds a fresh
 * index off to the side and publishes it by swapping the engine handle.
 */

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::errors::IndexError;
use crate::ingest::GlossaryEntry;

/// A located term occurrence in a queried text.
///
/// `start_index`/`end_index` are byte offsets into the queried text,
/// half-open (`start_index < end_index`), and always fall on char
/// boundaries, so `&text[start_index..end_index]` is the matched slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermHit {
    /// The matched text as it appears in the query
    pub source_term: String,

    /// Translation of the matched term
    pub target_term: String,

    /// Start byte offset (inclusive)
    pub start_index: usize,

    /// End byte offset (exclusive)
    pub end_index: usize,

    /// Name of the owning glossary
    pub glossary: String,

    /// Optional definition from the glossary
    pub definition: Option<String>,

    /// Term priority; higher wins ties
    pub priority: i32,
}

impl TermHit {
    /// Span length in bytes
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    /// True if this hit's span overlaps another's
    pub fn overlaps(&self, other: &TermHit) -> bool {
        self.start_index < other.end_index && other.start_index < self.end_index
    }
}

/// Metadata for one indexed pattern
#[derive(Debug, Clone)]
struct Pattern {
    target: String,
    glossary: String,
    definition: Option<String>,
    priority: i32,
    char_len: usize,
}

/// One automaton state
#[derive(Debug, Default)]
struct Node {
    /// Goto transitions
    children: HashMap<char, u32>,
    /// Failure link (longest proper suffix state)
    fail: u32,
    /// Output link: nearest suffix state with terminal patterns (0 = none)
    out_link: u32,
    /// Pattern ids ending exactly at this state
    terminal: Vec<u32>,
}

/// Immutable multi-pattern search structure over glossary source terms
pub struct TermIndex {
    nodes: Vec<Node>,
    patterns: Vec<Pattern>,
    case_sensitive: bool,
}

/// Incremental constructor for `TermIndex`, for callers that stream
/// entries from a pull-based source instead of holding them in memory
pub struct TermIndexBuilder {
    index: TermIndex,
}

impl TermIndexBuilder {
    /// Start an empty builder
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            index: TermIndex {
                nodes: vec![Node::default()],
                patterns: Vec::new(),
                case_sensitive,
            },
        }
    }

    /// Add one glossary entry; entries with an empty source are ignored
    pub fn push(&mut self, entry: GlossaryEntry) {
        self.index.insert(entry);
    }

    /// Number of patterns added so far
    pub fn pattern_count(&self) -> usize {
        self.index.patterns.len()
    }

    /// Finish construction: wire failure links and seal the index
    pub fn build(mut self) -> Result<TermIndex, IndexError> {
        if self.index.patterns.is_empty() {
            return Err(IndexError::EmptyIndex);
        }

        self.index.link_failures();
        Ok(self.index)
    }
}

impl TermIndex {
    /// Build an index over all source terms of the given entries.
    ///
    /// Case folding happens here, at build time, when `case_sensitive` is
    /// false; queries then fold per input character, never per term.
    /// Duplicate source terms across glossaries are retained distinctly.
    /// Fails with `EmptyIndex` when no usable term was supplied; callers
    /// that want "empty glossary means no matches" handle that at the
    /// facade layer.
    pub fn build<I>(entries: I, case_sensitive: bool) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = GlossaryEntry>,
    {
        let mut builder = TermIndexBuilder::new(case_sensitive);
        for entry in entries {
            builder.push(entry);
        }
        builder.build()
    }

    /// Number of indexed patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Whether this index matches case-sensitively
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    fn fold(&self, ch: char) -> char {
        if self.case_sensitive {
            ch
        } else {
            // 1:1 fold keeps byte spans aligned with the queried text
            ch.to_lowercase().next().unwrap_or(ch)
        }
    }

    fn insert(&mut self, entry: GlossaryEntry) {
        if entry.source.is_empty() {
            return;
        }

        let mut state = 0u32;
        let mut char_len = 0usize;

        let folded: Vec<char> = entry.source.chars().map(|ch| self.fold(ch)).collect();
        for ch in folded {
            char_len += 1;
            state = match self.nodes[state as usize].children.get(&ch) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len() as u32;
                    self.nodes.push(Node::default());
                    self.nodes[state as usize].children.insert(ch, next);
                    next
                }
            };
        }

        let pattern_id = self.patterns.len() as u32;
        self.patterns.push(Pattern {
            target: entry.target,
            glossary: entry.glossary,
            definition: entry.definition,
            priority: entry.priority,
            char_len,
        });
        self.nodes[state as usize].terminal.push(pattern_id);
    }

    /// Wire failure and output links breadth-first from the root
    fn link_failures(&mut self) {
        let mut queue = VecDeque::new();

        let root_children: Vec<u32> = self.nodes[0].children.values().copied().collect();
        for child in root_children {
            self.nodes[child as usize].fail = 0;
            queue.push_back(child);
        }

        while let Some(state) = queue.pop_front() {
            let children: Vec<(char, u32)> = self.nodes[state as usize]
                .children
                .iter()
                .map(|(&ch, &id)| (ch, id))
                .collect();

            for (ch, child) in children {
                let mut fail = self.nodes[state as usize].fail;
                loop {
                    if let Some(&next) = self.nodes[fail as usize].children.get(&ch) {
                        if next != child {
                            fail = next;
                        } else {
                            fail = 0;
                        }
                        break;
                    }
                    if fail == 0 {
                        break;
                    }
                    fail = self.nodes[fail as usize].fail;
                }

                self.nodes[child as usize].fail = fail;
                self.nodes[child as usize].out_link =
                    if !self.nodes[fail as usize].terminal.is_empty() {
                        fail
                    } else {
                        self.nodes[fail as usize].out_link
                    };

                queue.push_back(child);
            }
        }
    }

    fn step(&self, mut state: u32, ch: char) -> u32 {
        loop {
            if let Some(&next) = self.nodes[state as usize].children.get(&ch) {
                return next;
            }
            if state == 0 {
                return 0;
            }
            state = self.nodes[state as usize].fail;
        }
    }

    /// Locate all occurrences of any indexed term inside `text`.
    ///
    /// Reports every raw occurrence, including overlapping occurrences of
    /// different terms and every duplicate of a shared source term.
    /// Results are ordered by start offset ascending, then span length
    /// descending, then priority descending.
    pub fn search(&self, text: &str) -> Vec<TermHit> {
        let mut hits = Vec::new();
        if self.patterns.is_empty() {
            return hits;
        }

        // Byte start of each consumed char, for span recovery
        let mut char_starts: Vec<usize> = Vec::new();
        let mut state = 0u32;

        for (byte_idx, ch) in text.char_indices() {
            char_starts.push(byte_idx);
            let end_byte = byte_idx + ch.len_utf8();

            state = self.step(state, self.fold(ch));

            // Emit matches ending at this char: own terminals, then the
            // output-link chain of suffix states
            let mut node = state;
            while node != 0 {
                for &pattern_id in &self.nodes[node as usize].terminal {
                    let pattern = &self.patterns[pattern_id as usize];
                    let start_byte = char_starts[char_starts.len() - pattern.char_len];

                    hits.push(TermHit {
                        source_term: text[start_byte..end_byte].to_string(),
                        target_term: pattern.target.clone(),
                        start_index: start_byte,
                        end_index: end_byte,
                        glossary: pattern.glossary.clone(),
                        definition: pattern.definition.clone(),
                        priority: pattern.priority,
                    });
                }
                node = self.nodes[node as usize].out_link;
            }
        }

        hits.sort_by(|a, b| {
            a.start_index
                .cmp(&b.start_index)
                .then(b.len().cmp(&a.len()))
                .then(b.priority.cmp(&a.priority))
        });
        hits
    }
}
