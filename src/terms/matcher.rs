/*!
 * Query-time term matching policy.
 *
 * The index reports every raw occurrence; this layer resolves overlaps
 * (longest span wins, then highest priority, then earliest start), caps
 * the result count, and returns hits in reading order.
 */

use std::sync::Arc;

use crate::po_processor::SourceUnit;
use crate::terms::index::{TermHit, TermIndex};

/// Overlap resolution and ranking over raw index hits
pub struct TermMatcher {
    index: Arc<TermIndex>,
    max_hits: Option<usize>,
}

impl TermMatcher {
    /// Create a matcher with unbounded results
    pub fn new(index: Arc<TermIndex>) -> Self {
        Self {
            index,
            max_hits: None,
        }
    }

    /// Cap the number of hits returned per unit.
    ///
    /// Truncation keeps the longest/highest-priority hits.
    pub fn with_max_hits(index: Arc<TermIndex>, max_hits: Option<usize>) -> Self {
        Self { index, max_hits }
    }

    /// Extract resolved term hits for one source unit.
    ///
    /// Deterministic for identical input and identical index.
    pub fn extract(&self, unit: &SourceUnit) -> Vec<TermHit> {
        self.resolve(self.index.search(&unit.text))
    }

    /// Apply overlap resolution to raw hits.
    ///
    /// Among overlapping hits, keeps the one with the greatest span
    /// length, then the highest priority, then the lowest start offset.
    /// Output is sorted by start offset ascending.
    pub fn resolve(&self, mut hits: Vec<TermHit>) -> Vec<TermHit> {
        if hits.is_empty() {
            return hits;
        }

        // Selection order: length desc, priority desc, start asc
        hits.sort_by(|a, b| {
            b.len()
                .cmp(&a.len())
                .then(b.priority.cmp(&a.priority))
                .then(a.start_index.cmp(&b.start_index))
        });

        let mut kept: Vec<TermHit> = Vec::new();
        for hit in hits {
            if kept.iter().all(|k| !k.overlaps(&hit)) {
                kept.push(hit);
            }
        }

        if let Some(max) = self.max_hits {
            kept.truncate(max);
        }

        kept.sort_by_key(|h| h.start_index);
        kept
    }
}
