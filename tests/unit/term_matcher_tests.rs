/*!
 * Tests for query-time term matching policy
 */

use std::sync::Arc;

use localcat::ingest::GlossaryEntry;
use localcat::terms::{TermIndex, TermMatcher};

use crate::common;

fn matcher(entries: Vec<GlossaryEntry>) -> TermMatcher {
    TermMatcher::new(Arc::new(TermIndex::build(entries, true).unwrap()))
}

#[test]
fn test_termMatcher_cpuCoreScenario_longestTermWins() {
    let m = matcher(vec![
        GlossaryEntry::with_priority("CPU", "处理器", "g.csv", 1),
        GlossaryEntry::with_priority("CPU core", "处理器核心", "g.csv", 2),
    ]);

    let hits = m.extract(&common::make_unit("u1", "the CPU core is hot"));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].source_term, "CPU core");
    assert_eq!(hits[0].target_term, "处理器核心");
    assert_eq!(hits[0].start_index, 4);
    assert_eq!(hits[0].end_index, 12);
}

#[test]
fn test_termMatcher_overlapClusters_keepExactlyOnePerCluster() {
    let m = matcher(vec![
        GlossaryEntry::new("Apple", "苹果", "g.csv"),
        GlossaryEntry::new("Apple Pie", "苹果派", "g.csv"),
        GlossaryEntry::new("Pie", "派", "g.csv"),
    ]);

    let hits = m.extract(&common::make_unit("u1", "Apple Pie and Pie"));
    // Cluster 1: Apple / Apple Pie / Pie(6..9) -> Apple Pie
    // Cluster 2: standalone Pie at 14
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].source_term, "Apple Pie");
    assert_eq!(hits[1].source_term, "Pie");
    assert_eq!(hits[1].start_index, 14);
}

#[test]
fn test_termMatcher_extract_outputSortedByStart() {
    let m = matcher(vec![
        GlossaryEntry::new("dog", "狗", "g.csv"),
        GlossaryEntry::new("cat", "猫", "g.csv"),
        GlossaryEntry::new("bird", "鸟", "g.csv"),
    ]);

    let hits = m.extract(&common::make_unit("u1", "bird, dog, cat"));
    let starts: Vec<usize> = hits.iter().map(|h| h.start_index).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
    assert_eq!(hits.len(), 3);
}

#[test]
fn test_termMatcher_extract_repeatedRuns_areDeterministic() {
    let m = matcher(vec![
        GlossaryEntry::with_priority("alpha", "一", "g.csv", 2),
        GlossaryEntry::with_priority("alpha beta", "一二", "g.csv", 1),
        GlossaryEntry::with_priority("beta", "二", "g.csv", 3),
    ]);

    let unit = common::make_unit("u1", "alpha beta alpha");
    let first = m.extract(&unit);
    for _ in 0..10 {
        assert_eq!(m.extract(&unit), first);
    }
}

#[test]
fn test_termMatcher_maxHits_truncatesLowestRanked() {
    let index = Arc::new(
        TermIndex::build(
            vec![
                GlossaryEntry::new("aaaa", "长", "g.csv"),
                GlossaryEntry::new("bb", "中", "g.csv"),
                GlossaryEntry::new("c", "短", "g.csv"),
            ],
            true,
        )
        .unwrap(),
    );
    let m = TermMatcher::with_max_hits(index, Some(2));

    let hits = m.extract(&common::make_unit("u1", "aaaa bb c"));
    assert_eq!(hits.len(), 2);
    // The single-char hit is the one dropped
    assert!(hits.iter().any(|h| h.source_term == "aaaa"));
    assert!(hits.iter().any(|h| h.source_term == "bb"));
}

#[test]
fn test_termMatcher_noIndexHits_shouldReturnEmpty() {
    let m = matcher(vec![GlossaryEntry::new("term", "词", "g.csv")]);
    assert!(m.extract(&common::make_unit("u1", "completely unrelated")).is_empty());
}
