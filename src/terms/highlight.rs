/*!
 * Terminal highlighting of resolved term hits.
 *
 * Renders a source text with `[source|target]` bracket markup, a
 * plain-terminal verification aid used by the CLI. Expects resolved
 * (non-overlapping, start-sorted) hits such as `TermMatcher` produces;
 * any overlapping stragglers are skipped rather than double-rendered.
 */

use crate::terms::index::TermHit;

/// Render `text` with each hit wrapped as `[source|target]`
pub fn highlight(text: &str, hits: &[TermHit]) -> String {
    if hits.is_empty() {
        return text.to_string();
    }

    let mut rendered = String::with_capacity(text.len() + hits.len() * 8);
    let mut cursor = 0usize;

    for hit in hits {
        if hit.start_index < cursor || hit.end_index > text.len() {
            continue;
        }

        rendered.push_str(&text[cursor..hit.start_index]);
        rendered.push('[');
        rendered.push_str(&hit.source_term);
        rendered.push('|');
        rendered.push_str(&hit.target_term);
        rendered.push(']');
        cursor = hit.end_index;
    }

    rendered.push_str(&text[cursor..]);
    rendered
}
