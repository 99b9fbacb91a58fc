//! Word-level comparison of two note bodies.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    Unchanged,
    Added,
    Removed,
}

/// A run of text that was kept, added or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSpan {
    pub kind: DiffKind,
    pub text: String,
}

/// Word-level changes turning `old` into `new`.
///
/// Words and the whitespace between them are separate tokens; adjacent
/// tokens of the same kind are merged into one span. Either side being
/// empty yields no spans at all.
pub fn diff_words(old: &str, new: &str) -> Vec<DiffSpan> {
    if old.is_empty() || new.is_empty() {
        return Vec::new();
    }

    let diff = TextDiff::from_words(old, new);
    let mut spans: Vec<DiffSpan> = Vec::new();
    for change in diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => DiffKind::Unchanged,
            ChangeTag::Insert => DiffKind::Added,
            ChangeTag::Delete => DiffKind::Removed,
        };
        match spans.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(change.value()),
            _ => spans.push(DiffSpan {
                kind,
                text: change.value().to_string(),
            }),
        }
    }
    spans
}

/// Whether any span adds or removes text.
pub fn has_differences(spans: &[DiffSpan]) -> bool {
    spans.iter().any(|span| span.kind != DiffKind::Unchanged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side(spans: &[DiffSpan], skip: DiffKind) -> String {
        spans
            .iter()
            .filter(|span| span.kind != skip)
            .map(|span| span.text.as_str())
            .collect()
    }

    #[test]
    fn test_identical_text_is_one_unchanged_span() {
        let spans = diff_words("milk and eggs", "milk and eggs");
        assert_eq!(
            spans,
            vec![DiffSpan {
                kind: DiffKind::Unchanged,
                text: "milk and eggs".to_string(),
            }]
        );
        assert!(!has_differences(&spans));
    }

    #[test]
    fn test_replaced_word() {
        let spans = diff_words("the quick brown fox", "the slow brown fox");
        assert!(has_differences(&spans));
        assert!(spans
            .iter()
            .any(|s| s.kind == DiffKind::Removed && s.text.contains("quick")));
        assert!(spans
            .iter()
            .any(|s| s.kind == DiffKind::Added && s.text.contains("slow")));
        assert!(spans
            .iter()
            .all(|s| s.kind == DiffKind::Unchanged || !s.text.contains("brown")));
    }

    #[test]
    fn test_spans_rebuild_both_sides() {
        let old = "Shopping list\nmilk\neggs";
        let new = "Shopping list\noat milk\neggs\nbread";
        let spans = diff_words(old, new);
        assert_eq!(side(&spans, DiffKind::Added), old);
        assert_eq!(side(&spans, DiffKind::Removed), new);
    }

    #[test]
    fn test_adjacent_spans_never_share_a_kind() {
        let spans = diff_words("a b c d", "a x y d");
        for pair in spans.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
        }
    }

    #[test]
    fn test_empty_side_gives_no_diff() {
        assert!(diff_words("", "something").is_empty());
        assert!(diff_words("something", "").is_empty());
        assert!(diff_words("", "").is_empty());
    }
}
