//! Text output formatting for commit logs and envelopes.

use chrono::{DateTime, Local};
use vaultnote_core::codec::STRATEGIES;
use vaultnote_core::history::{DiffKind, DiffSpan};
use vaultnote_core::{CommitView, EnvelopeFormat};

use crate::ui::theme::{styled, styles};
use crate::ui::{table, Column, OutputMode, UiContext};

/// Render a stored ISO-8601 timestamp in local time, or as-is if unparseable.
pub fn format_timestamp(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| timestamp.to_string())
}

/// Name of the decryption strategy that produced `format`.
pub fn format_label(format: EnvelopeFormat) -> &'static str {
    STRATEGIES
        .iter()
        .find(|strategy| strategy.format == format)
        .map(|strategy| strategy.name)
        .unwrap_or("empty")
}

/// Print commits newest first.
pub fn print_commit_log(ctx: &UiContext, commits: &[CommitView]) {
    let rows: Vec<Vec<String>> = commits
        .iter()
        .map(|commit| {
            let marker = match (commit.is_current, ctx.mode) {
                (true, OutputMode::Pretty) => styled("HEAD", styles::green(), ctx.color),
                (true, _) => "HEAD".to_string(),
                (false, _) => String::new(),
            };
            vec![
                commit.hash.clone(),
                format_timestamp(&commit.timestamp),
                commit.message.clone(),
                marker,
            ]
        })
        .collect();

    let columns = [
        Column::new("Hash"),
        Column::new("When"),
        Column::new("Message"),
        Column::new(""),
    ];
    println!("{}", table(ctx, &columns, &rows));
}

/// Inline word diff in `git diff --word-diff=plain` notation, colored when
/// the terminal allows.
pub fn format_word_diff(ctx: &UiContext, spans: &[DiffSpan]) -> String {
    spans
        .iter()
        .map(|span| match span.kind {
            DiffKind::Unchanged => span.text.clone(),
            DiffKind::Added => styled(&format!("{{+{}+}}", span.text), styles::green(), ctx.color),
            DiffKind::Removed => styled(&format!("[-{}-]", span.text), styles::red(), ctx.color),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_fallback() {
        assert_eq!(format_timestamp("not a date"), "not a date");
        assert_eq!(format_timestamp("2024-01-05T15:07:00.000Z").len(), 16);
    }

    #[test]
    fn test_format_word_diff_marks_changes() {
        let ctx = UiContext {
            color: false,
            unicode: false,
            width: 80,
            mode: OutputMode::Plain,
        };
        let spans = vec![
            DiffSpan {
                kind: DiffKind::Unchanged,
                text: "buy ".to_string(),
            },
            DiffSpan {
                kind: DiffKind::Removed,
                text: "milk".to_string(),
            },
            DiffSpan {
                kind: DiffKind::Added,
                text: "oat milk".to_string(),
            },
        ];
        assert_eq!(format_word_diff(&ctx, &spans), "buy [-milk-]{+oat milk+}");
    }

    #[test]
    fn test_format_label() {
        assert_eq!(format_label(EnvelopeFormat::Salted), "salted-pbkdf2");
        assert_eq!(format_label(EnvelopeFormat::Base64Plain), "base64-plaintext");
        assert_eq!(format_label(EnvelopeFormat::Empty), "empty");
    }
}
