//! Auto-generated commit messages.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

const TITLE_MAX_CHARS: usize = 30;
const TITLE_CUT_CHARS: usize = 27;

/// Title shown in an auto message: the trimmed first line, cut to 27
/// characters plus `...` when longer than 30.
pub fn detect_title(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("").trim();
    if first_line.is_empty() {
        return "Untitled".to_string();
    }
    if first_line.chars().count() <= TITLE_MAX_CHARS {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(TITLE_CUT_CHARS).collect();
        format!("{}...", cut)
    }
}

/// `Jan 5, 03:07 PM` in the zone of `time`.
pub fn format_commit_time<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format("%b %-d, %I:%M %p").to_string()
}

/// `Update note "<title>" - <time>`.
pub fn auto_message<Tz>(content: &str, time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "Update note \"{}\" - {}",
        detect_title(content),
        format_commit_time(time)
    )
}
