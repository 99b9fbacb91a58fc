//! Output formatting helpers for the CLI.
//!
//! This module provides formatting utilities for displaying commits
//! and envelopes in various formats (JSON, table, plain text).

mod json;
mod text;

pub use json::{commit_json, print_json};
pub use text::{format_label, format_timestamp, format_word_diff, print_commit_log};
