//! Reading note bodies and envelopes.

use std::io::{self, IsTerminal, Read};

use dialoguer::Input;

use crate::errors::CliError;

/// Take `text` if given, otherwise stdin, otherwise a one-line prompt.
///
/// Trailing newlines from stdin are dropped; other whitespace is kept.
pub fn read_text(text: Option<String>, no_input: bool) -> anyhow::Result<String> {
    if let Some(value) = text {
        return Ok(value);
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        return Ok(strip_trailing_newlines(&buffer).to_string());
    }

    if no_input {
        return Err(
            CliError::invalid_input("--no-input requires --text or content on stdin").into(),
        );
    }

    Input::<String>::new()
        .with_prompt("Text")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read input: {}", e))
}

fn strip_trailing_newlines(text: &str) -> &str {
    text.trim_end_matches(['\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins() {
        let text = read_text(Some("  body  ".to_string()), true).expect("text");
        assert_eq!(text, "  body  ");
    }

    #[test]
    fn test_strip_trailing_newlines_only() {
        assert_eq!(strip_trailing_newlines("a\nb\r\n\n"), "a\nb");
        assert_eq!(strip_trailing_newlines("  indented  \n"), "  indented  ");
    }
}
