//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, vault, commit, etc.)
    NotFound { message: String, hint: String },

    /// Authentication failed (wrong passphrase, too many attempts)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\nHint: {}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\nHint: {}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and optional hint.
    pub fn auth_failed(message: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: None,
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Message and hint, for rendering.
    pub fn parts(&self) -> (&str, Option<&str>) {
        match self {
            CliError::NotFound { message, hint } => (message, Some(hint)),
            CliError::AuthFailed { message, hint } => (message, hint.as_deref()),
            CliError::InvalidInput(message) => (message, None),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use super::constants::exit_codes;
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for any error that reached `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CliError>())
        .map(CliError::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::exit_codes;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            CliError::not_found("Missing", "run init").exit_code(),
            exit_codes::NOT_FOUND
        );
        assert_eq!(
            CliError::auth_failed("Incorrect passphrase.").exit_code(),
            exit_codes::AUTH_FAILED
        );
        assert_eq!(
            CliError::invalid_input("bad").exit_code(),
            exit_codes::INVALID_INPUT
        );
    }

    #[test]
    fn test_exit_code_through_anyhow_context() {
        let err = anyhow::Error::new(CliError::auth_failed("nope")).context("while unlocking");
        assert_eq!(exit_code_for(&err), exit_codes::AUTH_FAILED);
        assert_eq!(exit_code_for(&anyhow::anyhow!("plain")), 1);
    }

    #[test]
    fn test_parts_split_hint() {
        let err = CliError::not_found("No vault", "Run `vaultnote init`");
        assert_eq!(err.parts(), ("No vault", Some("Run `vaultnote init`")));
        assert_eq!(CliError::invalid_input("bad").parts(), ("bad", None));
    }

    #[test]
    fn test_display_includes_hint() {
        let err = CliError::auth_failed_with_hint("Too many attempts.", "check caps lock");
        assert_eq!(err.to_string(), "Too many attempts.\nHint: check caps lock");
    }
}
