//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, vault, note, commit, branch).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong passphrase, too many attempts).
    pub const AUTH_FAILED: i32 = 5;
}

/// Environment variables read by the CLI.
pub mod env_vars {
    pub const PASSPHRASE: &str = "VAULTNOTE_PASSPHRASE";
    pub const CONFIG: &str = "VAULTNOTE_CONFIG";
    pub const LOG: &str = "VAULTNOTE_LOG";
}

/// Durable store key for the passphrase check envelope written by `init`.
pub const PASSPHRASE_CHECK_KEY: &str = "vaultnote-passphrase-check";

/// Plaintext sealed into the passphrase check envelope.
pub const PASSPHRASE_CHECK_TEXT: &str = "vaultnote passphrase check";

/// Prompt attempts before giving up on an interactive unlock.
pub const MAX_PASSPHRASE_ATTEMPTS: u32 = 3;
