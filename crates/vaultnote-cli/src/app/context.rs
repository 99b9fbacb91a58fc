//! Application context for the VaultNote CLI.
//!
//! Bundles the parsed CLI arguments with the helpers every handler needs.

use vaultnote_core::KeyHolder;

use crate::cli::Cli;
use crate::ui::UiContext;

use super::passphrase::unlock;
use super::resolver::load_config;
use super::vault::Vault;

/// Application context that bundles CLI args with vault access.
pub struct AppContext<'a> {
    cli: &'a Cli,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self { cli }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color)
    }

    /// Open the configured vault. The store must already exist.
    pub fn open_vault(&self) -> anyhow::Result<Vault> {
        let config = load_config(self.cli)?;
        Vault::open(config)
    }

    /// Open the vault and unlock a key holder for it.
    pub fn unlocked(&self, no_input: bool) -> anyhow::Result<(Vault, KeyHolder)> {
        let vault = self.open_vault()?;
        let mut holder = vault.key_holder();
        unlock(&vault, &mut holder, no_input, false, self.quiet())?;
        Ok((vault, holder))
    }
}
