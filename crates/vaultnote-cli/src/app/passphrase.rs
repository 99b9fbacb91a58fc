//! Passphrase handling and unlock with retry logic.

use std::io::IsTerminal;

use dialoguer::Password;
use vaultnote_core::crypto::validate_passphrase;
use vaultnote_core::{KeyHolder, VaultError};

use crate::constants::{env_vars, MAX_PASSPHRASE_ATTEMPTS};
use crate::errors::CliError;

use super::vault::Vault;

fn env_passphrase() -> Option<String> {
    std::env::var(env_vars::PASSPHRASE)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Read a passphrase from VAULTNOTE_PASSPHRASE, or prompt for one.
pub fn read_passphrase(no_input: bool) -> anyhow::Result<String> {
    if let Some(passphrase) = env_passphrase() {
        return Ok(passphrase);
    }
    prompt_passphrase(is_interactive(no_input))
}

fn prompt_passphrase(interactive: bool) -> anyhow::Result<String> {
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No passphrase provided and no TTY available. Set {}.",
            env_vars::PASSPHRASE
        ))
        .into());
    }
    Password::new()
        .with_prompt("Passphrase")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

/// Choose a passphrase for a new vault, with confirmation when prompting.
pub fn prompt_new_passphrase(no_input: bool, min_length: usize) -> anyhow::Result<String> {
    let passphrase = match env_passphrase() {
        Some(passphrase) => passphrase,
        None if is_interactive(no_input) => Password::new()
            .with_prompt("Choose a passphrase")
            .with_confirmation("Confirm passphrase", "Passphrases do not match")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))?,
        None => return prompt_passphrase(false),
    };

    validate_passphrase(&passphrase, min_length)
        .map_err(|e| CliError::invalid_input(e.to_string()))?;
    Ok(passphrase)
}

/// Unlock `holder` against the vault's passphrase check.
///
/// VAULTNOTE_PASSPHRASE gets a single attempt. Prompting allows
/// [`MAX_PASSPHRASE_ATTEMPTS`] on a TTY and one otherwise.
pub fn unlock(
    vault: &Vault,
    holder: &mut KeyHolder,
    no_input: bool,
    remember: bool,
    quiet: bool,
) -> anyhow::Result<()> {
    let check = vault.passphrase_check()?.ok_or_else(|| {
        CliError::not_found(
            format!("Vault at {} has no passphrase set", vault.path().display()),
            "Run `vaultnote init` to protect it",
        )
    })?;

    if let Some(passphrase) = env_passphrase() {
        return match holder.unlock_with(&check, &passphrase, remember) {
            Ok(_) => Ok(()),
            Err(VaultError::DecryptionFailed) => Err(CliError::auth_failed_with_hint(
                "Incorrect passphrase.",
                format!("Check the value of {}", env_vars::PASSPHRASE),
            )
            .into()),
            Err(e) => Err(e.into()),
        };
    }

    let interactive = is_interactive(no_input);
    let max_attempts = if interactive { MAX_PASSPHRASE_ATTEMPTS } else { 1 };
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let passphrase = prompt_passphrase(interactive)?;
        match holder.unlock_with(&check, &passphrase, remember) {
            Ok(_) => return Ok(()),
            Err(VaultError::DecryptionFailed) | Err(VaultError::EmptyPassphrase) => {
                let remaining = max_attempts.saturating_sub(attempts);
                tracing::debug!(attempts, remaining, "Passphrase rejected");
                if remaining == 0 {
                    let err = if max_attempts > 1 {
                        CliError::auth_failed_with_hint(
                            "Too many failed passphrase attempts.",
                            "A forgotten passphrase cannot be recovered; notes stay encrypted.",
                        )
                    } else {
                        CliError::auth_failed("Incorrect passphrase.")
                    };
                    return Err(err.into());
                }
                if !quiet {
                    eprintln!(
                        "Incorrect passphrase. {} attempt{} remaining.",
                        remaining,
                        if remaining == 1 { "" } else { "s" }
                    );
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn is_interactive(no_input: bool) -> bool {
    !no_input && std::io::stdin().is_terminal()
}
