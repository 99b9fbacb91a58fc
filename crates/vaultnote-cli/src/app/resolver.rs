//! Path resolution for config and store files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, read_config, StorageBackend, VaultnoteConfig};
use crate::constants::env_vars;
use crate::errors::CliError;

/// Resolve the config file path, checking VAULTNOTE_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env_vars::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config, letting `--store` override the configured store.
///
/// Without a config file, `--store` alone is enough: defaults apply and the
/// backend is inferred from the path.
pub fn load_config(cli: &Cli) -> anyhow::Result<VaultnoteConfig> {
    let config_path = resolve_config_path()?;

    if !config_path.exists() {
        return match cli.store.as_deref() {
            Some(store) => {
                let path = PathBuf::from(store);
                let backend = StorageBackend::infer(&path);
                Ok(VaultnoteConfig::new(path, backend))
            }
            None => Err(CliError::not_found(
                missing_config_message(&config_path),
                "Run `vaultnote init`, or pass --store /path/to/vault.db",
            )
            .into()),
        };
    }

    let mut config = read_config(&config_path)?;
    if let Some(store) = cli.store.as_deref() {
        let path = PathBuf::from(store);
        config.storage.backend = StorageBackend::infer(&path);
        config.storage.path = store.to_string();
    }
    Ok(config)
}

/// Error message when config file is missing.
pub fn missing_config_message(config_path: &Path) -> String {
    format!("No vault configured at {}", config_path.display())
}

/// Error message when the store file is missing.
pub fn missing_store_message(store_path: &Path) -> String {
    format!("No vault found at {}", store_path.display())
}
