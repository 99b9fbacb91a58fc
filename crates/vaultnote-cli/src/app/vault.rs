//! The opened vault: durable store, session store and settings.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use vaultnote_core::storage::{JsonFileStore, KeyValueStore, MemoryStore, SqliteStore};
use vaultnote_core::{encrypt, KeyHolder, VersionStore};

use crate::config::{StorageBackend, VaultnoteConfig};
use crate::constants::{PASSPHRASE_CHECK_KEY, PASSPHRASE_CHECK_TEXT};
use crate::errors::CliError;

use super::resolver::missing_store_message;

pub struct Vault {
    durable: Arc<dyn KeyValueStore>,
    /// Lives as long as the process: every invocation is its own session.
    session: Arc<dyn KeyValueStore>,
    config: VaultnoteConfig,
    path: PathBuf,
}

impl Vault {
    /// Open an existing store.
    pub fn open(config: VaultnoteConfig) -> anyhow::Result<Self> {
        let path = PathBuf::from(&config.storage.path);
        if !path.exists() {
            return Err(CliError::not_found(
                missing_store_message(&path),
                "Run `vaultnote init` to create it",
            )
            .into());
        }
        Self::with_backend(config, path)
    }

    /// Create (or reopen) the store and seal a passphrase check into it.
    pub fn create(config: VaultnoteConfig, passphrase: &str) -> anyhow::Result<Self> {
        let path = PathBuf::from(&config.storage.path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
                })?;
            }
        }
        let vault = Self::with_backend(config, path)?;
        let check = encrypt(PASSPHRASE_CHECK_TEXT, passphrase)?;
        vault.durable.set(PASSPHRASE_CHECK_KEY, &check)?;
        tracing::debug!(path = %vault.path.display(), "Passphrase check written");
        Ok(vault)
    }

    fn with_backend(config: VaultnoteConfig, path: PathBuf) -> anyhow::Result<Self> {
        let durable: Arc<dyn KeyValueStore> = match config.storage.backend {
            StorageBackend::Sqlite => Arc::new(SqliteStore::open(&path)?),
            StorageBackend::Json => Arc::new(JsonFileStore::open(&path)),
        };
        tracing::debug!(
            backend = config.storage.backend.label(),
            path = %path.display(),
            "Vault opened"
        );
        Ok(Self {
            durable,
            session: Arc::new(MemoryStore::new()),
            config,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &VaultnoteConfig {
        &self.config
    }

    pub fn backend(&self) -> StorageBackend {
        self.config.storage.backend
    }

    /// Version store using the configured retention caps.
    pub fn versions(&self) -> VersionStore {
        VersionStore::open(self.durable.clone()).with_retention(self.config.history.retention())
    }

    pub fn key_holder(&self) -> KeyHolder {
        KeyHolder::restore(self.session.clone(), self.durable.clone())
    }

    /// When the durable store was last written.
    pub fn last_write(&self) -> anyhow::Result<Option<chrono::DateTime<chrono::Utc>>> {
        Ok(self.durable.last_write()?)
    }

    /// The envelope `init` sealed with the vault passphrase.
    pub fn passphrase_check(&self) -> anyhow::Result<Option<String>> {
        Ok(self.durable.get(PASSPHRASE_CHECK_KEY)?)
    }
}
