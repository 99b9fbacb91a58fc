use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vaultnote_core::crypto::passphrase::MIN_PASSPHRASE_LENGTH;
use vaultnote_core::history::RetentionPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultnoteConfig {
    pub storage: StorageSection,
    #[serde(default)]
    pub security: SecuritySection,
    #[serde(default)]
    pub history: HistorySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default)]
    pub backend: StorageBackend,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuritySection {
    pub min_passphrase_length: usize,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            min_passphrase_length: MIN_PASSPHRASE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySection {
    pub default_branch_limit: usize,
    pub branch_limit: usize,
}

impl Default for HistorySection {
    fn default() -> Self {
        let retention = RetentionPolicy::default();
        Self {
            default_branch_limit: retention.default_branch_limit,
            branch_limit: retention.branch_limit,
        }
    }
}

impl HistorySection {
    pub fn retention(&self) -> RetentionPolicy {
        RetentionPolicy {
            default_branch_limit: self.default_branch_limit,
            branch_limit: self.branch_limit,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
}

impl StorageBackend {
    /// `json` for `*.json` paths, SQLite otherwise.
    pub fn infer(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => StorageBackend::Json,
            _ => StorageBackend::Sqlite,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Json => "json",
        }
    }
}

impl VaultnoteConfig {
    pub fn new(store_path: PathBuf, backend: StorageBackend) -> Self {
        Self {
            storage: StorageSection {
                backend,
                path: store_path.to_string_lossy().to_string(),
            },
            security: SecuritySection::default(),
            history: HistorySection::default(),
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path(backend: StorageBackend) -> anyhow::Result<PathBuf> {
    let filename = match backend {
        StorageBackend::Sqlite => "vaultnote.db",
        StorageBackend::Json => "vaultnote.json",
    };
    Ok(xdg_data_dir()?.join(filename))
}

pub fn read_config(path: &Path) -> anyhow::Result<VaultnoteConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &VaultnoteConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    vaultnote_core::fs::write_atomic(path, contents.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("vaultnote"));
        }
    }
    Ok(home_dir()?.join(".config").join("vaultnote"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("vaultnote"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("vaultnote"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [storage]
            backend = "json"
            path = "/tmp/vaultnote.json"

            [security]
            min_passphrase_length = 12

            [history]
            default_branch_limit = 20
            branch_limit = 10
        "#;
        let config: VaultnoteConfig = toml::from_str(toml).expect("parse config");
        assert_eq!(config.storage.backend, StorageBackend::Json);
        assert_eq!(config.storage.path, "/tmp/vaultnote.json");
        assert_eq!(config.security.min_passphrase_length, 12);
        assert_eq!(
            config.history.retention(),
            RetentionPolicy {
                default_branch_limit: 20,
                branch_limit: 10,
            }
        );
    }

    #[test]
    fn test_optional_sections_default() {
        let toml = r#"
            [storage]
            path = "/tmp/vaultnote.db"
        "#;
        let config: VaultnoteConfig = toml::from_str(toml).expect("parse config");
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.security.min_passphrase_length, MIN_PASSPHRASE_LENGTH);
        assert_eq!(config.history.retention(), RetentionPolicy::default());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let config = VaultnoteConfig::new(dir.path().join("v.db"), StorageBackend::Sqlite);

        write_config(&path, &config).expect("write config");
        let read = read_config(&path).expect("read config");
        assert_eq!(read.storage.path, config.storage.path);
        assert_eq!(read.history.default_branch_limit, 100);
    }

    #[test]
    fn test_backend_inferred_from_extension() {
        assert_eq!(
            StorageBackend::infer(Path::new("/tmp/notes.JSON")),
            StorageBackend::Json
        );
        assert_eq!(
            StorageBackend::infer(Path::new("/tmp/notes.db")),
            StorageBackend::Sqlite
        );
        assert_eq!(
            StorageBackend::infer(Path::new("/tmp/notes")),
            StorageBackend::Sqlite
        );
    }

    #[test]
    fn test_xdg_paths_use_env() {
        let _guard = ENV_LOCK.lock().expect("env lock");
        std::env::set_var("XDG_CONFIG_HOME", "/tmp/vaultnote-config-test");
        std::env::set_var("XDG_DATA_HOME", "/tmp/vaultnote-data-test");

        let config_dir = xdg_config_dir().expect("config dir");
        let data_dir = xdg_data_dir().expect("data dir");

        assert_eq!(
            config_dir,
            PathBuf::from("/tmp/vaultnote-config-test").join("vaultnote")
        );
        assert_eq!(
            data_dir,
            PathBuf::from("/tmp/vaultnote-data-test").join("vaultnote")
        );
        assert_eq!(
            default_store_path(StorageBackend::Sqlite).expect("store path"),
            PathBuf::from("/tmp/vaultnote-data-test")
                .join("vaultnote")
                .join("vaultnote.db")
        );
    }
}
