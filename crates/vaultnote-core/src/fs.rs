//! Filesystem helpers for crash-safe writes of store files.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, VaultError};

/// Write `data` to `path` through a sibling temp file and an atomic rename.
///
/// Readers never observe a half-written store file: they either see the
/// previous contents or the new ones.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| VaultError::Storage("Invalid store path".to_string()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)?;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| VaultError::Storage(format!("System time error: {}", e)))?
        .as_nanos();
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| VaultError::Storage("Invalid store filename".to_string()))?;
    let temp_path = parent.join(format!(".{}.{}.tmp", filename, nanos));

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(|e| VaultError::Storage(format!("Temp file create failed: {}", e)))?;
    file.write_all(data)
        .map_err(|e| VaultError::Storage(format!("Temp file write failed: {}", e)))?;
    file.sync_all()
        .map_err(|e| VaultError::Storage(format!("Temp file sync failed: {}", e)))?;
    drop(file);

    rename_with_fallback(&temp_path, path)
        .map_err(|e| VaultError::Storage(format!("Atomic rename failed: {}", e)))
}

/// Rename `temp_path` onto `destination`, replacing it when the platform
/// refuses to rename over an existing file.
///
/// The temp file is removed if the rename ultimately fails.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "initial: {}, retry: {}",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}
