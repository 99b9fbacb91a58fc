//! Session key holder.
//!
//! The holder owns two independent pieces of state:
//!
//! - the **session credential**: the passphrase itself, held in memory and
//!   mirrored to a session-scoped store under
//!   [`SESSION_MARKER_KEY`] so a restarted view within the same session can
//!   pick it up again;
//! - the **remembered-device marker**: an opaque `{deviceId, timestamp}`
//!   record in the durable store under [`REMEMBER_MARKER_KEY`]. It is a UI
//!   hint that a passphrase is expected here and can never reconstruct the
//!   key.
//!
//! The two are joined by one policy: [`KeyHolder::clear_key`] also removes
//! the remembered-device marker. Locking therefore forgets the device.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::codec::is_correct_passphrase;
use crate::error::{Result, VaultError};
use crate::storage::KeyValueStore;

/// Session-scoped store key holding `{key, timestamp}`.
pub const SESSION_MARKER_KEY: &str = "vaultnote-encryption-status";

/// Durable store key holding `{deviceId, timestamp}`.
pub const REMEMBER_MARKER_KEY: &str = "vaultnote-encryption-remember";

/// The passphrase active for the current session.
pub struct SessionKey(SecretString);

impl SessionKey {
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for SessionKey {
    fn from(value: String) -> Self {
        Self(SecretString::from(value))
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey([REDACTED])")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Locked,
    Unlocked,
}

/// Environment fields hashed into a device id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFingerprint {
    pub user_agent: String,
    pub locale: String,
    pub display_width: u32,
}

impl DeviceFingerprint {
    /// Fingerprint of the running process: build/platform string, `LANG`,
    /// and `COLUMNS` (80 when unset).
    pub fn from_env() -> Self {
        let user_agent = format!(
            "vaultnote/{} ({}; {})",
            crate::VERSION,
            std::env::consts::OS,
            std::env::consts::ARCH
        );
        let locale = std::env::var("LANG")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "en-US".to_string());
        let display_width = std::env::var("COLUMNS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|width| *width > 0)
            .unwrap_or(80);

        Self {
            user_agent,
            locale,
            display_width,
        }
    }

    /// Lowercase hex SHA-256 of the concatenated fields.
    pub fn device_id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.user_agent.as_bytes());
        hasher.update(self.locale.as_bytes());
        hasher.update(self.display_width.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Persisted remembered-device marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMarker {
    pub device_id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

#[derive(Serialize)]
struct SessionMarkerOut<'a> {
    key: &'a str,
    timestamp: i64,
}

#[derive(Deserialize)]
struct SessionMarkerIn {
    #[serde(default)]
    key: String,
}

/// Holds the session key and governs the Locked/Unlocked state.
pub struct KeyHolder {
    session_store: Arc<dyn KeyValueStore>,
    durable_store: Arc<dyn KeyValueStore>,
    fingerprint: DeviceFingerprint,
    key: Option<SessionKey>,
}

impl KeyHolder {
    /// A holder in the Locked state. Nothing is read from either store.
    pub fn new(
        session_store: Arc<dyn KeyValueStore>,
        durable_store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            session_store,
            durable_store,
            fingerprint: DeviceFingerprint::from_env(),
            key: None,
        }
    }

    /// Like [`KeyHolder::new`], then adopts a key left in the session
    /// store by an earlier holder. Stays Locked if there is none or the
    /// marker is unreadable.
    pub fn restore(
        session_store: Arc<dyn KeyValueStore>,
        durable_store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let mut holder = Self::new(session_store, durable_store);
        holder.key = holder.read_session_marker();
        if holder.key.is_some() {
            tracing::debug!("Session key restored from session store");
        }
        holder
    }

    pub fn with_fingerprint(mut self, fingerprint: DeviceFingerprint) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    pub fn state(&self) -> LockState {
        if self.key.is_some() {
            LockState::Unlocked
        } else {
            LockState::Locked
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.state() == LockState::Unlocked
    }

    pub fn key(&self) -> Option<&SessionKey> {
        self.key.as_ref()
    }

    /// Adopt `passphrase` as the session key and move to Unlocked.
    ///
    /// With `remember`, also writes the remembered-device marker. Marker
    /// writes are best effort: a storage failure is logged and the holder
    /// still unlocks.
    ///
    /// # Errors
    ///
    /// [`VaultError::EmptyPassphrase`] if `passphrase` is empty; the state
    /// is left unchanged.
    pub fn set_key(&mut self, passphrase: &str, remember: bool) -> Result<&SessionKey> {
        if passphrase.is_empty() {
            return Err(VaultError::EmptyPassphrase);
        }

        let now = chrono::Utc::now().timestamp_millis();
        self.write_session_marker(passphrase, now);
        if remember {
            self.write_device_marker(now);
        }

        tracing::debug!(remember, "Session key set");
        Ok(self.key.insert(SessionKey::from(passphrase.to_string())))
    }

    /// Discard the session key and move to Locked.
    ///
    /// If a remembered-device marker exists it is removed as well, so a
    /// manual lock also forgets this device.
    pub fn clear_key(&mut self) {
        self.drop_session_key();

        match self.durable_store.contains(REMEMBER_MARKER_KEY) {
            Ok(true) => {
                if let Err(e) = self.durable_store.remove(REMEMBER_MARKER_KEY) {
                    tracing::warn!(error = %e, "Failed to remove remembered-device marker");
                } else {
                    tracing::debug!("Remembered-device marker removed");
                }
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to read remembered-device marker"),
        }
    }

    /// Whether a remembered-device marker is persisted. Says nothing about
    /// whether a key is available.
    pub fn has_remembered_device(&self) -> bool {
        match self.durable_store.contains(REMEMBER_MARKER_KEY) {
            Ok(present) => present,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read remembered-device marker");
                false
            }
        }
    }

    /// The persisted marker, if present and well formed.
    pub fn remembered_device(&self) -> Option<DeviceMarker> {
        let raw = self.durable_store.get(REMEMBER_MARKER_KEY).ok()??;
        match serde_json::from_str(&raw) {
            Ok(marker) => Some(marker),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed remembered-device marker");
                None
            }
        }
    }

    /// Whether the persisted marker was written by this device.
    pub fn is_remembered_here(&self) -> bool {
        self.remembered_device()
            .is_some_and(|marker| marker.device_id == self.fingerprint.device_id())
    }

    /// Verify `passphrase` against `envelope`, then [`set_key`](Self::set_key).
    ///
    /// A failed attempt drops any held session key so the holder is never
    /// left half unlocked. The remembered-device marker is kept.
    ///
    /// # Errors
    ///
    /// - [`VaultError::EmptyPassphrase`] if `passphrase` is empty
    /// - [`VaultError::DecryptionFailed`] if the passphrase does not open
    ///   `envelope`
    pub fn unlock_with(
        &mut self,
        envelope: &str,
        passphrase: &str,
        remember: bool,
    ) -> Result<&SessionKey> {
        if passphrase.is_empty() {
            self.drop_session_key();
            return Err(VaultError::EmptyPassphrase);
        }
        if !is_correct_passphrase(envelope, passphrase) {
            tracing::debug!("Unlock rejected");
            self.drop_session_key();
            return Err(VaultError::DecryptionFailed);
        }
        self.set_key(passphrase, remember)
    }

    fn drop_session_key(&mut self) {
        self.key = None;
        if let Err(e) = self.session_store.remove(SESSION_MARKER_KEY) {
            tracing::warn!(error = %e, "Failed to remove session marker");
        }
    }

    fn read_session_marker(&self) -> Option<SessionKey> {
        let raw = match self.session_store.get(SESSION_MARKER_KEY) {
            Ok(Some(raw)) => Zeroizing::new(raw),
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session marker");
                return None;
            }
        };
        match serde_json::from_str::<SessionMarkerIn>(&raw) {
            Ok(marker) if !marker.key.is_empty() => Some(SessionKey::from(marker.key)),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed session marker");
                None
            }
        }
    }

    fn write_session_marker(&self, passphrase: &str, timestamp: i64) {
        let marker = SessionMarkerOut {
            key: passphrase,
            timestamp,
        };
        let result = serde_json::to_string(&marker)
            .map(Zeroizing::new)
            .map_err(VaultError::from)
            .and_then(|raw| self.session_store.set(SESSION_MARKER_KEY, &raw));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write session marker");
        }
    }

    fn write_device_marker(&self, timestamp: i64) {
        let marker = DeviceMarker {
            device_id: self.fingerprint.device_id(),
            timestamp,
        };
        let result = serde_json::to_string(&marker)
            .map_err(VaultError::from)
            .and_then(|raw| self.durable_store.set(REMEMBER_MARKER_KEY, &raw));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write remembered-device marker");
        }
    }
}

impl std::fmt::Debug for KeyHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyHolder")
            .field("state", &self.state())
            .field("fingerprint", &self.fingerprint)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encrypt;
    use crate::storage::MemoryStore;

    fn stores() -> (Arc<MemoryStore>, Arc<MemoryStore>) {
        (Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    fn holder(session: &Arc<MemoryStore>, durable: &Arc<MemoryStore>) -> KeyHolder {
        KeyHolder::new(session.clone(), durable.clone()).with_fingerprint(DeviceFingerprint {
            user_agent: "test-agent".to_string(),
            locale: "en-US".to_string(),
            display_width: 1280,
        })
    }

    #[test]
    fn test_starts_locked() {
        let (session, durable) = stores();
        let holder = holder(&session, &durable);
        assert_eq!(holder.state(), LockState::Locked);
        assert!(holder.key().is_none());
        assert!(!holder.has_remembered_device());
    }

    #[test]
    fn test_set_key_unlocks_without_remember() {
        let (session, durable) = stores();
        let mut holder = holder(&session, &durable);

        let key = holder.set_key("hunter2-but-longer", false).unwrap();
        assert_eq!(key.expose(), "hunter2-but-longer");
        assert!(holder.is_unlocked());
        assert!(session.get(SESSION_MARKER_KEY).unwrap().is_some());
        assert!(!holder.has_remembered_device());
    }

    #[test]
    fn test_set_key_rejects_empty() {
        let (session, durable) = stores();
        let mut holder = holder(&session, &durable);
        assert!(matches!(
            holder.set_key("", true),
            Err(VaultError::EmptyPassphrase)
        ));
        assert_eq!(holder.state(), LockState::Locked);
        assert!(!holder.has_remembered_device());
    }

    #[test]
    fn test_remember_writes_marker_without_key() {
        let (session, durable) = stores();
        let mut holder = holder(&session, &durable);
        holder.set_key("super-secret-pass", true).unwrap();

        let raw = durable.get(REMEMBER_MARKER_KEY).unwrap().unwrap();
        assert!(!raw.contains("super-secret-pass"));
        assert!(raw.contains("deviceId"));

        let marker = holder.remembered_device().unwrap();
        assert_eq!(marker.device_id.len(), 64);
        assert!(marker.timestamp > 0);
        assert!(holder.is_remembered_here());
    }

    #[test]
    fn test_clear_key_also_forgets_device() {
        let (session, durable) = stores();
        let mut holder = holder(&session, &durable);
        holder.set_key("super-secret-pass", true).unwrap();

        holder.clear_key();
        assert_eq!(holder.state(), LockState::Locked);
        assert!(session.get(SESSION_MARKER_KEY).unwrap().is_none());
        assert!(!holder.has_remembered_device());
    }

    #[test]
    fn test_clear_key_when_locked_is_harmless() {
        let (session, durable) = stores();
        let mut holder = holder(&session, &durable);
        holder.clear_key();
        assert_eq!(holder.state(), LockState::Locked);
    }

    #[test]
    fn test_restore_adopts_session_marker() {
        let (session, durable) = stores();
        holder(&session, &durable)
            .set_key("carried-over", false)
            .unwrap();

        let restored = KeyHolder::restore(session.clone(), durable.clone());
        assert!(restored.is_unlocked());
        assert_eq!(restored.key().unwrap().expose(), "carried-over");
    }

    #[test]
    fn test_restore_ignores_malformed_marker() {
        let (session, durable) = stores();
        session.set(SESSION_MARKER_KEY, "{not json").unwrap();
        let restored = KeyHolder::restore(session.clone(), durable.clone());
        assert_eq!(restored.state(), LockState::Locked);

        session
            .set(SESSION_MARKER_KEY, r#"{"key":"","timestamp":1}"#)
            .unwrap();
        let restored = KeyHolder::restore(session.clone(), durable.clone());
        assert_eq!(restored.state(), LockState::Locked);
    }

    #[test]
    fn test_unlock_with_verifies_first() {
        let (session, durable) = stores();
        let mut holder = holder(&session, &durable);
        let envelope = encrypt("canary", "right-passphrase").unwrap();

        holder
            .unlock_with(&envelope, "right-passphrase", true)
            .unwrap();
        assert!(holder.is_unlocked());
        assert!(holder.has_remembered_device());
    }

    #[test]
    fn test_failed_unlock_clears_held_key() {
        let (session, durable) = stores();
        let mut holder = holder(&session, &durable);
        let envelope = encrypt("canary", "right-passphrase").unwrap();
        holder.set_key("right-passphrase", true).unwrap();

        let result = holder.unlock_with(&envelope, "wrong-passphrase", false);
        assert!(matches!(result, Err(VaultError::DecryptionFailed)));
        assert_eq!(holder.state(), LockState::Locked);
        assert!(session.get(SESSION_MARKER_KEY).unwrap().is_none());
        // a typo does not forget the device
        assert!(holder.has_remembered_device());
    }

    #[test]
    fn test_device_id_is_stable_and_field_sensitive() {
        let a = DeviceFingerprint {
            user_agent: "ua".to_string(),
            locale: "de-DE".to_string(),
            display_width: 1920,
        };
        let mut b = a.clone();
        assert_eq!(a.device_id(), b.device_id());

        b.display_width = 1280;
        assert_ne!(a.device_id(), b.device_id());
    }

    #[test]
    fn test_session_key_debug_is_redacted() {
        let key = SessionKey::from("do-not-print".to_string());
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains("do-not-print"));
    }
}
