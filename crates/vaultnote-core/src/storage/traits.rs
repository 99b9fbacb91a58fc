//! Key-value store trait definition.
//!
//! The `KeyValueStore` trait is the only persistence interface the core
//! consumes. The version store and the key holder share one durable store
//! through fixed string keys; the key holder also uses a second,
//! session-scoped store for the ephemeral credential.

use chrono::{DateTime, Utc};

use crate::error::Result;

/// String-keyed, string-valued persistence.
///
/// All implementations must ensure:
/// - `set` replaces any previous value under the key (last write wins)
/// - `remove` of a missing key is not an error
/// - methods take `&self`, so one store can be shared between components
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key` if present.
    fn remove(&self, key: &str) -> Result<()>;

    /// Whether a value is stored under `key`.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// When anything was last written, if the backend keeps track.
    fn last_write(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(None)
    }
}
