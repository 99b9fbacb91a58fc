//! # VaultNote Core
//!
//! Core library for VaultNote - client-side encrypted notes with a
//! per-note commit history.
//!
//! This crate holds the passphrase session, the envelope codec and the
//! version store, independent of any user interface.
//!
//! ## Architecture
//!
//! - **session**: Session key holder and remembered-device marker
//! - **codec**: Envelope encryption and the ordered decryption strategies
//! - **crypto**: Key derivation, AES primitives, passphrase policy
//! - **history**: Per-note, per-branch commit log with retention caps
//! - **storage**: Key-value store trait and backends (memory, JSON file, SQLite)

pub mod codec;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod history;
pub mod session;
pub mod storage;

pub use codec::{decrypt, encrypt, is_correct_passphrase, Decrypted, EnvelopeFormat};
pub use error::{Result, VaultError};
pub use history::{CommitView, VersionStore};
pub use session::{KeyHolder, LockState, SessionKey};
pub use storage::KeyValueStore;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
