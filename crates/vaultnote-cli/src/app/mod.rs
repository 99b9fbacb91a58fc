//! Application-level utilities for the VaultNote CLI.
//!
//! This module provides:
//! - Path resolution for config and store files
//! - The opened vault (durable store, session store, config)
//! - Passphrase prompting with retry logic
//! - Reading note bodies and envelopes from flags or stdin

mod context;
mod input;
mod passphrase;
mod resolver;
mod vault;

pub use context::AppContext;
pub use input::read_text;
pub use passphrase::{prompt_new_passphrase, read_passphrase, unlock};
pub use resolver::resolve_config_path;
pub use vault::Vault;
