//! Durable and session-scoped key-value storage.
//!
//! The core reads and writes everything through [`KeyValueStore`]. Three
//! backends ship with it:
//! - [`MemoryStore`]: process-lifetime storage (session scope, tests)
//! - [`JsonFileStore`]: one JSON object in one file
//! - [`SqliteStore`]: a `kv` table in a SQLite database

pub mod json_file;
pub mod memory;
pub mod sqlite;
pub mod traits;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::KeyValueStore;
