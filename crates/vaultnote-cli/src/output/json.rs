//! JSON output formatting.

use serde::Serialize;
use vaultnote_core::history::Commit;

/// Convert a stored commit to JSON, with the decrypted body when available.
pub fn commit_json(
    note_id: &str,
    commit: &Commit,
    plaintext: Option<&str>,
    verified: Option<bool>,
) -> serde_json::Value {
    let mut value = serde_json::json!({
        "note": note_id,
        "hash": commit.hash,
        "timestamp": commit.timestamp,
        "message": commit.message,
        "parent": commit.parent,
        "content": commit.content,
    });
    if let Some(text) = plaintext {
        value["plaintext"] = serde_json::Value::String(text.to_string());
    }
    if let Some(verified) = verified {
        value["verified"] = serde_json::Value::Bool(verified);
    }
    value
}

/// Pretty-print any serializable value to stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
