//! Envelope shapes and a diagnostic inspector.

use serde::{Deserialize, Serialize};

/// Structured envelope written by current releases.
///
/// `salt` is the hex rendering of 16 random bytes; `data` is an OpenSSL
/// salted container keyed by the hex of the PBKDF2-derived key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaltedEnvelope {
    pub salt: String,
    pub data: String,
}

impl SaltedEnvelope {
    /// Parse `text` as a salted envelope.
    ///
    /// Valid JSON without a non-empty `salt` and `data` is not a salted
    /// envelope.
    pub fn parse(text: &str) -> Option<Self> {
        let envelope: SaltedEnvelope = serde_json::from_str(text).ok()?;
        if envelope.salt.is_empty() || envelope.data.is_empty() {
            return None;
        }
        Some(envelope)
    }

    pub fn to_wire(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// The persisted representation of one note body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// Sentinel for an empty note body
    Empty,
    /// `{salt, data}` JSON record
    Salted(SaltedEnvelope),
    /// Any other opaque string from an earlier codec
    Legacy(String),
}

impl Envelope {
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Envelope::Empty;
        }
        match SaltedEnvelope::parse(text) {
            Some(salted) => Envelope::Salted(salted),
            None => Envelope::Legacy(text.to_string()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Envelope::Empty => "empty",
            Envelope::Salted(_) => "salted",
            Envelope::Legacy(_) => "legacy",
        }
    }
}

/// Summary of an envelope string for troubleshooting.
#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeInfo {
    pub is_empty: bool,
    pub length: usize,
    pub kind: &'static str,
    pub is_json: bool,
    pub is_base64: bool,
    /// First 20 characters followed by `...`, or `N/A` when empty
    pub preview: String,
}

/// Describe an envelope without attempting to decrypt it.
pub fn inspect_envelope(text: &str) -> EnvelopeInfo {
    if text.is_empty() {
        return EnvelopeInfo {
            is_empty: true,
            length: 0,
            kind: Envelope::Empty.kind(),
            is_json: false,
            is_base64: false,
            preview: "N/A".to_string(),
        };
    }

    let preview: String = text.chars().take(20).collect();
    EnvelopeInfo {
        is_empty: false,
        length: text.len(),
        kind: Envelope::parse(text).kind(),
        is_json: serde_json::from_str::<serde_json::Value>(text).is_ok(),
        is_base64: is_base64_alphabet(text),
        preview: format!("{}...", preview),
    }
}

/// `^[A-Za-z0-9+/=]+$`
pub(crate) fn is_base64_alphabet(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
}
