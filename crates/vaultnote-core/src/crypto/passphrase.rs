//! Passphrase validation and strength feedback.
//!
//! Validation is the hard gate used when a new passphrase is set up;
//! strength is advisory and only drives user-facing feedback.

use serde::Serialize;

use crate::error::{Result, VaultError};

/// Default minimum passphrase length in characters.
pub const MIN_PASSPHRASE_LENGTH: usize = 8;

/// Length at which a passphrase earns the length criterion.
const STRONG_LENGTH: usize = 12;

const SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Validate passphrase meets minimum security requirements.
///
/// # Requirements
///
/// - Not empty or only whitespace
/// - At least `min_length` characters long
///
/// # Examples
///
/// ```
/// use vaultnote_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase("my-secure-passphrase-123", 8).is_ok());
/// assert!(validate_passphrase("short", 8).is_err());
/// ```
pub fn validate_passphrase(passphrase: &str, min_length: usize) -> Result<()> {
    if passphrase.trim().is_empty() {
        return Err(VaultError::EmptyPassphrase);
    }

    let length = passphrase.chars().count();
    if length < min_length {
        return Err(VaultError::InvalidInput(format!(
            "Passphrase must be at least {} characters (got {})",
            min_length, length
        )));
    }

    Ok(())
}

/// Coarse strength rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PassphraseStrength {
    Weak,
    Moderate,
    Strong,
}

impl PassphraseStrength {
    pub fn label(&self) -> &'static str {
        match self {
            PassphraseStrength::Weak => "Weak",
            PassphraseStrength::Moderate => "Moderate",
            PassphraseStrength::Strong => "Strong",
        }
    }

    pub fn feedback(&self) -> &'static str {
        match self {
            PassphraseStrength::Strong => "Great job! Your passphrase is strong.",
            PassphraseStrength::Moderate => {
                "Your passphrase is moderate. Consider adding more complexity."
            }
            PassphraseStrength::Weak => "Your passphrase is weak. Please make it stronger.",
        }
    }
}

/// Result of [`evaluate_strength`].
#[derive(Debug, Clone, Serialize)]
pub struct StrengthReport {
    pub strength: PassphraseStrength,
    /// How many of the five criteria were met
    pub criteria_met: usize,
    pub feedback: &'static str,
}

/// Rate a passphrase against five criteria: length of at least 12, a digit,
/// an uppercase letter, a lowercase letter and a symbol.
///
/// Four or more met is Strong, exactly three is Moderate, anything else is
/// Weak.
pub fn evaluate_strength(passphrase: &str) -> StrengthReport {
    let criteria = [
        passphrase.chars().count() >= STRONG_LENGTH,
        passphrase.chars().any(|c| c.is_ascii_digit()),
        passphrase.chars().any(|c| c.is_ascii_uppercase()),
        passphrase.chars().any(|c| c.is_ascii_lowercase()),
        passphrase.chars().any(|c| SYMBOLS.contains(c)),
    ];
    let criteria_met = criteria.iter().filter(|met| **met).count();

    let strength = match criteria_met {
        n if n >= 4 => PassphraseStrength::Strong,
        3 => PassphraseStrength::Moderate,
        _ => PassphraseStrength::Weak,
    };

    StrengthReport {
        strength,
        criteria_met,
        feedback: strength.feedback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_passphrase() {
        assert!(validate_passphrase("my-secure-passphrase-123", MIN_PASSPHRASE_LENGTH).is_ok());
        assert!(validate_passphrase("exactly12chr", MIN_PASSPHRASE_LENGTH).is_ok());
    }

    #[test]
    fn test_passphrase_too_short() {
        let result = validate_passphrase("short", MIN_PASSPHRASE_LENGTH);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least 8 characters"));
    }

    #[test]
    fn test_passphrase_empty() {
        for blank in ["", "   ", "\n\t"] {
            assert!(matches!(
                validate_passphrase(blank, MIN_PASSPHRASE_LENGTH),
                Err(VaultError::EmptyPassphrase)
            ));
        }
    }

    #[test]
    fn test_passphrase_length_counts_characters() {
        // 8 characters, 15 bytes
        assert!(validate_passphrase("ééééééé1", 8).is_ok());
    }

    #[test]
    fn test_strength_levels() {
        let strong = evaluate_strength("Correct-Horse-42!");
        assert_eq!(strong.strength, PassphraseStrength::Strong);
        assert_eq!(strong.criteria_met, 5);

        let moderate = evaluate_strength("abcDEF123");
        assert_eq!(moderate.strength, PassphraseStrength::Moderate);

        let weak = evaluate_strength("password");
        assert_eq!(weak.strength, PassphraseStrength::Weak);
        assert_eq!(weak.criteria_met, 1);
    }

    #[test]
    fn test_strength_feedback_matches_level() {
        let report = evaluate_strength("password");
        assert!(report.feedback.contains("weak"));
        assert_eq!(report.strength.label(), "Weak");
    }
}
