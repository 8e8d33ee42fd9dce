//! Key-naming rules for item key tooling.
//!
//! A [`KeyRules`] value decides which characters may appear in the bare
//! identifier part of an item key and how long a key may be. The default
//! rules match the monitoring system's naming convention; alternative rules
//! can be loaded from JSON with [`load_rules_from_str`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum key length, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 255;

/// Punctuation allowed in key identifiers besides ASCII letters and digits.
pub const DEFAULT_EXTRA_KEY_CHARS: &str = "._-";

/// Characters that carry structure in a key and can never be identifier
/// characters.
const STRUCTURAL_CHARS: &[char] = &['[', ']', ',', '"', ' ', '\\'];

/// Errors that can occur when loading or validating key rules.
#[derive(Debug, Error)]
pub enum RulesError {
    /// JSON deserialization failed.
    #[error("invalid rules JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// Naming rules applied while parsing item keys.
///
/// # Example
/// ```
/// let rules = itemkey_rules::KeyRules {
///     max_length: 128,
///     ..Default::default()
/// };
/// assert!(rules.is_key_char('a'));
/// assert!(rules.is_key_char('-'));
/// assert!(!rules.is_key_char('['));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyRules {
    /// Rules identifier (e.g., `"standard"`).
    #[serde(default = "default_id")]
    pub id: String,
    /// Rules schema version for forward compatibility (e.g., `"1.0.0"`).
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Maximum key length in characters (Unicode scalar values, not bytes).
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Characters allowed in the identifier in addition to ASCII
    /// alphanumerics.
    #[serde(default = "default_extra_key_chars")]
    pub extra_key_chars: String,
}

fn default_id() -> String {
    "standard".into()
}

fn default_schema_version() -> String {
    "1.0.0".into()
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_extra_key_chars() -> String {
    DEFAULT_EXTRA_KEY_CHARS.into()
}

impl Default for KeyRules {
    fn default() -> Self {
        Self {
            id: default_id(),
            schema_version: default_schema_version(),
            max_length: DEFAULT_MAX_LENGTH,
            extra_key_chars: default_extra_key_chars(),
        }
    }
}

impl KeyRules {
    /// Whether `c` may appear in the identifier part of a key.
    pub fn is_key_char(&self, c: char) -> bool {
        c.is_ascii_alphanumeric() || self.extra_key_chars.contains(c)
    }
}

/// Load and validate [`KeyRules`] from a JSON string.
///
/// Every field is optional and falls back to the standard rules. After
/// deserialization:
/// - `id` and `schema_version` must be non-empty
/// - `max_length` must be > 0
/// - `extra_key_chars` must not contain `[`, `]`, `,`, `"`, space or `\`
pub fn load_rules_from_str(s: &str) -> Result<KeyRules, RulesError> {
    let rules: KeyRules = serde_json::from_str(s)?;

    if rules.id.trim().is_empty() {
        return Err(RulesError::InvalidField {
            field: "id".into(),
            reason: "must not be empty".into(),
        });
    }
    if rules.schema_version.trim().is_empty() {
        return Err(RulesError::InvalidField {
            field: "schema_version".into(),
            reason: "must not be empty".into(),
        });
    }

    if rules.max_length == 0 {
        return Err(RulesError::InvalidField {
            field: "max_length".into(),
            reason: "must be > 0".into(),
        });
    }

    if let Some(c) = rules
        .extra_key_chars
        .chars()
        .find(|c| STRUCTURAL_CHARS.contains(c))
    {
        return Err(RulesError::InvalidField {
            field: "extra_key_chars".into(),
            reason: format!("{c:?} is a structural key character"),
        });
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_charset() {
        for c in ['a', 'Z', '0', '9', '.', '_', '-'] {
            assert!(
                KeyRules::default().is_key_char(c),
                "{c:?} should be a key char"
            );
        }
        for c in ['[', ']', ',', '"', ' ', '#', '/', 'é', '\t'] {
            assert!(
                !KeyRules::default().is_key_char(c),
                "{c:?} should not be a key char"
            );
        }
    }

    #[test]
    fn load_empty_object_gives_defaults() {
        let rules = load_rules_from_str("{}").unwrap();
        assert_eq!(rules, KeyRules::default());
        assert_eq!(rules.max_length, 255);
    }

    #[test]
    fn load_custom_rules() {
        let json = r#"{ "id": "snmp", "max_length": 64, "extra_key_chars": "._-:" }"#;
        let rules = load_rules_from_str(json).unwrap();
        assert_eq!(rules.id, "snmp");
        assert_eq!(rules.schema_version, "1.0.0");
        assert_eq!(rules.max_length, 64);
        assert!(rules.is_key_char(':'));
        assert!(!KeyRules::default().is_key_char(':'));
    }

    #[test]
    fn zero_max_length_rejected() {
        let err = load_rules_from_str(r#"{ "max_length": 0 }"#).unwrap_err();
        assert!(
            err.to_string().contains("max_length"),
            "error should mention max_length: {err}"
        );
    }

    #[test]
    fn structural_extra_char_rejected() {
        let err = load_rules_from_str(r#"{ "extra_key_chars": ".[" }"#).unwrap_err();
        assert!(matches!(err, RulesError::InvalidField { ref field, .. } if field == "extra_key_chars"));
    }

    #[test]
    fn empty_id_rejected() {
        let err = load_rules_from_str(r#"{ "id": "  " }"#).unwrap_err();
        assert!(err.to_string().contains("id"));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = load_rules_from_str("{ max_length: 3 ").unwrap_err();
        assert!(matches!(err, RulesError::InvalidJson(_)));
    }

    #[test]
    fn negative_length_rejected_by_serde() {
        assert!(load_rules_from_str(r#"{ "max_length": -1 }"#).is_err());
    }
}
