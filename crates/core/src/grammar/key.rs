use serde::Serialize;
use serde::ser::SerializeStruct;

use super::diag::Diagnostic;
use super::error::{ErrorKind, KeyError};

/// Result of parsing one item key expression.
///
/// Built once by [`parse_key`](super::parser::parse_key) and read-only
/// afterwards. Check [`is_valid`](Self::is_valid) before trusting
/// [`key_id`](Self::key_id) or [`parameters`](Self::parameters): an invalid
/// key keeps whatever identifier was scanned before the error but never any
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemKey {
    source: String,
    key_id: String,
    parameters: Vec<String>,
    error: Option<KeyError>,
}

impl ItemKey {
    pub(crate) fn valid(source: &str, key_id: &str, parameters: Vec<String>) -> Self {
        Self {
            source: source.to_string(),
            key_id: key_id.to_string(),
            parameters,
            error: None,
        }
    }

    pub(crate) fn invalid(source: &str, key_id: &str, error: KeyError) -> Self {
        Self {
            source: source.to_string(),
            key_id: key_id.to_string(),
            parameters: Vec::new(),
            error: Some(error),
        }
    }

    /// The raw input this key was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether the input is a syntactically valid key.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// The identifier before the parameter list (e.g. `net.if.in`).
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Top-level parameters in order. Empty when the key has no brackets.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Parameter at 0-based `index`, if present.
    pub fn parameter(&self, index: usize) -> Option<&str> {
        self.parameters.get(index).map(String::as_str)
    }

    /// Number of top-level parameters.
    pub fn param_count(&self) -> usize {
        self.parameters.len()
    }

    /// Human-readable error, empty when the key is valid.
    pub fn error(&self) -> String {
        self.error.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    /// The typed error, if the key is invalid.
    pub fn key_error(&self) -> Option<&KeyError> {
        self.error.as_ref()
    }

    /// Error classification, if the key is invalid.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(KeyError::kind)
    }

    /// Diagnostic describing the error, if the key is invalid.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        self.error.as_ref().map(KeyError::to_diagnostic)
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl Serialize for ItemKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ItemKey", 6)?;
        s.serialize_field("key", &self.source)?;
        s.serialize_field("valid", &self.is_valid())?;
        s.serialize_field("key_id", &self.key_id)?;
        s.serialize_field("parameters", &self.parameters)?;
        s.serialize_field("error", &self.error())?;
        s.serialize_field("error_kind", &self.error_kind())?;
        s.end()
    }
}
