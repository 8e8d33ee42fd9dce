//! Item key core library.
//!
//! Parses and validates monitoring item keys such as
//! `net.if.in[eth0,bytes]`, splitting them into an identifier and an ordered
//! parameter list. The main entry points are [`parse_key`] for parsing,
//! [`key_extent`] for finding a key inside a longer expression, and
//! [`emit_key`] / [`ItemKey::to_key_string`] for writing keys back out.

#![warn(missing_docs)]

/// Item key grammar: parser, parse result, errors, emitter, and extraction.
pub mod grammar;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Parser
pub use grammar::parser::{parse_key, parse_key_with};

// Parse result and errors
pub use grammar::error::{ErrorKind, KeyError};
pub use grammar::key::ItemKey;

// Emitter
pub use grammar::emit::{QuoteError, emit_key, quote_param, replace_params, unquote_param};

// Extraction
pub use grammar::extract::{KeyExtent, key_extent, key_extent_with};

// Diagnostics (re-exported from the diagnostics crate)
pub use grammar::diag::{Diagnostic, Severity, Span, codes};

// Rules (re-exported from the rules crate)
pub use itemkey_rules::{KeyRules, RulesError, load_rules_from_str};

// Serialization helpers
pub use grammar::dump::{to_pretty_json, to_pretty_json_all};
