/// Re-exports from the diagnostics crate.
pub mod diag;
/// JSON serialization helpers for parse results.
pub mod dump;
/// Item key emitter: parameter quoting and key re-serialization.
pub mod emit;
/// Item key parse errors and their classification.
pub mod error;
/// Locating an item key inside a longer expression.
pub mod extract;
/// The parse result type.
pub mod key;
/// Item key parser. Validates a key and splits its parameters.
pub mod parser;
