//! Shared test helpers for `itemkey_core` integration tests.

#![allow(unreachable_pub)]

use itemkey_core::{ErrorKind, ItemKey, parse_key};

/// Parse `input`, assert it is valid, and return the parameters.
#[allow(dead_code)]
pub fn valid_params(input: &str) -> Vec<String> {
    let key = parse_key(input);
    assert!(
        key.is_valid(),
        "expected {input:?} to be valid, got error: {}",
        key.error()
    );
    assert!(key.error().is_empty());
    key.parameters().to_vec()
}

/// Parse `input`, assert it is invalid with the given kind, and return it.
#[allow(dead_code)]
pub fn invalid(input: &str, kind: ErrorKind) -> ItemKey {
    let key = parse_key(input);
    assert!(!key.is_valid(), "expected {input:?} to be invalid");
    assert_eq!(
        key.error_kind(),
        Some(kind),
        "wrong error kind for {input:?}: {}",
        key.error()
    );
    assert!(!key.error().is_empty());
    assert!(key.parameters().is_empty());
    key
}

/// Diagnostic code of an invalid key.
#[allow(dead_code)]
pub fn diag_code(key: &ItemKey) -> String {
    key.diagnostic()
        .map(|d| d.id.to_string())
        .unwrap_or_else(|| panic!("expected a diagnostic for {:?}", key.source()))
}

// ─── Simple deterministic PRNG (LCG) ────────────────────────────────────────

#[allow(dead_code)]
pub struct SimpleRng(u64);

#[allow(dead_code)]
impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    pub fn gen_range(&mut self, max: usize) -> usize {
        ((self.next() >> 33) as usize) % max
    }

    pub fn pick(&mut self, alphabet: &[char]) -> char {
        alphabet[self.gen_range(alphabet.len())]
    }

    pub fn gen_string(&mut self, alphabet: &[char], max_len: usize) -> String {
        let len = self.gen_range(max_len + 1);
        (0..len).map(|_| self.pick(alphabet)).collect()
    }
}
