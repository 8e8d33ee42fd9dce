//! Fuzz smoke tests for the item key parser and extractor.
//!
//! These tests feed random, adversarial, and edge-case inputs to the parser
//! and verify it never panics and that basic structural invariants hold on
//! every `ItemKey`.
//!
//! No external crate dependencies are used: a simple deterministic PRNG
//! provides reproducible randomness.

mod common;

use common::SimpleRng;
use itemkey_core::{ItemKey, Severity, key_extent, parse_key};

// ─── Invariant checking ─────────────────────────────────────────────────────

/// Assert structural invariants on any `ItemKey`, regardless of input.
fn assert_invariants(key: &ItemKey, input: &str) {
    assert_eq!(key.source(), input);
    assert_eq!(key.is_valid(), key.error().is_empty(), "input: {input:?}");
    assert!(input.starts_with(key.key_id()), "input: {input:?}");

    if key.is_valid() {
        assert!(!key.key_id().is_empty(), "valid key with empty id: {input:?}");
        assert!(key.error_kind().is_none());
        assert!(key.diagnostic().is_none());
        if key.key_id().len() < input.len() {
            assert!(key.param_count() >= 1, "input: {input:?}");
        }
        return;
    }

    assert!(key.parameters().is_empty(), "invalid key with params: {input:?}");
    let err = key.key_error().expect("invalid key carries an error");
    let diag = key.diagnostic().expect("invalid key carries a diagnostic");
    assert_eq!(diag.severity, Severity::Error);
    assert!(diag.explain().is_some(), "no explanation for {}", diag.id);

    if let Some(span) = err.span() {
        assert!(span.start <= span.end, "bad span {span:?} for {input:?}");
        assert!(span.end <= input.len(), "span past end for {input:?}");
        assert!(input.is_char_boundary(span.start));
        assert!(input.is_char_boundary(span.end));
    }
    if let Some(position) = err.position() {
        assert!(position >= 1);
        assert!(position <= input.chars().count(), "input: {input:?}");
    }
}

fn check(input: &str) {
    let key = parse_key(input);
    assert_invariants(&key, input);
    assert_eq!(parse_key(input), key, "parse is not deterministic");

    if let Ok(ext) = key_extent(input) {
        assert!(ext.end <= input.len());
        assert!(input.is_char_boundary(ext.end));
        assert_eq!(ext.key, &input[..ext.end]);
    }
}

// ─── Random inputs ──────────────────────────────────────────────────────────

#[test]
fn random_bytes_never_panic() {
    let mut rng = SimpleRng::new(42);
    for _ in 0..2000 {
        let len = rng.gen_range(300);
        let bytes: Vec<u8> = (0..len).map(|_| rng.next() as u8).collect();
        let input = String::from_utf8_lossy(&bytes);
        check(&input);
    }
}

#[test]
fn structural_alphabet_never_panics() {
    let alphabet: Vec<char> = "ab.[]\",\\ é(".chars().collect();
    let mut rng = SimpleRng::new(0xdead_beef);
    for _ in 0..5000 {
        let tail = rng.gen_string(&alphabet, 24);
        let input = format!("key{tail}");
        check(&input);
    }
}

#[test]
fn long_inputs_near_the_limit() {
    let mut rng = SimpleRng::new(7);
    for _ in 0..200 {
        let n = 250 + rng.gen_range(10);
        let input = format!("k[{}]", "é".repeat(n - 3));
        check(&input);
        assert_eq!(parse_key(&input).is_valid(), n <= 255);
    }
}

// ─── Adversarial inputs ─────────────────────────────────────────────────────

#[test]
fn adversarial_inputs() {
    let cases = [
        "[",
        "]",
        "\"",
        "k[",
        "k]",
        "k[\\",
        "k[\"\\",
        "k[\"\\\"",
        "k[[[[[[",
        "k]]]]]]",
        "k[][][][]",
        "k[\"\"\"]",
        "k[ \" ]",
        "k[a,\"b\"c]",
        "k[[\"]\"]]",
        "k.(",
        ".(",
        "k(",
        "\u{0}",
        "k[\u{0}]",
        "k[\u{10FFFF}]",
    ];
    for input in cases {
        check(input);
    }
}
