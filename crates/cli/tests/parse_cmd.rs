//! CLI tests for `itemkey parse`, `itemkey format`, and `itemkey extract`.

use std::process::{Command, Output};

use assert_cmd::cargo;

fn itemkey_cmd() -> Command {
    Command::new(cargo::cargo_bin!("itemkey"))
}

fn run_json(args: &[&str]) -> (Output, serde_json::Value) {
    let output = itemkey_cmd()
        .args(args)
        .args(["--output", "json"])
        .output()
        .expect("run itemkey");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("invalid json ({e}): {stdout}"));
    (output, json)
}

// ── parse ───────────────────────────────────────────────────────────────

#[test]
fn parse_valid_key_json() {
    let (output, json) = run_json(&["parse", "net.if.in[eth0,\"a,b\"]"]);
    assert!(output.status.success());
    assert_eq!(json["result"]["valid"], true);
    assert_eq!(json["result"]["key_id"], "net.if.in");
    assert_eq!(json["result"]["parameters"], serde_json::json!(["eth0", "a,b"]));
    assert_eq!(json["diagnostics"], serde_json::json!([]));
}

#[test]
fn parse_invalid_key_exits_nonzero_with_diagnostic() {
    let (output, json) = run_json(&["parse", "key[a]extra"]);
    assert!(!output.status.success());
    assert_eq!(json["result"]["valid"], false);
    assert_eq!(json["result"]["error_kind"], "syntax_error");
    let diag = &json["diagnostics"][0];
    assert_eq!(diag["id"], "KEY1201");
    assert_eq!(diag["span"]["start"], 6);
    assert_eq!(diag["context"]["char"], "e");
}

#[test]
fn parse_pretty_renders_diagnostic_to_stderr() {
    let output = itemkey_cmd()
        .args(["parse", "key#", "--output", "pretty"])
        .output()
        .expect("run parse");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("KEY1101"), "stderr: {stderr}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"valid\": false"), "stdout: {stdout}");
}

#[test]
fn parse_pretty_underlines_after_multibyte_characters() {
    let output = itemkey_cmd()
        .args(["--output", "pretty", "parse", "k[éé]x"])
        .output()
        .expect("run parse");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("k[éé]"), "no source line: {stderr}");
    assert!(stderr.contains("unexpected \"x\""), "no label: {stderr}");
}

#[test]
fn parse_honors_custom_rules_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rules.json");
    std::fs::write(&path, r#"{"id":"snmp","extra_key_chars":"._-:"}"#).expect("write rules");
    let path = path.to_string_lossy().to_string();

    let (output, json) = run_json(&["parse", "snmp:ifInOctets[1]", "--rules", &path]);
    assert!(output.status.success());
    assert_eq!(json["result"]["key_id"], "snmp:ifInOctets");

    let (output, _) = run_json(&["parse", "snmp:ifInOctets[1]"]);
    assert!(!output.status.success());
}

// ── format ──────────────────────────────────────────────────────────────

#[test]
fn format_prints_canonical_spelling() {
    let output = itemkey_cmd()
        .args(["format", "key[ \"a\" ][\"b,c\"]", "--output", "pretty"])
        .output()
        .expect("run format");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim_end(), "key[a,\"b,c\"]");
}

#[test]
fn format_json_reports_change() {
    let (output, json) = run_json(&["format", "key[\"plain\"]"]);
    assert!(output.status.success());
    assert_eq!(json["formatted"], "key[plain]");
    assert_eq!(json["changed"], true);

    let (_, json) = run_json(&["format", "key[plain]"]);
    assert_eq!(json["changed"], false);
}

#[test]
fn format_invalid_key_fails() {
    let (output, json) = run_json(&["format", "key[a"]);
    assert!(!output.status.success());
    assert!(json["formatted"].is_null());
    assert_eq!(json["diagnostics"][0]["id"], "KEY1102");
}

// ── extract ─────────────────────────────────────────────────────────────

#[test]
fn extract_bracketed_key_from_expression() {
    let (output, json) = run_json(&["extract", "net.if.in[eth0,\"x]\"].last(0)"]);
    assert!(output.status.success());
    assert_eq!(json["key"], "net.if.in[eth0,\"x]\"]");
    assert_eq!(json["rest"], ".last(0)");
}

#[test]
fn extract_function_form() {
    let output = itemkey_cmd()
        .args(["extract", "system.cpu.load.avg(5m)", "--output", "pretty"])
        .output()
        .expect("run extract");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim_end(), "system.cpu.load");
}

#[test]
fn extract_failure_reports_diagnostic() {
    let (output, json) = run_json(&["extract", "last(0)"]);
    assert!(!output.status.success());
    assert!(json["key"].is_null());
    assert_eq!(json["diagnostics"][0]["id"], "KEY1101");
}
