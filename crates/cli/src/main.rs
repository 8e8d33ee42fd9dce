mod render;

use std::fs;
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use itemkey_core::{ItemKey, KeyRules, key_extent_with, load_rules_from_str, parse_key_with};
use itemkey_diagnostics::{self as diag, Diagnostic};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::render::{Format, print_summary, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "itemkey",
    version,
    about = "Parse, check, and format monitoring item keys such as net.if.in[eth0,bytes]"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_enum)]
    output: Option<Format>,

    /// Path to a key rules JSON file (identifier characters, length limit).
    #[arg(long, global = true)]
    rules: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG`
    /// overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    // ── Key analysis ─────────────────────────────────────────────────
    /// Parse one item key and print its identifier and parameters.
    Parse { key: String },

    /// Check a file of item keys, one per line ("-" reads stdin).
    ///
    /// Blank lines and lines with `#` in column 1 are skipped; other lines
    /// are checked as written.
    Check { file: String },

    // ── Key transformation ──────────────────────────────────────────
    /// Print the canonical spelling of an item key.
    Format { key: String },

    /// Find the item key at the start of a longer expression, e.g.
    /// `net.if.in[eth0].last(0)`.
    Extract { expr: String },

    // ── Reference ───────────────────────────────────────────────────
    /// Explain a diagnostic ID (e.g. KEY1201).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let format = Format::resolve_or_detect(cli.output);

    match run(cli, format) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            report_failure(&err, format);
            process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the input was processed but found invalid.
fn run(cli: Cli, format: Format) -> Result<bool> {
    let rules = load_rules(cli.rules.as_deref())?;
    match cli.cmd {
        Cmd::Parse { key } => cmd_parse(&key, &rules, format),
        Cmd::Check { file } => cmd_check(&file, &rules, format),
        Cmd::Format { key } => cmd_format(&key, &rules, format),
        Cmd::Extract { expr } => cmd_extract(&expr, &rules, format),
        Cmd::Explain { id } => cmd_explain(&id, format),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Print a command failure; JSON mode gets a machine-readable envelope on
/// stdout.
fn report_failure(err: &anyhow::Error, format: Format) {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "success": false,
                "error": "command_failed",
                "message": format!("{err:#}"),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).expect("JSON value serialization cannot fail")
            );
        }
        Format::Pretty => eprintln!("error: {err:#}"),
    }
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(input: &str, rules: &KeyRules, format: Format) -> Result<bool> {
    let key = parse_key_with(input, rules);
    let diagnostics: Vec<Diagnostic> = key.diagnostic().into_iter().collect();

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "result": key,
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Parse result to stdout, diagnostics to stderr.
            println!("{}", itemkey_core::to_pretty_json(&key));
            render_diagnostics(input, "<key>", &diagnostics);
        }
    }
    Ok(key.is_valid())
}

fn cmd_check(file: &str, rules: &KeyRules, format: Format) -> Result<bool> {
    let input = read_input(file)?;
    let name = if file == "-" { "<stdin>" } else { file };
    let keys = keys_in(&input);
    tracing::info!(file = name, keys = keys.len(), "checking item keys");

    let mut results: Vec<CheckedKey> = Vec::with_capacity(keys.len());
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    for (line, offset, text) in keys {
        let key = parse_key_with(text, rules);
        if let Some(mut d) = key.diagnostic() {
            // Point into the whole file rather than the single line.
            d.span = d.span.map(|s| s.shifted(offset));
            diagnostics.push(d);
        }
        results.push(CheckedKey { line, key });
    }
    let invalid = results.iter().filter(|r| !r.key.is_valid()).count();

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": invalid == 0,
                "keys": results,
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            render_diagnostics(&input, name, &diagnostics);
            print_summary(results.len(), invalid);
        }
    }
    Ok(invalid == 0)
}

fn cmd_format(input: &str, rules: &KeyRules, format: Format) -> Result<bool> {
    let key = parse_key_with(input, rules);
    let formatted = match key.diagnostic() {
        Some(d) => Err(d),
        None => key.to_key_string().map_err(|e| e.to_diagnostic()),
    };

    match (format, formatted) {
        (Format::Json, Ok(formatted)) => {
            let out = serde_json::json!({
                "key": input,
                "formatted": formatted,
                "changed": formatted != input,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(true)
        }
        (Format::Pretty, Ok(formatted)) => {
            println!("{formatted}");
            Ok(true)
        }
        (Format::Json, Err(diagnostic)) => {
            let out = serde_json::json!({
                "key": input,
                "formatted": null,
                "diagnostics": [diagnostic],
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(false)
        }
        (Format::Pretty, Err(diagnostic)) => {
            render_diagnostics(input, "<key>", &[diagnostic]);
            Ok(false)
        }
    }
}

fn cmd_extract(expr: &str, rules: &KeyRules, format: Format) -> Result<bool> {
    let extent = match key_extent_with(expr, rules) {
        Ok(extent) => extent,
        Err(err) => {
            let diagnostic = err.to_diagnostic();
            match format {
                Format::Json => {
                    let out = serde_json::json!({
                        "expression": expr,
                        "key": null,
                        "diagnostics": [diagnostic],
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Format::Pretty => render_diagnostics(expr, "<expr>", &[diagnostic]),
            }
            return Ok(false);
        }
    };

    match format {
        Format::Json => {
            let out = Extracted {
                expression: expr,
                key: extent.key,
                end: extent.end,
                rest: &expr[extent.end..],
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => println!("{}", extent.key),
    }
    Ok(true)
}

fn cmd_explain(id: &str, format: Format) -> Result<bool> {
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": id,
                "explanation": diag::explain(id),
                "severity": diag::default_severity(id),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Explanation is the expected output, so stdout.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(true)
}

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct CheckedKey {
    line: usize,
    #[serde(flatten)]
    key: ItemKey,
}

#[derive(Serialize)]
struct Extracted<'a> {
    expression: &'a str,
    key: &'a str,
    end: usize,
    rest: &'a str,
}

fn load_rules(path: Option<&str>) -> Result<KeyRules> {
    let Some(path) = path else {
        return Ok(KeyRules::default());
    };
    let json =
        fs::read_to_string(path).with_context(|| format!("failed to read rules file '{path}'"))?;
    let rules = load_rules_from_str(&json)
        .with_context(|| format!("failed to load rules file '{path}'"))?;
    tracing::info!(
        path,
        id = %rules.id,
        max_length = rules.max_length,
        "loaded key rules"
    );
    Ok(rules)
}

fn read_input(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(file).with_context(|| format!("failed to read '{file}'"))
}

/// Keys in a check file as `(line number, byte offset, text)`.
///
/// Whitespace-only lines and lines with `#` in column 1 are skipped. Every
/// other line is checked verbatim, surrounding spaces included.
fn keys_in(input: &str) -> Vec<(usize, usize, &str)> {
    let mut keys = Vec::new();
    let mut offset = 0;
    for (idx, raw) in input.split_inclusive('\n').enumerate() {
        let text = raw.trim_end_matches(['\n', '\r']);
        if !text.trim().is_empty() && !text.starts_with('#') {
            keys.push((idx + 1, offset, text));
        }
        offset += raw.len();
    }
    keys
}
