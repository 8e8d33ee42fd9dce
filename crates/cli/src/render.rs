//! Pretty diagnostic rendering using ariadne.
//!
//! Turns item key [`Diagnostic`]s into ariadne [`Report`]s that underline
//! the offending character of the key. JSON output does not go through this
//! module: commands embed diagnostics in their own JSON objects.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Fmt, IndexType, Label, Report, ReportKind, Source};
use clap::ValueEnum;
use itemkey_diagnostics::{Diagnostic, Severity};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, otherwise pretty for a TTY and JSON for pipes.
    pub(crate) fn resolve_or_detect(explicit: Option<Format>) -> Self {
        explicit.unwrap_or_else(|| {
            if io::stdout().is_terminal() {
                Format::Pretty
            } else {
                Format::Json
            }
        })
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: &Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        _ => Color::Yellow,
    }
}

fn context_note(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref().filter(|c| !c.is_empty())?;
    Some(
        ctx.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Short label for the underlined character.
fn label_message(diag: &Diagnostic) -> String {
    let ctx = diag.context.as_ref();
    match (
        ctx.and_then(|c| c.get("char")),
        ctx.and_then(|c| c.get("expected")),
    ) {
        (Some(ch), _) => format!("unexpected \"{ch}\""),
        (None, Some(expected)) => format!("expected \"{expected}\" before end of key"),
        (None, None) => diag.message.clone(),
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Render diagnostics against `source` to stderr.
///
/// Spans are byte offsets into `source`; diagnostics without a span are
/// printed as standalone messages.
pub(crate) fn render_diagnostics(source: &str, name: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    // Spans are byte offsets.
    let config = Config::default()
        .with_compact(false)
        .with_index_type(IndexType::Byte);
    let mut cache = (name, Source::from(source));

    for diag in diagnostics {
        let Some(span) = &diag.span else {
            render_standalone(diag);
            continue;
        };

        // Clamp so a stale span cannot panic the renderer.
        let start = span.start.min(source.len());
        let end = span.end.min(source.len()).max(start);

        let mut builder = Report::build(report_kind(&diag.severity), (name, start..end))
            .with_code(diag.id.as_ref())
            .with_message(&diag.message)
            .with_config(config)
            .with_label(
                Label::new((name, start..end))
                    .with_message(label_message(diag))
                    .with_color(severity_color(&diag.severity)),
            );
        if let Some(note) = context_note(diag) {
            builder = builder.with_note(note);
        }
        if let Some(explanation) = diag.explain() {
            builder = builder.with_help(explanation);
        }
        builder.finish().eprint(&mut cache).ok();
    }
}

fn render_standalone(diag: &Diagnostic) {
    eprintln!(
        "{}[{}]: {}",
        diag.severity.to_string().fg(severity_color(&diag.severity)),
        diag.id,
        diag.message
    );
    if let Some(note) = context_note(diag) {
        eprintln!("  = note: {note}");
    }
    if let Some(explanation) = diag.explain() {
        eprintln!("  = help: {explanation}");
    }
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured summary line, e.g. `3 keys checked, 1 invalid`.
pub(crate) fn print_summary(checked: usize, invalid: usize) {
    let s = if checked == 1 { "" } else { "s" };
    let head = format!("{checked} key{s} checked");
    if invalid == 0 {
        eprintln!("{}, {}", head, "all valid".fg(Color::Green));
    } else {
        eprintln!("{}, {}", head, format!("{invalid} invalid").fg(Color::Red));
    }
}
