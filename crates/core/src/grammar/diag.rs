pub use itemkey_diagnostics::{Diagnostic, Severity, Span, codes};
