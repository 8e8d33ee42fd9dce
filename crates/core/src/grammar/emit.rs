//! Item key emitter: quotes parameters and writes keys back out as text.
//!
//! Quoting is minimal: a parameter is written bare unless the parser would
//! read the bare text differently. Re-parsing emitted text yields the same
//! parameter values, though not necessarily the original spelling.

use std::borrow::Cow;

use super::diag::{Diagnostic, codes};
use super::key::ItemKey;

/// A parameter value that cannot be written into a key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    /// The value needs quoting but ends with `\`, which would escape the
    /// closing quote.
    #[error("parameter {param:?} cannot be quoted: it ends with a backslash")]
    TrailingBackslash {
        /// The offending parameter value.
        param: String,
    },
}

impl QuoteError {
    /// Convert into a spanless [`Diagnostic`].
    pub fn to_diagnostic(&self) -> Diagnostic {
        let Self::TrailingBackslash { param } = self;
        Diagnostic::error(codes::UNQUOTABLE_PARAMETER, self.to_string(), None)
            .with_context([("param".to_string(), param.clone())].into())
    }
}

/// Whether `param` must be quoted to survive a parse unchanged.
pub fn needs_quoting(param: &str) -> bool {
    param.starts_with(['"', '[', ' ']) || param.contains([',', ']'])
}

/// Quote a parameter value for use inside `key[...]`.
///
/// Values that read back unchanged are returned as-is unless `forced`.
/// Quoting escapes every `"` as `\"` and wraps the value in quotes.
pub fn quote_param(param: &str, forced: bool) -> Result<Cow<'_, str>, QuoteError> {
    if !forced && !needs_quoting(param) {
        return Ok(Cow::Borrowed(param));
    }
    if param.ends_with('\\') {
        return Err(QuoteError::TrailingBackslash {
            param: param.to_string(),
        });
    }

    let mut out = String::with_capacity(param.len() + 2);
    out.push('"');
    for c in param.chars() {
        if c == '"' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    Ok(Cow::Owned(out))
}

/// Undo [`quote_param`] on a single parameter as written in a key.
///
/// Text that does not start with `"` is returned unchanged. A missing
/// closing quote is tolerated.
pub fn unquote_param(param: &str) -> String {
    let Some(body) = param.strip_prefix('"') else {
        return param.to_string();
    };
    let body = body.strip_suffix('"').unwrap_or(body);

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'"') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Write a key from an identifier and parameter values.
///
/// No parameters gives the bare identifier; otherwise the values are
/// quoted as needed and joined inside one bracket pair.
pub fn emit_key<S: AsRef<str>>(key_id: &str, params: &[S]) -> Result<String, QuoteError> {
    if params.is_empty() {
        return Ok(key_id.to_string());
    }
    let mut out = String::with_capacity(key_id.len() + 2);
    out.push_str(key_id);
    out.push('[');
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&quote_param(param.as_ref(), false)?);
    }
    out.push(']');
    Ok(out)
}

/// Rebuild `key` with some parameters replaced.
///
/// `replace` is called with each parameter's index and value; returning
/// `Some` substitutes the value. Invalid keys are returned verbatim.
pub fn replace_params<F>(key: &ItemKey, mut replace: F) -> Result<String, QuoteError>
where
    F: FnMut(usize, &str) -> Option<String>,
{
    if !key.is_valid() {
        return Ok(key.source().to_string());
    }
    let params: Vec<Cow<'_, str>> = key
        .parameters()
        .iter()
        .enumerate()
        .map(|(i, p)| match replace(i, p) {
            Some(new) => Cow::Owned(new),
            None => Cow::Borrowed(p.as_str()),
        })
        .collect();
    emit_key(key.key_id(), &params)
}

impl ItemKey {
    /// Canonical text of the key: minimal quoting, no padding spaces, a
    /// single bracket group. Invalid keys are returned verbatim.
    pub fn to_key_string(&self) -> Result<String, QuoteError> {
        if !self.is_valid() {
            return Ok(self.source().to_string());
        }
        emit_key(self.key_id(), self.parameters())
    }
}
