//! Locate an item key at the start of a longer expression.
//!
//! Trigger and calculated-item expressions embed keys followed by other
//! text, e.g. `net.if.in[eth0].last(0)` or `system.cpu.load.avg(5m)`. The
//! key's own grammar decides where it stops.

use itemkey_rules::KeyRules;

use super::{
    error::KeyError,
    parser::{
        ParamScanner, STANDARD_RULES, Termination, byte_offset, identifier_len, invalid_format,
    },
};

/// An item key found at the start of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyExtent<'a> {
    /// The key text.
    pub key: &'a str,
    /// Byte offset one past the key in the expression.
    pub end: usize,
}

/// Find the item key at the start of `expr` using the standard rules.
pub fn key_extent(expr: &str) -> Result<KeyExtent<'_>, KeyError> {
    key_extent_with(expr, &STANDARD_RULES)
}

/// Find the item key at the start of `expr`.
///
/// - identifier only: the whole expression
/// - identifier followed by `(`: function-call form `key.func(...)`; the key
///   ends before the last `.` of the identifier
/// - identifier followed by `[`: the key ends after its final `]`,
///   whatever follows
///
/// An empty expression is [`KeyError::Empty`]; an empty identifier or
/// anything else after the identifier is an error.
pub fn key_extent_with<'a>(expr: &'a str, rules: &KeyRules) -> Result<KeyExtent<'a>, KeyError> {
    if expr.is_empty() {
        return Err(KeyError::Empty);
    }
    let chars: Vec<(usize, char)> = expr.char_indices().collect();
    let id_len = identifier_len(&chars, rules);

    if id_len == chars.len() {
        return Ok(KeyExtent {
            key: expr,
            end: expr.len(),
        });
    }
    if id_len == 0 {
        return Err(invalid_format(&chars, 0));
    }

    let end = match chars[id_len].1 {
        '(' => {
            let id_end = byte_offset(&chars, id_len, expr.len());
            match expr[..id_end].rfind('.') {
                Some(dot) if dot > 0 => dot,
                _ => return Err(invalid_format(&chars, id_len)),
            }
        }
        '[' => {
            ParamScanner::new(&chars, id_len, expr.len(), Termination::Embedded)
                .run()?
                .end
        }
        _ => return Err(invalid_format(&chars, id_len)),
    };

    tracing::trace!(expr, end, "item key located");
    Ok(KeyExtent {
        key: &expr[..end],
        end,
    })
}
