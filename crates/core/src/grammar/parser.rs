use std::sync::LazyLock;

use itemkey_rules::KeyRules;

use super::{diag::Span, error::KeyError, key::ItemKey};

/// Rules used by [`parse_key`].
pub(crate) static STANDARD_RULES: LazyLock<KeyRules> = LazyLock::new(KeyRules::default);

// ─── Public API ─────────────────────────────────────────────────────────────

/// Parse an item key with the standard naming rules.
///
/// Never fails: malformed input yields an [`ItemKey`] whose
/// [`is_valid`](ItemKey::is_valid) is `false`.
pub fn parse_key(input: &str) -> ItemKey {
    parse_key_with(input, &STANDARD_RULES)
}

/// Parse an item key with caller-supplied naming rules (identifier
/// character set and length limit).
pub fn parse_key_with(input: &str, rules: &KeyRules) -> ItemKey {
    let key = match check_length(input, rules.max_length) {
        Ok(()) => parse_checked(input, rules),
        Err(err) => ItemKey::invalid(input, "", err),
    };

    match key.key_error() {
        Some(err) => tracing::debug!(
            key = input,
            kind = ?err.kind(),
            position = ?err.position(),
            error = %err,
            "item key rejected"
        ),
        None => tracing::trace!(key = input, params = key.param_count(), "item key parsed"),
    }

    key
}

// ─── Length / identifier ────────────────────────────────────────────────────

/// The limit counts characters, not bytes.
fn check_length(input: &str, max: usize) -> Result<(), KeyError> {
    if input.is_empty() {
        return Err(KeyError::Empty);
    }
    let length = input.chars().count();
    if length > max {
        let start = input
            .char_indices()
            .nth(max)
            .map_or(input.len(), |(offset, _)| offset);
        return Err(KeyError::TooLong {
            length,
            max,
            span: Span::new(start, input.len()),
        });
    }
    Ok(())
}

fn parse_checked(input: &str, rules: &KeyRules) -> ItemKey {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let id_len = identifier_len(&chars, rules);
    let key_id = &input[..byte_offset(&chars, id_len, input.len())];

    if id_len == chars.len() {
        return ItemKey::valid(input, key_id, Vec::new());
    }

    if id_len == 0 || chars[id_len].1 != '[' {
        return ItemKey::invalid(input, key_id, invalid_format(&chars, id_len));
    }

    match ParamScanner::new(&chars, id_len, input.len(), Termination::EndOfInput).run() {
        Ok(list) => ItemKey::valid(input, key_id, list.params),
        Err(err) => ItemKey::invalid(input, key_id, err),
    }
}

/// Number of leading identifier characters.
pub(crate) fn identifier_len(chars: &[(usize, char)], rules: &KeyRules) -> usize {
    chars
        .iter()
        .take_while(|(_, c)| rules.is_key_char(*c))
        .count()
}

/// Byte offset of the character at `idx`, or `len` past the end.
pub(crate) fn byte_offset(chars: &[(usize, char)], idx: usize, len: usize) -> usize {
    chars.get(idx).map_or(len, |&(offset, _)| offset)
}

pub(crate) fn invalid_format(chars: &[(usize, char)], idx: usize) -> KeyError {
    let (offset, ch) = chars[idx];
    KeyError::InvalidFormat {
        ch,
        position: idx + 1,
        span: char_span(offset, ch),
    }
}

fn char_span(offset: usize, ch: char) -> Span {
    Span::new(offset, offset + ch.len_utf8())
}

// ─── Parameter list state machine ──────────────────────────────────────────

/// What may follow the final top-level `]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Termination {
    /// The key is the whole input; nothing may follow.
    EndOfInput,
    /// The key is embedded in a longer expression; stop at the final `]`.
    Embedded,
}

/// Scanning mode within the current parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Between parameters, or after a closing quote/group.
    Initial,
    /// Inside `"..."`.
    Quoted,
    /// Inside a bare parameter.
    Unquoted,
}

/// A successfully scanned parameter list.
#[derive(Debug)]
pub(crate) struct ParamList {
    /// Top-level parameters in order (at least one).
    pub(crate) params: Vec<String>,
    /// Byte offset one past the final `]`.
    pub(crate) end: usize,
}

/// Character-by-character scanner over a bracketed parameter list.
///
/// All state is local to one scan. `nest` counts nested groups inside the
/// list: the list's own brackets are structural, every deeper bracket (and
/// everything between them) is literal text of the enclosing parameter.
pub(crate) struct ParamScanner<'c> {
    chars: &'c [(usize, char)],
    /// Index into `chars` of the character being processed.
    pos: usize,
    /// Byte offset of the list's opening `[`.
    open: usize,
    input_len: usize,
    termination: Termination,
    mode: Mode,
    nest: usize,
    params: Vec<String>,
    current: String,
}

impl<'c> ParamScanner<'c> {
    /// `open_idx` is the index in `chars` of the opening `[`.
    pub(crate) fn new(
        chars: &'c [(usize, char)],
        open_idx: usize,
        input_len: usize,
        termination: Termination,
    ) -> Self {
        Self {
            chars,
            pos: open_idx + 1,
            open: chars[open_idx].0,
            input_len,
            termination,
            mode: Mode::Initial,
            nest: 0,
            params: Vec::new(),
            current: String::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos + 1).map(|&(_, c)| c)
    }

    fn next_param(&mut self) {
        self.params.push(std::mem::take(&mut self.current));
    }

    fn finish(mut self, end: usize) -> ParamList {
        self.next_param();
        ParamList {
            params: self.params,
            end,
        }
    }

    /// Run to the final `]`. The first error ends the scan.
    pub(crate) fn run(mut self) -> Result<ParamList, KeyError> {
        while let Some(&(_, c)) = self.chars.get(self.pos) {
            match self.mode {
                Mode::Initial => match c {
                    ',' if self.nest == 0 => self.next_param(),
                    ',' => self.current.push(c),
                    '"' => {
                        if self.nest > 0 {
                            self.current.push(c);
                        }
                        self.mode = Mode::Quoted;
                    }
                    '[' => {
                        self.current.push(c);
                        self.nest += 1;
                    }
                    ']' if self.nest > 0 => {
                        self.nest -= 1;
                        self.current.push(c);
                        self.after_closing()?;
                    }
                    ']' => {
                        if let Some(end) = self.close_list()? {
                            return Ok(self.finish(end));
                        }
                    }
                    ' ' => {
                        if self.nest > 0 {
                            self.current.push(c);
                        }
                    }
                    _ => {
                        self.current.push(c);
                        self.mode = Mode::Unquoted;
                    }
                },
                Mode::Quoted => {
                    if c == '"' {
                        if self.nest > 0 {
                            self.current.push(c);
                        }
                        self.mode = Mode::Initial;
                        self.after_closing()?;
                    } else if c == '\\' && self.peek() == Some('"') {
                        // Nested groups keep the escape so they re-parse the same.
                        if self.nest > 0 {
                            self.current.push('\\');
                        }
                        self.current.push('"');
                        self.pos += 1;
                    } else {
                        self.current.push(c);
                    }
                }
                Mode::Unquoted => {
                    if c == ',' || c == ']' {
                        // Reprocess the separator in initial mode.
                        self.mode = Mode::Initial;
                        continue;
                    }
                    self.current.push(c);
                }
            }
            self.pos += 1;
        }

        Err(KeyError::Unterminated {
            span: Span::new(self.open, self.input_len),
        })
    }

    /// After a closing quote or nested `]`: skip spaces, then only `,` or
    /// `]` may follow. End of input is left to the main loop.
    fn after_closing(&mut self) -> Result<(), KeyError> {
        while self.peek() == Some(' ') {
            self.pos += 1;
            if self.nest > 0 {
                self.current.push(' ');
            }
        }
        match self.chars.get(self.pos + 1) {
            None | Some((_, ',' | ']')) => Ok(()),
            Some(&(offset, ch)) => Err(KeyError::UnexpectedCharacter {
                ch,
                position: self.pos + 2,
                span: char_span(offset, ch),
            }),
        }
    }

    /// Handle a top-level `]`. Returns the end offset when the list is
    /// complete, `None` when `][` continues it as a separator.
    fn close_list(&mut self) -> Result<Option<usize>, KeyError> {
        let end = self.chars[self.pos].0 + 1;
        match self.chars.get(self.pos + 1) {
            Some((_, '[')) => {
                self.next_param();
                self.pos += 1;
                Ok(None)
            }
            None => Ok(Some(end)),
            Some(_) if self.termination == Termination::Embedded => Ok(Some(end)),
            Some(&(offset, ch)) => Err(KeyError::TrailingCharacter {
                ch,
                position: self.pos + 2,
                span: char_span(offset, ch),
            }),
        }
    }
}
