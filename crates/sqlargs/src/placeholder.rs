//! Dialect-aware placeholder scanning.
//!
//! A single left-to-right pass over the query text, driven by [`ScanState`].
//! Quoted literals and comments are skipped; outside them the following are
//! bind-parameter markers:
//!
//! - `?` (positional)
//! - `$1`, `$2`, ... (numbered; every occurrence counts)
//! - `:name`, `@name` (named)
//!
//! `::` (a PostgreSQL cast) and `@@` (a MySQL system variable) are consumed
//! as units so that `$1::int` and `@@version` do not produce named markers.
//! Unterminated literals and comments simply run to the end of the input.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PlaceholderKind {
    /// `?`
    Positional,
    /// `$n`
    Numbered(u32),
    /// `:name` or `@name`; the name excludes the sigil.
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    /// Byte offset of the marker in the query text.
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    SingleQuote,
    DoubleQuote,
    LineComment,
    BlockComment,
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Find every placeholder marker in `sql`, in order of appearance.
pub fn scan_placeholders(sql: &str) -> Vec<Placeholder> {
    let bytes = sql.as_bytes();
    let mut out = Vec::new();
    let mut state = ScanState::Normal;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        match state {
            ScanState::Normal => match b {
                b'\'' => state = ScanState::SingleQuote,
                b'"' => state = ScanState::DoubleQuote,
                b'-' if next == Some(b'-') => {
                    state = ScanState::LineComment;
                    i += 1;
                }
                b'/' if next == Some(b'*') => {
                    state = ScanState::BlockComment;
                    i += 1;
                }
                b'?' => out.push(Placeholder {
                    kind: PlaceholderKind::Positional,
                    offset: i,
                }),
                b'$' => {
                    let end = scan_while(bytes, i + 1, |c| c.is_ascii_digit());
                    if end > i + 1 {
                        // Digits only, so parsing fails solely on overflow.
                        let n = sql[i + 1..end].parse::<u32>().unwrap_or(u32::MAX);
                        out.push(Placeholder {
                            kind: PlaceholderKind::Numbered(n),
                            offset: i,
                        });
                        i = end;
                        continue;
                    }
                }
                b':' | b'@' if next == Some(b) => {
                    // `::type` cast or `@@variable`.
                    i += 2;
                    continue;
                }
                b':' | b'@' => {
                    let end = scan_while(bytes, i + 1, is_ident_byte);
                    if end > i + 1 {
                        out.push(Placeholder {
                            kind: PlaceholderKind::Named(sql[i + 1..end].to_string()),
                            offset: i,
                        });
                        i = end;
                        continue;
                    }
                }
                _ => {}
            },
            ScanState::SingleQuote | ScanState::DoubleQuote => {
                let quote = if state == ScanState::SingleQuote {
                    b'\''
                } else {
                    b'"'
                };
                if b == b'\\' {
                    // Escaped character; may run past the end on a trailing backslash.
                    i += 1;
                } else if b == quote {
                    state = ScanState::Normal;
                }
            }
            ScanState::LineComment => {
                if b == b'\n' {
                    state = ScanState::Normal;
                }
            }
            ScanState::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    state = ScanState::Normal;
                    i += 1;
                }
            }
        }

        i += 1;
    }

    out
}

/// Number of placeholder markers in `sql` (total occurrences).
pub fn count_placeholders(sql: &str) -> usize {
    scan_placeholders(sql).len()
}

fn scan_while(bytes: &[u8], start: usize, pred: impl Fn(u8) -> bool) -> usize {
    let mut end = start;
    while end < bytes.len() && pred(bytes[end]) {
        end += 1;
    }
    end
}
