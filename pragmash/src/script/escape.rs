//! Backslash escape decoding.
//!
//! Called by the lexer after it has consumed a `\`; decodes exactly one
//! escape sequence into a single character.
//!
//! | Sequence                  | Result                                  |
//! |---------------------------|-----------------------------------------|
//! | `\(` `\)` `\?` `\'` `\"` `\ ` `\\` | the character itself           |
//! | `\a` `\b` `\f` `\n` `\r` `\t` `\v` | BEL, BS, FF, LF, CR, TAB, VT   |
//! | `\xNN`                    | code point from 2 hex digits            |
//! | `\uNNNN`                  | code point from 4 hex digits            |
//! | `\UNNNNNNNN`              | code point from 8 hex digits            |
//! | `\N`, `\NN`, `\NNN`       | octal code point (digits 0-7, max 377)  |

use crate::error::SyntaxError;

use super::lexer::Cursor;

/// Decode one escape sequence; the leading backslash is already consumed.
pub fn decode_escape(cursor: &mut Cursor<'_>) -> Result<char, SyntaxError> {
    let first = cursor.next().ok_or(SyntaxError::EscapeUnderflow)?;
    match first {
        '(' | ')' | '?' | '\'' | '"' | ' ' | '\\' => Ok(first),
        'a' => Ok('\x07'),
        'b' => Ok('\x08'),
        'f' => Ok('\x0c'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        't' => Ok('\t'),
        'v' => Ok('\x0b'),
        'x' => read_hex(cursor, 2),
        'u' => read_hex(cursor, 4),
        'U' => read_hex(cursor, 8),
        '0'..='7' => read_octal(cursor, first),
        other => Err(SyntaxError::InvalidEscape(other)),
    }
}

/// Fixed-width hex escape; running out of input first is an underflow.
fn read_hex(cursor: &mut Cursor<'_>, width: usize) -> Result<char, SyntaxError> {
    let mut digits = String::with_capacity(width);
    for _ in 0..width {
        digits.push(cursor.next().ok_or(SyntaxError::EscapeUnderflow)?);
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SyntaxError::InvalidCodePoint { digits });
    }
    u32::from_str_radix(&digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or(SyntaxError::InvalidCodePoint { digits })
}

/// Variable-length octal escape: up to three digits, stopping early at the
/// first non-octal character (left unconsumed) or end of input.
fn read_octal(cursor: &mut Cursor<'_>, first: char) -> Result<char, SyntaxError> {
    let mut digits = String::from(first);
    while digits.len() < 3 {
        match cursor.peek() {
            Some(c @ '0'..='7') => {
                cursor.next();
                digits.push(c);
            }
            _ => break,
        }
    }
    match u32::from_str_radix(&digits, 8) {
        Ok(code) if code <= 0xff => char::from_u32(code).ok_or(SyntaxError::InvalidCodePoint { digits }),
        _ => Err(SyntaxError::InvalidCodePoint { digits }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
