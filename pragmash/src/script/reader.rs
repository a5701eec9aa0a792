//! Logical line reader.
//!
//! Converts physical lines into logical lines for the syntax parser:
//!
//! - a line ending in an odd number of backslashes continues onto the next
//!   physical line; the backslash is removed and the next line is appended
//!   verbatim, leading whitespace included;
//! - a line whose first non-whitespace character is `#` is a comment and is
//!   dropped, even when it ends in a backslash;
//! - a continued line is never checked for `#`: once joined, a leading `#` is
//!   ordinary text.

use std::io::BufRead;

use crate::error::ReadError;

/// One logical line and the physical line number it starts on (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    pub text: String,
    pub number: usize,
}

/// Source of logical lines consumed by the syntax parser.
pub trait LogicalLineSource {
    /// Next logical line, or `None` at end of input.
    fn next_line(&mut self) -> Result<Option<LogicalLine>, ReadError>;
}

impl<S: LogicalLineSource + ?Sized> LogicalLineSource for &mut S {
    fn next_line(&mut self) -> Result<Option<LogicalLine>, ReadError> {
        (**self).next_line()
    }
}

/// [`LogicalLineSource`] over any buffered reader.
#[derive(Debug)]
pub struct LineReader<R> {
    input: R,
    physical: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(input: R) -> Self {
        LineReader { input, physical: 0 }
    }

    /// Number of physical lines consumed so far.
    pub fn physical_line(&self) -> usize {
        self.physical
    }

    fn read_physical(&mut self) -> Result<Option<String>, ReadError> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.physical += 1;
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }
}

impl<R: BufRead> LogicalLineSource for LineReader<R> {
    fn next_line(&mut self) -> Result<Option<LogicalLine>, ReadError> {
        while let Some(mut text) = self.read_physical()? {
            if is_comment(&text) {
                continue;
            }
            let number = self.physical;
            while continues(&text) {
                text.pop();
                match self.read_physical()? {
                    Some(next) => text.push_str(&next),
                    None => return Err(ReadError::EofAfterContinuation { line: number }),
                }
            }
            return Ok(Some(LogicalLine { text, number }));
        }
        Ok(None)
    }
}

fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

/// An odd run of trailing backslashes ends in an unescaped one.
fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

// ── Tests ─────────────────────────────────────────────────────────────────────
