//! Logical-line syntax assembly.
//!
//! Turns the flat token list of one logical line into a [`SyntaxLine`] that
//! records block structure:
//!
//! - a leading bare `}` closes the enclosing block (`block_close`);
//! - a line whose first bare token is a block keyword must end in a bare `{`,
//!   which opens a new block (`block_open`).
//!
//! Both may hold at once, as in `} else {`.

use crate::error::{BlockError, ReadError, SyntaxError};

use super::lexer::{tokenize, Token};
use super::reader::{LineReader, LogicalLineSource};

/// Keywords that must be followed by a block.
pub const BLOCK_KEYWORDS: [&str; 6] = ["if", "else", "while", "try", "for", "def"];

/// One parsed logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxLine {
    /// Tokens, without the structural braces counted in the flags below.
    pub tokens: Vec<Token>,
    /// The line began with a block keyword and ended with `{`.
    pub block_open: bool,
    /// The line began with `}`.
    pub block_close: bool,
    /// Physical line number the logical line starts on (1-based).
    pub number: usize,
}

impl SyntaxLine {
    /// The leading keyword of a block-opening line.
    pub fn keyword(&self) -> Option<&str> {
        if self.block_open {
            self.tokens.first().and_then(Token::text)
        } else {
            None
        }
    }

    /// Tokens after the keyword of a block-opening line (`a b` in
    /// `if a b {`); the whole token list otherwise.
    pub fn operands(&self) -> &[Token] {
        if self.block_open {
            &self.tokens[1..]
        } else {
            &self.tokens
        }
    }
}

fn is_block_keyword(token: &Token) -> bool {
    BLOCK_KEYWORDS.iter().any(|kw| token.is_bare_word(kw))
}

/// Parse one logical line of text.
///
/// The text must contain at least one token; blank lines are filtered out by
/// [`SyntaxParser`] before they get here.
pub fn parse_line(text: &str, number: usize) -> Result<SyntaxLine, SyntaxError> {
    let mut tokens = tokenize(text)?;

    let block_close = tokens.first().is_some_and(|t| t.is_bare_word("}"));
    if block_close {
        tokens.remove(0);
    }

    let block_open = tokens.first().is_some_and(is_block_keyword);
    if block_open {
        match tokens.last() {
            Some(last) if last.is_bare_word("{") => {
                tokens.pop();
            }
            _ => return Err(SyntaxError::MissingOpenCurlyBrace),
        }
    }

    tracing::trace!(line = number, tokens = tokens.len(), block_open, block_close, "parsed line");
    Ok(SyntaxLine { tokens, block_open, block_close, number })
}

// ── SyntaxParser ──────────────────────────────────────────────────────────────

/// Pulls logical lines from a source and parses them, skipping blank lines.
#[derive(Debug)]
pub struct SyntaxParser<S> {
    source: S,
}

impl<S: LogicalLineSource> SyntaxParser<S> {
    pub fn new(source: S) -> Self {
        SyntaxParser { source }
    }

    /// Next non-blank parsed line, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<SyntaxLine>, ReadError> {
        while let Some(line) = self.source.next_line()? {
            if line.text.trim().is_empty() {
                continue;
            }
            return parse_line(&line.text, line.number)
                .map(Some)
                .map_err(|source| ReadError::Syntax { line: line.number, source });
        }
        Ok(None)
    }
}

impl<S: LogicalLineSource> Iterator for SyntaxParser<S> {
    type Item = Result<SyntaxLine, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

/// Parse a whole script held in memory.
pub fn parse_script(src: &str) -> Result<Vec<SyntaxLine>, ReadError> {
    SyntaxParser::new(LineReader::new(src.as_bytes())).collect()
}

// ── Block balance ─────────────────────────────────────────────────────────────

/// Check that every `}` closes an open block and every block is closed.
pub fn check_block_balance(lines: &[SyntaxLine]) -> Result<(), BlockError> {
    let mut open: Vec<usize> = Vec::new();
    for line in lines {
        if line.block_close && open.pop().is_none() {
            return Err(BlockError::UnmatchedClose { line: line.number });
        }
        if line.block_open {
            open.push(line.number);
        }
    }
    match open.pop() {
        Some(line) => Err(BlockError::Unclosed { line }),
        None => Ok(()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
