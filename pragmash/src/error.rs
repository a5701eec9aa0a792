//! Error types shared across the crate.
//!
//! Two tiers, mirroring when the failure happens:
//!
//! | Tier        | Types                                   | Effect                        |
//! |-------------|-----------------------------------------|-------------------------------|
//! | parse time  | [`SyntaxError`], [`ReadError`]          | aborts the current line       |
//! | evaluation  | [`NumberError`], [`CoerceError`], [`DispatchError`] | aborts the current command |
//!
//! Every value is built fresh at the failure site and carries whatever context
//! its message needs.

use std::fmt;

use thiserror::Error;

// ── Parse time ────────────────────────────────────────────────────────────────

/// A structural error found while lexing one logical line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("missing string terminator")]
    MissingStringTerminator,
    #[error("unexpected ')'")]
    UnexpectedCloseParen,
    #[error("missing close paren")]
    MissingCloseParen,
    #[error("empty parens")]
    EmptyParens,
    #[error("missing open curly brace")]
    MissingOpenCurlyBrace,
    #[error("missing whitespace before {found:?}")]
    MissingWhitespace { found: char },
    #[error("escape code is too short")]
    EscapeUnderflow,
    #[error("invalid escape character: {0:?}")]
    InvalidEscape(char),
    #[error("invalid code point in escape: {digits:?}")]
    InvalidCodePoint { digits: String },
}

/// Failure while pulling logical lines out of a script.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: EOF after line continuation")]
    EofAfterContinuation { line: usize },
    #[error("line {line}: {source}")]
    Syntax {
        line: usize,
        #[source]
        source: SyntaxError,
    },
}

impl ReadError {
    /// The syntax error kind, if this is a syntax failure.
    pub fn syntax(&self) -> Option<&SyntaxError> {
        match self {
            ReadError::Syntax { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Unbalanced block structure across a whole script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("line {line}: '}}' without a matching block")]
    UnmatchedClose { line: usize },
    #[error("line {line}: block is never closed")]
    Unclosed { line: usize },
}

// ── Evaluation time ───────────────────────────────────────────────────────────

/// Numeric parse and domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("invalid number: {0:?}")]
    Parse(String),
    #[error("divide by zero")]
    DivideByZero,
    #[error("argument too big")]
    ArgumentTooBig,
    #[error("cannot compute gamma result")]
    Gamma,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("cannot represent imaginary numbers")]
    Imaginary,
    #[error("invalid base")]
    InvalidBase,
}

/// Failure turning one raw string argument into its declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("missing argument")]
    Missing,
    #[error(transparent)]
    Number(#[from] NumberError),
    #[error("not an integer: {0:?}")]
    NotInteger(String),
    #[error("list element {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<CoerceError>,
    },
}

/// How many arguments a builtin accepts, for arity messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Exactly(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Exactly(n) => write!(f, "{n}"),
            Expected::Between(lo, hi) => write!(f, "{lo} to {hi}"),
            Expected::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// The catchable error produced by a failed command invocation.
///
/// `to_string()` yields the plain-string value a `catch` block receives; for a
/// builtin's own failure that is exactly the builtin's message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("{name}: expected {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: Expected,
        got: usize,
    },
    #[error("{name}: argument {position}: {source}")]
    Coerce {
        name: String,
        position: usize,
        #[source]
        source: CoerceError,
    },
    #[error("{message}")]
    Failed { name: String, message: String },
}

impl DispatchError {
    /// Name of the builtin involved, when one was resolved.
    pub fn command(&self) -> &str {
        match self {
            DispatchError::UnknownCommand(name)
            | DispatchError::Arity { name, .. }
            | DispatchError::Coerce { name, .. }
            | DispatchError::Failed { name, .. } => name,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
