//! `.pragmashrc` configuration file parser.
//!
//! Lines are lexed with the script lexer, so quoting and escapes work as in
//! scripts:
//!
//! | Directive | Action |
//! |-----------|--------|
//! | `alias <symbol> <command>` | make `<symbol>` invoke builtin `<command>` |
//! | Lines starting with `#` | comment, ignored |
//!
//! Errors are collected per line; the rest of the file still applies.

use std::path::Path;

use thiserror::Error;

use crate::script::dispatch::Registry;
use crate::script::lexer::{tokenize, Token};

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading or applying a config file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

/// One `alias` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDirective {
    pub line: usize,
    pub symbol: String,
    pub target: String,
}

/// Parsed rc-file settings.
#[derive(Debug, Default)]
pub struct Config {
    pub aliases: Vec<AliasDirective>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an rc file held in memory.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Config::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let tokens = match tokenize(line) {
                Ok(tokens) => tokens,
                Err(e) => {
                    errors.push(ConfigError { line: lineno, message: e.to_string() });
                    continue;
                }
            };

            match tokens.split_first() {
                Some((directive, rest)) if directive.is_bare_word("alias") => {
                    match parse_alias(rest) {
                        Some((symbol, target)) => config.aliases.push(AliasDirective {
                            line: lineno,
                            symbol,
                            target,
                        }),
                        None => errors.push(ConfigError {
                            line: lineno,
                            message: "usage: alias <symbol> <command>".to_owned(),
                        }),
                    }
                }
                Some((directive, _)) => errors.push(ConfigError {
                    line: lineno,
                    message: format!("unknown directive: {directive}"),
                }),
                None => {}
            }
        }

        (config, errors)
    }

    /// Read and parse an rc file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<ConfigError>)> {
        let s = std::fs::read_to_string(path)?;
        Ok(Self::load_str(&s))
    }

    /// Install the aliases into `registry`, in file order.  An alias whose
    /// target is not a builtin is reported and skipped.
    pub fn apply(&self, registry: &mut Registry) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        for alias in &self.aliases {
            if let Err(e) = registry.add_alias(&alias.symbol, &alias.target) {
                errors.push(ConfigError { line: alias.line, message: e.to_string() });
            }
        }
        errors
    }
}

/// Exactly two literal tokens.
fn parse_alias(tokens: &[Token]) -> Option<(String, String)> {
    match tokens {
        [symbol, target] => Some((symbol.text()?.to_owned(), target.text()?.to_owned())),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
