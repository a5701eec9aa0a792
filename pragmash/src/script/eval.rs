//! Command evaluation.
//!
//! Tokens become [`Runnable`]s: a literal evaluates to its text, a group is a
//! nested command whose result is substituted in place.  A command evaluates
//! its parts left to right (nested groups innermost first), then invokes the
//! first value as the command name with the rest as arguments.

use crate::error::DispatchError;

use super::condition::Condition;
use super::dispatch::Registry;
use super::lexer::Token;
use super::syntax::SyntaxLine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Runnable {
    Literal(String),
    Command(Vec<Runnable>),
}

impl From<&Token> for Runnable {
    fn from(token: &Token) -> Self {
        match token {
            Token::Literal { text, .. } => Runnable::Literal(text.clone()),
            Token::Group(children) => Runnable::Command(children.iter().map(Runnable::from).collect()),
        }
    }
}

impl Runnable {
    pub fn run(&self, registry: &Registry) -> Result<String, DispatchError> {
        match self {
            Runnable::Literal(text) => Ok(text.clone()),
            Runnable::Command(parts) => run_command(parts, registry),
        }
    }
}

/// Evaluate `parts` and invoke the first value as a command.  An empty
/// command evaluates to the empty string.
pub fn run_command(parts: &[Runnable], registry: &Registry) -> Result<String, DispatchError> {
    let values = parts
        .iter()
        .map(|part| part.run(registry))
        .collect::<Result<Vec<_>, _>>()?;
    match values.split_first() {
        Some((name, args)) => registry.invoke(name, args),
        None => Ok(String::new()),
    }
}

/// Runnables for a token slice.
pub fn runnables(tokens: &[Token]) -> Vec<Runnable> {
    tokens.iter().map(Runnable::from).collect()
}

/// Evaluate a plain (non-block) line as one command.
pub fn run_line(line: &SyntaxLine, registry: &Registry) -> Result<String, DispatchError> {
    run_command(&runnables(&line.tokens), registry)
}

/// The condition of an `if` or `while` line.
pub fn line_condition(line: &SyntaxLine) -> Option<Condition<Runnable>> {
    match line.keyword() {
        Some("if" | "while") => Some(Condition::from_tokens(line.operands(), Runnable::from)),
        _ => None,
    }
}

/// Evaluate a condition, propagating the first failing operand.
pub fn evaluate_condition(
    condition: &Condition<Runnable>,
    registry: &Registry,
) -> Result<bool, DispatchError> {
    condition.evaluate(|operand| operand.run(registry))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
