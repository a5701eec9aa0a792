//! Truthiness for `if` and `while`.
//!
//! | Operands      | Positive form                 |
//! |---------------|-------------------------------|
//! | none          | true                          |
//! | one           | true iff the value is non-empty |
//! | two or more   | true iff every value equals the first |
//!
//! The negated form (`if not …`) is the complement over the same operands.

use super::lexer::Token;
use super::value::truthy;

/// Leading literal that selects the negated form.
pub const NOT: &str = "not";

/// Truth of already-evaluated operands.
pub fn truth<S: AsRef<str>>(values: &[S]) -> bool {
    match values {
        [] => true,
        [only] => truthy(only.as_ref()),
        [first, rest @ ..] => rest.iter().all(|v| v.as_ref() == first.as_ref()),
    }
}

pub fn negated_truth<S: AsRef<str>>(values: &[S]) -> bool {
    !truth(values)
}

/// A condition over operands of type `R` that still have to be evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition<R> {
    operands: Vec<R>,
    negated: bool,
}

impl<R> Condition<R> {
    pub fn new(operands: Vec<R>, negated: bool) -> Self {
        Condition { operands, negated }
    }

    /// Build from the tokens after a keyword.  A first literal spelled `not`
    /// is always taken as the marker and dropped, quoted or not; a value
    /// `not` in that position has to come from a substitution.
    pub fn from_tokens<'t, F>(tokens: &'t [Token], build: F) -> Self
    where
        F: FnMut(&'t Token) -> R,
    {
        let (negated, operands) = match tokens.split_first() {
            Some((first, rest)) if first.text() == Some(NOT) => (true, rest),
            _ => (false, tokens),
        };
        Condition { operands: operands.iter().map(build).collect(), negated }
    }

    pub fn operands(&self) -> &[R] {
        &self.operands
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Evaluate operands left to right, stopping at the first value that
    /// differs from the first operand.  Errors from `eval` propagate.
    pub fn evaluate<E, F>(&self, mut eval: F) -> Result<bool, E>
    where
        F: FnMut(&R) -> Result<String, E>,
    {
        let positive = match self.operands.as_slice() {
            [] => true,
            [only] => truthy(&eval(only)?),
            [first, rest @ ..] => {
                let first = eval(first)?;
                let mut all_equal = true;
                for operand in rest {
                    if eval(operand)? != first {
                        all_equal = false;
                        break;
                    }
                }
                all_equal
            }
        };
        Ok(positive != self.negated)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
