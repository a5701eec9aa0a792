//! The pragmash scripting language core.
//!
//! Text flows through the layers in this order:
//!
//! 1. [`reader`]: physical lines → logical lines (continuations, comments)
//! 2. [`lexer`] and [`escape`]: one logical line → a [`Token`] tree
//! 3. [`syntax`]: tokens → a [`SyntaxLine`] with block-open/close flags
//! 4. [`eval`]: tokens → runnables, invoked through the [`Registry`]
//!
//! Builtins ([`builtins`]) are typed Rust functions wrapped by [`dispatch`];
//! their numeric arguments go through the [`number`] tower, and `if`/`while`
//! truthiness lives in [`condition`].
//!
//! # Quick start
//!
//! ```rust
//! use pragmash::script::{parse_line, run_line, Registry};
//!
//! let registry = Registry::standard();
//! let line = parse_line("mul (add 1 2) (div 1 3)", 1).unwrap();
//! assert_eq!(run_line(&line, &registry).unwrap(), "1");
//! ```

pub mod builtins;
pub mod condition;
pub mod dispatch;
pub mod escape;
pub mod eval;
pub mod lexer;
pub mod number;
pub mod reader;
pub mod syntax;
pub mod value;

// Re-exports for convenience.
pub use condition::Condition;
pub use dispatch::{BuiltinSignature, Registry, Rest};
pub use eval::{evaluate_condition, line_condition, run_line, Runnable};
pub use lexer::{tokenize, Token};
pub use number::Number;
pub use reader::{LineReader, LogicalLine, LogicalLineSource};
pub use syntax::{check_block_balance, parse_line, parse_script, SyntaxLine, SyntaxParser};
