//! Token lexer for a single logical line.
//!
//! A line is a sequence of whitespace-separated tokens.  Each token is one of:
//!
//! | Input            | Token                                               |
//! |------------------|-----------------------------------------------------|
//! | `word`           | bare literal (`bare = true` unless an escape is used) |
//! | `"text"` `'text'`| quoted literal, escapes processed, never bare       |
//! | `(cmd arg …)`    | group: a nested command substituted at run time     |
//!
//! Whitespace between tokens is mandatory, except right before the `)` that
//! closes a group.

use std::fmt;

use crate::error::SyntaxError;

use super::escape::decode_escape;

// ── Token ─────────────────────────────────────────────────────────────────────

/// One lexed token: a literal string or a nested command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A string literal.  `bare` is true only when the text was written
    /// unquoted and without any escape sequence.
    Literal { text: String, bare: bool },
    /// A `( … )` group; owns its children.
    Group(Vec<Token>),
}

impl Token {
    /// An unquoted, escape-free literal.
    pub fn bare(text: impl Into<String>) -> Self {
        Token::Literal { text: text.into(), bare: true }
    }

    /// A literal produced by quoting or escaping.
    pub fn quoted(text: impl Into<String>) -> Self {
        Token::Literal { text: text.into(), bare: false }
    }

    /// Literal text, or `None` for a group.
    pub fn text(&self) -> Option<&str> {
        match self {
            Token::Literal { text, .. } => Some(text),
            Token::Group(_) => None,
        }
    }

    pub fn is_bare(&self) -> bool {
        matches!(self, Token::Literal { bare: true, .. })
    }

    /// True for a bare literal spelled exactly `word`.  Only bare literals can
    /// act as keywords or structural braces.
    pub fn is_bare_word(&self, word: &str) -> bool {
        matches!(self, Token::Literal { text, bare: true } if text == word)
    }

    /// Children of a group, or `None` for a literal.
    pub fn children(&self) -> Option<&[Token]> {
        match self {
            Token::Group(children) => Some(children),
            Token::Literal { .. } => None,
        }
    }
}

/// S-expression rendering: bare text as-is, other literals quoted, groups in
/// parentheses.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal { text, bare: true } => write!(f, "{text}"),
            Token::Literal { text, bare: false } => write!(f, "{text:?}"),
            Token::Group(children) => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}

// ── Cursor ────────────────────────────────────────────────────────────────────

/// Character cursor over the remaining text of one logical line.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// The unconsumed remainder.
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Consume whitespace; returns true if any was consumed or the input is
    /// exhausted.
    fn skip_space(&mut self) -> bool {
        if self.is_empty() {
            return true;
        }
        let mut skipped = false;
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.next();
            skipped = true;
        }
        skipped
    }

    fn require_space(&mut self) -> Result<(), SyntaxError> {
        if self.skip_space() {
            return Ok(());
        }
        match self.peek() {
            Some(found) => Err(SyntaxError::MissingWhitespace { found }),
            None => Ok(()),
        }
    }
}

// ── Lexing ────────────────────────────────────────────────────────────────────

/// Outcome of reading from the cursor; the group terminator is ordinary
/// control flow, not an error.
#[derive(Debug)]
enum Step {
    Token(Token),
    GroupEnd,
    End,
}

/// Split one logical line into its top-level tokens.
///
/// Leading whitespace is ignored.  Any failure discards the whole line.
pub fn tokenize(text: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut cursor = Cursor::new(text);
    cursor.skip_space();
    let mut tokens = Vec::new();
    while !cursor.is_empty() {
        match next_step(&mut cursor)? {
            Step::Token(token) => tokens.push(token),
            Step::GroupEnd => return Err(SyntaxError::UnexpectedCloseParen),
            Step::End => break,
        }
        cursor.require_space()?;
    }
    Ok(tokens)
}

/// Read the next token, a group terminator, or end of input.
fn next_step(cursor: &mut Cursor<'_>) -> Result<Step, SyntaxError> {
    let Some(first) = cursor.peek() else {
        return Ok(Step::End);
    };
    match first {
        '"' | '\'' => {
            cursor.next();
            let text = read_quoted(cursor, first)?;
            Ok(Step::Token(Token::Literal { text, bare: false }))
        }
        '(' => {
            cursor.next();
            Ok(Step::Token(Token::Group(read_group(cursor)?)))
        }
        ')' => {
            cursor.next();
            Ok(Step::GroupEnd)
        }
        _ => Ok(Step::Token(read_bare(cursor)?)),
    }
}

/// Body of a `( … )` group; the opening paren is already consumed.
fn read_group(cursor: &mut Cursor<'_>) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    cursor.skip_space();
    loop {
        match next_step(cursor)? {
            Step::Token(token) => tokens.push(token),
            Step::GroupEnd => break,
            Step::End => return Err(SyntaxError::MissingCloseParen),
        }
        // No whitespace is needed before the closing paren.
        if cursor.peek() == Some(')') {
            cursor.next();
            break;
        }
        cursor.require_space()?;
    }
    if tokens.is_empty() {
        return Err(SyntaxError::EmptyParens);
    }
    Ok(tokens)
}

/// Quoted string body up to the matching `quote`; the opening quote is
/// already consumed.
fn read_quoted(cursor: &mut Cursor<'_>, quote: char) -> Result<String, SyntaxError> {
    let mut text = String::new();
    loop {
        match cursor.next() {
            None => return Err(SyntaxError::MissingStringTerminator),
            Some(c) if c == quote => return Ok(text),
            Some('\\') => text.push(decode_escape(cursor)?),
            Some(c) => text.push(c),
        }
    }
}

/// Unquoted token up to whitespace or `)`, neither of which is consumed.
fn read_bare(cursor: &mut Cursor<'_>) -> Result<Token, SyntaxError> {
    let mut text = String::new();
    let mut bare = true;
    while let Some(c) = cursor.peek() {
        if c.is_whitespace() || c == ')' {
            break;
        }
        cursor.next();
        if c == '\\' {
            text.push(decode_escape(cursor)?);
            bare = false;
        } else {
            text.push(c);
        }
    }
    Ok(Token::Literal { text, bare })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<Token> {
        tokenize(src).expect("lex failed")
    }

    fn render(src: &str) -> String {
        lex(src).iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn bare_words() {
        assert_eq!(lex("echo hello world"), vec![
            Token::bare("echo"),
            Token::bare("hello"),
            Token::bare("world"),
        ]);
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        assert_eq!(lex("  a \t b  "), vec![Token::bare("a"), Token::bare("b")]);
    }

    #[test]
    fn quoted_strings_are_not_bare() {
        assert_eq!(lex(r#""if" 'x y'"#), vec![Token::quoted("if"), Token::quoted("x y")]);
        assert_eq!(lex("\"\""), vec![Token::quoted("")]);
    }

    #[test]
    fn escapes_work_in_both_quote_styles() {
        assert_eq!(lex(r#""a\tb" 'c\x41'"#), vec![Token::quoted("a\tb"), Token::quoted("cA")]);
    }

    #[test]
    fn escape_clears_bare_flag() {
        assert_eq!(lex(r"a\ b"), vec![Token::quoted("a b")]);
        // `\?` decodes to the same character but still marks the token.
        assert_eq!(lex(r"\?"), vec![Token::quoted("?")]);
        assert_eq!(lex("?"), vec![Token::bare("?")]);
        assert_eq!(lex(r"\(x"), vec![Token::quoted("(x")]);
    }

    #[test]
    fn group() {
        assert_eq!(lex("(add 1 2)"), vec![Token::Group(vec![
            Token::bare("add"),
            Token::bare("1"),
            Token::bare("2"),
        ])]);
    }

    #[test]
    fn nested_groups() {
        assert_eq!(render("echo (add 1 (mul 2 3)) done"), "echo (add 1 (mul 2 3)) done");
        assert_eq!(render("( a  b )"), "(a b)");
    }

    #[test]
    fn group_with_quoted_child() {
        assert_eq!(render(r#"(echo "x y")"#), r#"(echo "x y")"#);
    }

    #[test]
    fn empty_parens() {
        assert_eq!(tokenize("()"), Err(SyntaxError::EmptyParens));
        assert_eq!(tokenize("(  )"), Err(SyntaxError::EmptyParens));
    }

    #[test]
    fn missing_close_paren() {
        assert_eq!(tokenize("(add 1"), Err(SyntaxError::MissingCloseParen));
        assert_eq!(tokenize("(add 1 "), Err(SyntaxError::MissingCloseParen));
        assert_eq!(tokenize("("), Err(SyntaxError::MissingCloseParen));
    }

    #[test]
    fn unexpected_close_paren() {
        assert_eq!(tokenize(")"), Err(SyntaxError::UnexpectedCloseParen));
        assert_eq!(tokenize("a )"), Err(SyntaxError::UnexpectedCloseParen));
    }

    #[test]
    fn missing_whitespace() {
        assert_eq!(tokenize("a)"), Err(SyntaxError::MissingWhitespace { found: ')' }));
        assert_eq!(tokenize(r#""a"b"#), Err(SyntaxError::MissingWhitespace { found: 'b' }));
        assert_eq!(tokenize("(a)(b)"), Err(SyntaxError::MissingWhitespace { found: '(' }));
        assert_eq!(tokenize(r#"(a "b"c)"#), Err(SyntaxError::MissingWhitespace { found: 'c' }));
    }

    #[test]
    fn unterminated_string() {
        assert_eq!(tokenize("\"abc"), Err(SyntaxError::MissingStringTerminator));
        assert_eq!(tokenize("'abc\""), Err(SyntaxError::MissingStringTerminator));
    }

    #[test]
    fn escape_errors_propagate() {
        assert_eq!(tokenize(r"a\8"), Err(SyntaxError::InvalidEscape('8')));
        assert_eq!(tokenize(r"a\x4"), Err(SyntaxError::EscapeUnderflow));
        assert_eq!(tokenize(r#""a\"#), Err(SyntaxError::EscapeUnderflow));
    }

    #[test]
    fn open_paren_inside_bare_word() {
        assert_eq!(lex("a(b"), vec![Token::bare("a(b")]);
    }

    #[test]
    fn unicode_whitespace_separates() {
        assert_eq!(lex("a\u{3000}b"), vec![Token::bare("a"), Token::bare("b")]);
    }

    #[test]
    fn display_quotes_non_bare() {
        assert_eq!(Token::quoted("a\nb").to_string(), "\"a\\nb\"");
        assert_eq!(Token::bare("x").to_string(), "x");
    }

    #[test]
    fn accessors() {
        let group = Token::Group(vec![Token::bare("a")]);
        assert_eq!(group.text(), None);
        assert_eq!(group.children().map(<[Token]>::len), Some(1));
        assert!(!group.is_bare());
        assert!(Token::bare("{").is_bare_word("{"));
        assert!(!Token::quoted("{").is_bare_word("{"));
    }
}
