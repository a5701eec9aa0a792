/// End-to-end tests through the public library API: source text in, parsed
/// lines and evaluated values out.

use pragmash::error::{DispatchError, ReadError, SyntaxError};
use pragmash::script::{
    check_block_balance, evaluate_condition, line_condition, parse_line, parse_script, run_line,
    Registry, Token,
};

fn eval(src: &str) -> Result<String, DispatchError> {
    let line = parse_line(src, 1).expect("parse");
    run_line(&line, &Registry::standard())
}

// ── Parsing ───────────────────────────────────────────────────────────────────

#[test]
fn group_of_add() {
    let line = parse_line("(add 1 2)", 1).unwrap();
    assert_eq!(
        line.tokens,
        [Token::Group(vec![Token::bare("add"), Token::bare("1"), Token::bare("2")])]
    );
}

#[test]
fn parse_errors() {
    assert_eq!(parse_line("()", 1), Err(SyntaxError::EmptyParens));
    assert_eq!(parse_line("(add 1", 1), Err(SyntaxError::MissingCloseParen));
    assert_eq!(parse_line("if a b", 1), Err(SyntaxError::MissingOpenCurlyBrace));
    assert_eq!(parse_line("echo \\8", 1), Err(SyntaxError::InvalidEscape('8')));
    assert_eq!(parse_line("echo \\x4", 1), Err(SyntaxError::EscapeUnderflow));
}

#[test]
fn escapes_decode() {
    let line = parse_line("echo \\x41 \\101 a\\nb", 1).unwrap();
    let texts: Vec<&str> = line.tokens.iter().filter_map(Token::text).collect();
    assert_eq!(texts, ["echo", "A", "A", "a\nb"]);
    assert!(line.tokens[0].is_bare());
    assert!(!line.tokens[1].is_bare());
}

#[test]
fn whole_script_structure() {
    let src = "\
# comment \\
set x 1
while not (= (get x) 3) {
    set x (+ (get x) \\
1)
} 
";
    let lines = parse_script(src).unwrap();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0].number, 2);
    assert!(lines[1].block_open);
    assert_eq!(lines[2].number, 4);
    assert!(lines[3].block_close);
    assert_eq!(lines[3].number, 6);
    assert_eq!(check_block_balance(&lines), Ok(()));
}

#[test]
fn script_error_has_line_number() {
    let err = parse_script("echo a\necho b\necho c)d\n").unwrap_err();
    assert!(matches!(err, ReadError::Syntax { line: 3, .. }), "{err:?}");
}

// ── Evaluation ────────────────────────────────────────────────────────────────

#[test]
fn exact_third() {
    assert_eq!(eval("/ 1 3").unwrap(), "1/3");
    assert_eq!(eval("* (/ 1 3) 3").unwrap(), "1");
    assert_eq!(eval("= (* (/ 1 3) 3) 1").unwrap(), "true");
}

#[test]
fn mixed_exactness() {
    assert_eq!(eval("+ 1/2 0.5").unwrap(), "1.0");
    assert_eq!(eval("<= 3 3.0").unwrap(), "true");
}

#[test]
fn factorials() {
    assert_eq!(eval("factorial 5").unwrap(), "120");
    assert!(eval("factorial -1").is_err());
    let half: f64 = eval("factorial 1.5").unwrap().parse().unwrap();
    assert!((half - 1.329_340_388_179_137).abs() < 1e-12);
}

#[test]
fn list_round_trip() {
    assert_eq!(eval("subscript (chars hello) 1").unwrap(), "e");
    assert_eq!(eval("chr (ord hi)").unwrap(), "hi");
    assert_eq!(eval("len (match '[a-z]+' 'ab cd')").unwrap(), "5");
}

#[test]
fn errors_are_plain_strings() {
    assert_eq!(eval("sqrt -4").unwrap_err().to_string(), "cannot represent imaginary numbers");
    assert_eq!(eval("subscript a 5").unwrap_err().to_string(), "subscript out of bounds: 5");
    let err = eval("add 1 x").unwrap_err();
    assert!(matches!(err, DispatchError::Coerce { position: 2, .. }));
}

#[test]
fn conditions_from_lines() {
    let registry = Registry::standard();
    let check = |src: &str| {
        let line = parse_line(src, 1).unwrap();
        evaluate_condition(&line_condition(&line).unwrap(), &registry).unwrap()
    };
    assert!(check("if {"));
    assert!(!check("if '' {"));
    assert!(check("if a {"));
    assert!(check("if a a a {"));
    assert!(!check("if a a b {"));
    assert!(check("if not a a b {"));
    assert!(check("while (+ 1 1) 2 {"));
}
