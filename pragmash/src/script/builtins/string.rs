//! `string` module.
//!
//! Lengths and `ord`/`chr` work on UTF-8 bytes; `substr`, `padzero` and
//! `chars` work on characters.

use regex::Regex;

use crate::script::dispatch::{Registry, Rest};

const MODULE: &str = "string";

pub fn register(r: &mut Registry) {
    r.register(MODULE, "chars", chars);
    r.register(MODULE, "chr", chr);
    r.register(MODULE, "echo", |Rest(args): Rest<String>| args.join(" "));
    r.register(MODULE, "escape", escape);
    r.register(MODULE, "hasprefix", |s: String, prefix: String| s.starts_with(&prefix));
    r.register(MODULE, "hassuffix", |s: String, suffix: String| s.ends_with(&suffix));
    r.register(MODULE, "isdigit", |s: String| single_char(&s).is_some_and(char::is_numeric));
    r.register(MODULE, "isletter", |s: String| single_char(&s).is_some_and(char::is_alphabetic));
    r.register(MODULE, "join", |Rest(args): Rest<String>| args.concat());
    r.register(MODULE, "len", |s: String| s.len());
    r.register(MODULE, "lowercase", |Rest(args): Rest<String>| args.join(" ").to_lowercase());
    r.register(MODULE, "match", find_submatches);
    r.register(MODULE, "ord", |s: String| s.bytes().map(i64::from).collect::<Vec<i64>>());
    r.register(MODULE, "padzero", padzero);
    r.register(MODULE, "rep", |s: String, old: String, new: String| s.replace(&old, &new));
    r.register(MODULE, "repreg", repreg);
    r.register(MODULE, "substr", substr);
    r.register(MODULE, "unescape", unescape);
    r.register(MODULE, "uppercase", |Rest(args): Rest<String>| args.join(" ").to_uppercase());
}

/// One element per character; a newline becomes the two characters `\n`.
fn chars(s: String) -> Vec<String> {
    s.chars()
        .map(|c| if c == '\n' { "\\n".to_owned() } else { c.to_string() })
        .collect()
}

/// Bytes to string; every code must be a byte and the result valid UTF-8.
fn chr(codes: Vec<i64>) -> Result<String, String> {
    let bytes = codes
        .into_iter()
        .map(|code| u8::try_from(code).map_err(|_| format!("byte out of range: {code}")))
        .collect::<Result<Vec<u8>, String>>()?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

fn escape(s: String) -> String {
    s.replace('\\', "\\\\").replace('\n', "\\n")
}

fn unescape(s: String) -> String {
    s.replace("\\n", "\n").replace("\\\\", "\\")
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Every match of `expr` in `haystack`, each followed by its capture groups,
/// flattened into one list.  Unmatched groups contribute empty strings.
fn find_submatches(expr: String, haystack: String) -> Result<Vec<String>, regex::Error> {
    let re = Regex::new(&expr)?;
    let mut out = Vec::new();
    for caps in re.captures_iter(&haystack) {
        for group in caps.iter() {
            out.push(group.map_or_else(String::new, |m| m.as_str().to_owned()));
        }
    }
    Ok(out)
}

/// Widths above this are refused.
pub const PADZERO_LIMIT: i64 = 1 << 16;

/// Left-pad with zeros to `width` characters.
fn padzero(width: i64, s: String) -> Result<String, String> {
    if width > PADZERO_LIMIT {
        return Err(format!("width too big: {width}"));
    }
    let width = usize::try_from(width).unwrap_or(0);
    Ok(format!("{s:0>width$}"))
}

/// Replace every match; `$1`, `${name}` in the replacement expand.
fn repreg(s: String, expr: String, replacement: String) -> Result<String, regex::Error> {
    let re = Regex::new(&expr)?;
    Ok(re.replace_all(&s, replacement.as_str()).into_owned())
}

/// Characters `start..end`, both clamped into range; `end` defaults to the
/// length.
fn substr(s: String, start: i64, end: Option<i64>) -> String {
    let len = s.chars().count();
    let clamp = |i: i64| usize::try_from(i).unwrap_or(0).min(len);
    let start = clamp(start);
    let end = end.map_or(len, clamp).max(start);
    s.chars().skip(start).take(end - start).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
