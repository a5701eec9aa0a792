//! The string value convention.
//!
//! Every script value is a plain `String`.  Booleans and lists are encodings
//! on top of it:
//!
//! | Meaning | Encoding                                   |
//! |---------|--------------------------------------------|
//! | false   | `""`                                       |
//! | true    | any non-empty string; builtins emit [`TRUE`] |
//! | list    | elements joined with [`LIST_DELIMITER`]    |

/// The string builtins return for a true boolean.
pub const TRUE: &str = "true";

/// Separator between list elements.
pub const LIST_DELIMITER: char = '\n';

/// Encode a boolean.
pub fn from_bool(b: bool) -> String {
    if b {
        TRUE.to_owned()
    } else {
        String::new()
    }
}

/// Decode a boolean: non-empty is true.
pub fn truthy(value: &str) -> bool {
    !value.is_empty()
}

pub fn join_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(LIST_DELIMITER);
        }
        out.push_str(item.as_ref());
    }
    out
}

/// Split a list value.  The empty string is the empty list, so a one-element
/// list holding `""` cannot be represented.
pub fn split_list(value: &str) -> Vec<&str> {
    if value.is_empty() {
        Vec::new()
    } else {
        value.split(LIST_DELIMITER).collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bools() {
        assert_eq!(from_bool(true), "true");
        assert_eq!(from_bool(false), "");
        assert!(truthy("0"));
        assert!(truthy(" "));
        assert!(!truthy(""));
    }

    #[test]
    fn lists() {
        assert_eq!(join_list(["a", "b", "c"]), "a\nb\nc");
        assert_eq!(join_list(Vec::<String>::new()), "");
        assert_eq!(split_list("a\nb"), ["a", "b"]);
        assert!(split_list("").is_empty());
        assert_eq!(split_list("a\n"), ["a", ""]);
    }
}
