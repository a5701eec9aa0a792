//! `ops` module: the builtins behind the comparison and subscript operators.
//! `eq` compares strings; the ordering comparisons compare numbers.

use crate::script::dispatch::Registry;
use crate::script::number::Number;

const MODULE: &str = "ops";

pub fn register(r: &mut Registry) {
    r.register(MODULE, "eq", |a: String, b: String| a == b);
    r.register(MODULE, "ge", |a: Number, b: Number| a >= b);
    r.register(MODULE, "gt", |a: Number, b: Number| a > b);
    r.register(MODULE, "le", |a: Number, b: Number| a <= b);
    r.register(MODULE, "lt", |a: Number, b: Number| a < b);
    r.register(MODULE, "subscript", subscript);
}

fn subscript(list: Vec<String>, index: i64) -> Result<String, String> {
    usize::try_from(index)
        .ok()
        .and_then(|i| list.into_iter().nth(i))
        .ok_or_else(|| format!("subscript out of bounds: {index}"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
