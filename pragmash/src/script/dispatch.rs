//! Builtin dispatch.
//!
//! Every command is called the same way: a name and a list of string
//! arguments, producing a string.  Builtins are ordinary typed Rust
//! functions; [`Registry::register`] derives each one's [`BuiltinSignature`]
//! from its parameter and return types at compile time, and wraps it in a
//! closure that coerces the raw strings going in and converts the result
//! coming out.
//!
//! | Rust parameter | Kind      | Coercion                              |
//! |----------------|-----------|---------------------------------------|
//! | `String`       | `Str`     | passthrough                           |
//! | `Number`       | `Number`  | [`Number`] parser                     |
//! | `bool`         | `Bool`    | non-empty                             |
//! | `i64`          | `Int`     | number that is an exact integer       |
//! | `f64`          | `Float`   | any number, approximated              |
//! | `Vec<String>`  | `StrList` | split on `\n`                         |
//! | `Vec<i64>`     | `IntList` | split on `\n`, each element an `Int`  |
//! | `Option<T>`    | optional  | omitted → `None`                      |
//! | `Rest<T>`      | variadic  | all remaining arguments               |
//!
//! A builtin returning `Result<T, E>` is fallible: its `Err` aborts the call
//! with the error's message.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::error::{CoerceError, DispatchError, Expected};

use super::number::Number;
use super::value::{from_bool, join_list, split_list, truthy};

/// Symbolic operator names and the builtins they stand for.
pub const OPERATOR_ALIASES: [(&str, &str); 11] = [
    ("+", "add"),
    ("/", "div"),
    ("*", "mul"),
    ("-", "sub"),
    ("**", "pow"),
    ("[]", "subscript"),
    ("<=", "le"),
    (">=", "ge"),
    ("<", "lt"),
    (">", "gt"),
    ("=", "eq"),
];

// ── Signatures ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Str,
    Number,
    Bool,
    Int,
    Float,
    StrList,
    IntList,
}

/// How many arguments a parameter consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Required,
    /// Zero or one; only valid at the tail.
    Optional,
    /// Zero or more; only valid last.
    Variadic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub kind: ParamKind,
    pub arity: Arity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinSignature {
    pub name: String,
    pub params: Vec<ParamSpec>,
    pub fallible: bool,
}

impl BuiltinSignature {
    /// Number of arguments that must be supplied.
    pub fn min_args(&self) -> usize {
        self.params.iter().filter(|p| p.arity == Arity::Required).count()
    }

    /// Upper bound, or `None` with a variadic tail.
    pub fn max_args(&self) -> Option<usize> {
        if self.params.iter().any(|p| p.arity == Arity::Variadic) {
            None
        } else {
            Some(self.params.len())
        }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min_args() && self.max_args().map_or(true, |max| count <= max)
    }

    pub fn expected(&self) -> Expected {
        match (self.min_args(), self.max_args()) {
            (min, None) => Expected::AtLeast(min),
            (min, Some(max)) if min == max => Expected::Exactly(min),
            (min, Some(max)) => Expected::Between(min, max),
        }
    }

    /// Required parameters first, then optionals, with at most one variadic
    /// parameter in last place.
    fn is_well_formed(&self) -> bool {
        let mut seen_optional = false;
        for (i, p) in self.params.iter().enumerate() {
            match p.arity {
                Arity::Required if seen_optional => return false,
                Arity::Required => {}
                Arity::Optional => seen_optional = true,
                Arity::Variadic if i + 1 != self.params.len() => return false,
                Arity::Variadic => {}
            }
        }
        true
    }
}

// ── Argument coercion ─────────────────────────────────────────────────────────

/// Walks the raw arguments of one call.
#[derive(Debug)]
pub struct ArgCursor<'a> {
    args: &'a [String],
    pos: usize,
}

impl<'a> ArgCursor<'a> {
    pub fn new(args: &'a [String]) -> Self {
        ArgCursor { args, pos: 0 }
    }

    pub fn next(&mut self) -> Option<&'a str> {
        let arg = self.args.get(self.pos)?;
        self.pos += 1;
        Some(arg)
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.args.len()
    }

    /// 1-based position of the argument taken last.
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// A type a builtin can take as a parameter.
pub trait Param: Sized {
    const KIND: ParamKind;
    const ARITY: Arity = Arity::Required;

    /// Convert one raw argument.
    fn coerce(raw: &str) -> Result<Self, CoerceError>;

    /// Consume this parameter's share of the arguments.
    fn take(cursor: &mut ArgCursor<'_>) -> Result<Self, CoerceError> {
        let raw = cursor.next().ok_or(CoerceError::Missing)?;
        Self::coerce(raw)
    }
}

impl Param for String {
    const KIND: ParamKind = ParamKind::Str;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.to_owned())
    }
}

impl Param for Number {
    const KIND: ParamKind = ParamKind::Number;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.parse()?)
    }
}

impl Param for bool {
    const KIND: ParamKind = ParamKind::Bool;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(truthy(raw))
    }
}

impl Param for i64 {
    const KIND: ParamKind = ParamKind::Int;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        let n: Number = raw.parse()?;
        n.to_i64().ok_or_else(|| CoerceError::NotInteger(raw.to_owned()))
    }
}

impl Param for f64 {
    const KIND: ParamKind = ParamKind::Float;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.parse::<Number>()?.as_float())
    }
}

impl Param for Vec<String> {
    const KIND: ParamKind = ParamKind::StrList;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(split_list(raw).into_iter().map(str::to_owned).collect())
    }
}

impl Param for Vec<i64> {
    const KIND: ParamKind = ParamKind::IntList;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        split_list(raw)
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                i64::coerce(item).map_err(|e| CoerceError::Element { index, source: Box::new(e) })
            })
            .collect()
    }
}

impl<T: Param> Param for Option<T> {
    const KIND: ParamKind = T::KIND;
    const ARITY: Arity = Arity::Optional;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        T::coerce(raw).map(Some)
    }

    fn take(cursor: &mut ArgCursor<'_>) -> Result<Self, CoerceError> {
        match cursor.next() {
            Some(raw) => T::coerce(raw).map(Some),
            None => Ok(None),
        }
    }
}

/// Variadic tail: every remaining argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Rest<T>(pub Vec<T>);

impl<T: Param> Param for Rest<T> {
    const KIND: ParamKind = T::KIND;
    const ARITY: Arity = Arity::Variadic;

    fn coerce(raw: &str) -> Result<Self, CoerceError> {
        Ok(Rest(vec![T::coerce(raw)?]))
    }

    fn take(cursor: &mut ArgCursor<'_>) -> Result<Self, CoerceError> {
        let mut items = Vec::new();
        while let Some(raw) = cursor.next() {
            items.push(T::coerce(raw)?);
        }
        Ok(Rest(items))
    }
}

// ── Result conversion ─────────────────────────────────────────────────────────

/// A type a builtin can return.
pub trait IntoOutcome {
    const FALLIBLE: bool = false;

    fn into_outcome(self) -> Result<String, String>;
}

impl IntoOutcome for String {
    fn into_outcome(self) -> Result<String, String> {
        Ok(self)
    }
}

impl IntoOutcome for bool {
    fn into_outcome(self) -> Result<String, String> {
        Ok(from_bool(self))
    }
}

impl IntoOutcome for Number {
    fn into_outcome(self) -> Result<String, String> {
        Ok(self.to_string())
    }
}

impl IntoOutcome for f64 {
    fn into_outcome(self) -> Result<String, String> {
        Ok(Number::from_f64(self).to_string())
    }
}

impl IntoOutcome for i64 {
    fn into_outcome(self) -> Result<String, String> {
        Ok(self.to_string())
    }
}

impl IntoOutcome for usize {
    fn into_outcome(self) -> Result<String, String> {
        Ok(self.to_string())
    }
}

impl IntoOutcome for Vec<String> {
    fn into_outcome(self) -> Result<String, String> {
        Ok(join_list(self))
    }
}

impl IntoOutcome for Vec<i64> {
    fn into_outcome(self) -> Result<String, String> {
        Ok(join_list(self.iter().map(i64::to_string)))
    }
}

impl<T: IntoOutcome, E: fmt::Display> IntoOutcome for Result<T, E> {
    const FALLIBLE: bool = true;

    fn into_outcome(self) -> Result<String, String> {
        self.map_err(|e| e.to_string())?.into_outcome()
    }
}

// ── Builtins ──────────────────────────────────────────────────────────────────

/// Failure inside a wrapped builtin, before the registry attaches its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    Coerce { position: usize, source: CoerceError },
    Failed(String),
}

/// Type-erased builtin body.
pub type Call = Box<dyn Fn(&[String]) -> Result<String, CallError> + Send + Sync>;

/// Functions that can be registered as builtins.  `Marker` only separates
/// the implementations for different arities.
pub trait IntoBuiltin<Marker> {
    fn params() -> Vec<ParamSpec>;
    fn fallible() -> bool;
    fn into_call(self) -> Call;
}

macro_rules! impl_into_builtin {
    ($($param:ident),*) => {
        impl<Func, Out, $($param,)*> IntoBuiltin<fn($($param,)*) -> Out> for Func
        where
            Func: Fn($($param),*) -> Out + Send + Sync + 'static,
            Out: IntoOutcome,
            $($param: Param,)*
        {
            fn params() -> Vec<ParamSpec> {
                vec![$(ParamSpec { kind: $param::KIND, arity: $param::ARITY }),*]
            }

            fn fallible() -> bool {
                Out::FALLIBLE
            }

            #[allow(non_snake_case, unused_variables, unused_mut)]
            fn into_call(self) -> Call {
                Box::new(move |args: &[String]| {
                    let mut cursor = ArgCursor::new(args);
                    $(
                        let $param = <$param as Param>::take(&mut cursor)
                            .map_err(|source| CallError::Coerce { position: cursor.position(), source })?;
                    )*
                    (self)($($param),*).into_outcome().map_err(CallError::Failed)
                })
            }
        }
    };
}

impl_into_builtin!();
impl_into_builtin!(A);
impl_into_builtin!(A, B);
impl_into_builtin!(A, B, C);
impl_into_builtin!(A, B, C, D);

/// A registered builtin.
pub struct Builtin {
    pub module: &'static str,
    pub signature: BuiltinSignature,
    call: Call,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("module", &self.module)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Name → builtin table plus the alias rewrite table.  Built once at
/// start-up and read-only afterwards.
#[derive(Debug, Default)]
pub struct Registry {
    builtins: HashMap<String, Builtin>,
    aliases: HashMap<String, String>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The `math`, `ops` and `string` modules with the operator aliases.
    pub fn standard() -> Self {
        let mut registry = Registry::new();
        super::builtins::register_all(&mut registry);
        for (alias, target) in OPERATOR_ALIASES {
            registry.aliases.insert(alias.to_owned(), target.to_owned());
        }
        registry
    }

    /// Register `f` under `name`, replacing any earlier builtin of that name.
    pub fn register<M, F>(&mut self, module: &'static str, name: &str, f: F)
    where
        F: IntoBuiltin<M>,
    {
        let signature = BuiltinSignature {
            name: name.to_owned(),
            params: F::params(),
            fallible: F::fallible(),
        };
        debug_assert!(signature.is_well_formed(), "malformed signature for {name}");
        self.builtins.insert(
            name.to_owned(),
            Builtin { module, signature, call: f.into_call() },
        );
    }

    /// Make `alias` invoke the builtin `target`.
    pub fn add_alias(&mut self, alias: &str, target: &str) -> Result<(), DispatchError> {
        let target = self.resolve(target).to_owned();
        if !self.builtins.contains_key(&target) {
            return Err(DispatchError::UnknownCommand(target));
        }
        self.aliases.insert(alias.to_owned(), target);
        Ok(())
    }

    /// Canonical name after alias rewriting.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.builtins.get(self.resolve(name))
    }

    pub fn signature(&self, name: &str) -> Option<&BuiltinSignature> {
        self.get(name).map(|b| &b.signature)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Canonical builtin names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builtins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Call a builtin by name (or alias) with raw string arguments.
    pub fn invoke(&self, name: &str, args: &[String]) -> Result<String, DispatchError> {
        let canonical = self.resolve(name);
        let builtin = self
            .builtins
            .get(canonical)
            .ok_or_else(|| DispatchError::UnknownCommand(name.to_owned()))?;

        let signature = &builtin.signature;
        if !signature.accepts(args.len()) {
            let err = DispatchError::Arity {
                name: canonical.to_owned(),
                expected: signature.expected(),
                got: args.len(),
            };
            debug!(command = canonical, error = %err, "arity mismatch");
            return Err(err);
        }

        debug!(command = canonical, module = builtin.module, args = args.len(), "invoke");
        (builtin.call)(args).map_err(|e| {
            let err = match e {
                CallError::Coerce { position, source } => {
                    DispatchError::Coerce { name: canonical.to_owned(), position, source }
                }
                CallError::Failed(message) => {
                    DispatchError::Failed { name: canonical.to_owned(), message }
                }
            };
            debug!(command = canonical, error = %err, "builtin failed");
            err
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NumberError;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Registry {
        let mut r = Registry::new();
        r.register("test", "pair", |a: String, b: String| format!("{a}+{b}"));
        r.register("test", "neg", |n: Number| n.neg());
        r.register("test", "count", |Rest(items): Rest<String>| items.len());
        r.register("test", "tail", |head: i64, rest: Option<Vec<i64>>| {
            head + rest.unwrap_or_default().iter().sum::<i64>()
        });
        r.register("test", "halve", |n: Number| n.div(&Number::from_i64(2)));
        r.register("test", "fail", || -> Result<String, String> { Err("nope".into()) });
        r.register("test", "flag", |b: bool| !b);
        r
    }

    #[test]
    fn signature_from_types() {
        let r = sample();
        let sig = r.signature("tail").unwrap();
        assert_eq!(
            sig.params,
            [
                ParamSpec { kind: ParamKind::Int, arity: Arity::Required },
                ParamSpec { kind: ParamKind::IntList, arity: Arity::Optional },
            ]
        );
        assert!(!sig.fallible);
        assert!(r.signature("halve").unwrap().fallible);
        assert_eq!(r.signature("count").unwrap().expected(), Expected::AtLeast(0));
        assert_eq!(sig.expected(), Expected::Between(1, 2));
    }

    #[test]
    fn arity_error_names_builtin() {
        let err = sample().invoke("pair", &args(&["x"])).unwrap_err();
        assert_eq!(
            err,
            DispatchError::Arity { name: "pair".into(), expected: Expected::Exactly(2), got: 1 }
        );
        assert_eq!(err.to_string(), "pair: expected 2 argument(s), got 1");
        assert!(sample().invoke("pair", &args(&["x", "y", "z"])).is_err());
    }

    #[test]
    fn coercion_error() {
        let err = sample().invoke("neg", &args(&["abc"])).unwrap_err();
        assert_eq!(
            err,
            DispatchError::Coerce {
                name: "neg".into(),
                position: 1,
                source: CoerceError::Number(NumberError::Parse("abc".into())),
            }
        );
    }

    #[test]
    fn int_list_element_error() {
        let err = sample().invoke("tail", &args(&["1", "2\nx"])).unwrap_err();
        match err {
            DispatchError::Coerce { position: 2, source: CoerceError::Element { index: 1, .. }, .. } => {}
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn optional_list_omitted() {
        assert_eq!(sample().invoke("tail", &args(&["5"])).unwrap(), "5");
        assert_eq!(sample().invoke("tail", &args(&["5", "1\n2"])).unwrap(), "8");
        // empty string → empty list
        assert_eq!(sample().invoke("tail", &args(&["5", ""])).unwrap(), "5");
    }

    #[test]
    fn variadic() {
        let r = sample();
        assert_eq!(r.invoke("count", &[]).unwrap(), "0");
        assert_eq!(r.invoke("count", &args(&["a", "b", "c"])).unwrap(), "3");
    }

    #[test]
    fn results_converted() {
        let r = sample();
        assert_eq!(r.invoke("neg", &args(&["1/2"])).unwrap(), "-1/2");
        assert_eq!(r.invoke("flag", &args(&[""])).unwrap(), "true");
        assert_eq!(r.invoke("flag", &args(&["x"])).unwrap(), "");
        assert_eq!(r.invoke("halve", &args(&["3"])).unwrap(), "3/2");
    }

    #[test]
    fn failure_carries_message() {
        let err = sample().invoke("fail", &[]).unwrap_err();
        assert_eq!(err.to_string(), "nope");
        assert_eq!(err.command(), "fail");
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            sample().invoke("nosuch", &[]),
            Err(DispatchError::UnknownCommand("nosuch".into()))
        );
    }

    #[test]
    fn aliases() {
        let mut r = sample();
        r.add_alias("&", "pair").unwrap();
        assert_eq!(r.invoke("&", &args(&["a", "b"])).unwrap(), "a+b");
        assert!(r.add_alias("?", "missing").is_err());
        // Errors use the canonical name.
        let err = r.invoke("&", &[]).unwrap_err();
        assert_eq!(err.command(), "pair");
    }

    #[test]
    fn standard_operator_aliases() {
        let r = Registry::standard();
        for (alias, target) in OPERATOR_ALIASES {
            assert_eq!(r.resolve(alias), target);
            assert!(r.contains(alias), "{alias}");
        }
    }

    #[test]
    fn well_formed_signatures() {
        let bad = BuiltinSignature {
            name: "x".into(),
            params: vec![
                ParamSpec { kind: ParamKind::Str, arity: Arity::Variadic },
                ParamSpec { kind: ParamKind::Str, arity: Arity::Required },
            ],
            fallible: false,
        };
        assert!(!bad.is_well_formed());
        let r = Registry::standard();
        for name in r.names() {
            assert!(r.signature(name).unwrap().is_well_formed(), "{name}");
        }
    }
}
