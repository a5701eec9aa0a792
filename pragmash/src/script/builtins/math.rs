//! `math` module.
//!
//! Exact arithmetic goes through [`Number`]; the transcendental functions
//! work on `f64` and reject results outside their domain instead of
//! returning NaN.

use std::f64::consts;

use crate::error::NumberError;
use crate::script::dispatch::{Registry, Rest};
use crate::script::number::Number;

const MODULE: &str = "math";

pub fn register(r: &mut Registry) {
    r.register(MODULE, "abs", |n: Number| n.abs());
    r.register(MODULE, "acos", |x: f64| in_domain(x.acos()));
    r.register(MODULE, "add", add);
    r.register(MODULE, "asin", |x: f64| in_domain(x.asin()));
    r.register(MODULE, "atan", f64::atan);
    r.register(MODULE, "atan2", f64::atan2);
    r.register(MODULE, "ceil", |n: Number| n.ceil());
    r.register(MODULE, "cos", f64::cos);
    r.register(MODULE, "div", |a: Number, b: Number| a.div(&b));
    r.register(MODULE, "exp", exp);
    r.register(MODULE, "factorial", |n: Number| n.factorial());
    r.register(MODULE, "floor", |n: Number| n.floor());
    r.register(MODULE, "log", log);
    r.register(MODULE, "mod", |a: Number, b: Number| a.modulus(&b));
    r.register(MODULE, "mul", mul);
    r.register(MODULE, "pi", || consts::PI);
    r.register(MODULE, "pow", |a: Number, b: Number| a.pow(&b));
    r.register(MODULE, "rand", rand::random::<f64>);
    r.register(MODULE, "round", |n: Number| n.round());
    r.register(MODULE, "sin", f64::sin);
    r.register(MODULE, "sqrt", sqrt);
    r.register(MODULE, "sub", |a: Number, b: Number| a.sub(&b));
}

fn in_domain(x: f64) -> Result<f64, NumberError> {
    if x.is_nan() {
        Err(NumberError::InvalidArgument)
    } else {
        Ok(x)
    }
}

fn add(Rest(nums): Rest<Number>) -> Number {
    nums.iter().fold(Number::from_i64(0), |acc, n| acc.add(n))
}

fn mul(Rest(nums): Rest<Number>) -> Number {
    nums.iter().fold(Number::from_i64(1), |acc, n| acc.mul(n))
}

/// `e` raised to the exponent; `e` itself when omitted.
fn exp(exponent: Option<f64>) -> f64 {
    exponent.map_or(consts::E, f64::exp)
}

/// `log x` is base 10; `log b x` is base `b`.
fn log(first: f64, second: Option<f64>) -> Result<f64, NumberError> {
    let (base, x) = match second {
        Some(x) => (first, x),
        None => (10.0, first),
    };
    let conversion = base.ln();
    if !conversion.is_finite() || conversion == 0.0 {
        return Err(NumberError::InvalidBase);
    }
    let ln = x.ln();
    if !ln.is_finite() {
        return Err(NumberError::InvalidArgument);
    }
    Ok(ln / conversion)
}

fn sqrt(x: f64) -> Result<f64, NumberError> {
    if x < 0.0 {
        Err(NumberError::Imaginary)
    } else {
        Ok(x.sqrt())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
