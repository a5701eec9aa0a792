//! Arbitrary-precision numeric tower.
//!
//! A [`Number`] is exactly one of:
//!
//! | Variant    | Representation               | Exact? |
//! |------------|------------------------------|--------|
//! | `Integer`  | [`BigInt`]                   | yes    |
//! | `Rational` | [`BigRational`], lowest terms, denominator > 1 | yes |
//! | `Inexact`  | `f64`                        | no     |
//!
//! Exact operands stay exact through `+ - * /`; any inexact operand makes the
//! result inexact.  String form: integers as plain digits, rationals as
//! `num/den`, floats in shortest round-trip form with a `.` or an exponent
//! (`3.0`, `1e16`, `inf`, `NaN`), so the string form never reads back as
//! exact.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{FromPrimitive, One, Signed, ToPrimitive, Zero};

use crate::error::NumberError;

/// Factorials at or above this argument are refused.
pub const FACTORIAL_LIMIT: u32 = 65536;

/// Exact powers whose result would need more bits than this are computed in
/// floating point instead.
pub const POW_BITS_LIMIT: u64 = 1 << 20;

/// A script number.
#[derive(Debug, Clone)]
pub enum Number {
    Integer(BigInt),
    /// Never integral: integral results are stored as `Integer`.
    Rational(BigRational),
    Inexact(f64),
}

impl Default for Number {
    fn default() -> Self {
        Number::Integer(BigInt::zero())
    }
}

// ── Construction & conversion ─────────────────────────────────────────────────

impl Number {
    pub fn from_i64(n: i64) -> Self {
        Number::Integer(BigInt::from(n))
    }

    pub fn from_f64(x: f64) -> Self {
        Number::Inexact(x)
    }

    pub fn from_bigint(n: BigInt) -> Self {
        Number::Integer(n)
    }

    /// Canonicalise a rational: integral values become `Integer`.
    pub fn from_rational(r: BigRational) -> Self {
        if r.is_integer() {
            Number::Integer(r.to_integer())
        } else {
            Number::Rational(r)
        }
    }

    pub fn is_exact(&self) -> bool {
        !matches!(self, Number::Inexact(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Integer(n) => n.is_zero(),
            Number::Rational(r) => r.is_zero(),
            Number::Inexact(x) => *x == 0.0,
        }
    }

    /// The integer value of an integral number, including finite integral
    /// floats.
    pub fn as_integer(&self) -> Option<BigInt> {
        match self {
            Number::Integer(n) => Some(n.clone()),
            Number::Rational(_) => None,
            Number::Inexact(x) if x.is_finite() && x.fract() == 0.0 => BigInt::from_f64(*x),
            Number::Inexact(_) => None,
        }
    }

    /// The integer value when it fits in an `i64`.
    pub fn to_i64(&self) -> Option<i64> {
        self.as_integer().as_ref().and_then(ToPrimitive::to_i64)
    }

    /// Floating-point approximation; always available.
    pub fn as_float(&self) -> f64 {
        match self {
            Number::Integer(n) => bigint_to_f64(n),
            Number::Rational(r) => r
                .to_f64()
                .unwrap_or_else(|| bigint_to_f64(r.numer()) / bigint_to_f64(r.denom())),
            Number::Inexact(x) => *x,
        }
    }

    fn exact(&self) -> Option<BigRational> {
        match self {
            Number::Integer(n) => Some(BigRational::from_integer(n.clone())),
            Number::Rational(r) => Some(r.clone()),
            Number::Inexact(_) => None,
        }
    }
}

fn bigint_to_f64(n: &BigInt) -> f64 {
    n.to_f64().unwrap_or(if n.is_negative() { f64::NEG_INFINITY } else { f64::INFINITY })
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::from_i64(n)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::from_i64(i64::from(n))
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::from_f64(x)
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Number::from_bigint(n)
    }
}

impl From<BigRational> for Number {
    fn from(r: BigRational) -> Self {
        Number::from_rational(r)
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────────

impl Number {
    fn combine(
        &self,
        rhs: &Number,
        int_op: fn(&BigInt, &BigInt) -> BigInt,
        rat_op: fn(&BigRational, &BigRational) -> BigRational,
        float_op: fn(f64, f64) -> f64,
    ) -> Number {
        if let (Number::Integer(a), Number::Integer(b)) = (self, rhs) {
            return Number::Integer(int_op(a, b));
        }
        match (self.exact(), rhs.exact()) {
            (Some(a), Some(b)) => Number::from_rational(rat_op(&a, &b)),
            _ => Number::Inexact(float_op(self.as_float(), rhs.as_float())),
        }
    }

    pub fn add(&self, rhs: &Number) -> Number {
        self.combine(rhs, |a, b| a + b, |a, b| a + b, |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Number) -> Number {
        self.combine(rhs, |a, b| a - b, |a, b| a - b, |a, b| a - b)
    }

    pub fn mul(&self, rhs: &Number) -> Number {
        self.combine(rhs, |a, b| a * b, |a, b| a * b, |a, b| a * b)
    }

    /// Exact operands give an exact quotient; a zero divisor always fails.
    pub fn div(&self, rhs: &Number) -> Result<Number, NumberError> {
        if rhs.is_zero() {
            return Err(NumberError::DivideByZero);
        }
        Ok(match (self.exact(), rhs.exact()) {
            (Some(a), Some(b)) => Number::from_rational(a / b),
            _ => Number::Inexact(self.as_float() / rhs.as_float()),
        })
    }

    /// Exact only for an integer base raised to a non-negative integer, and
    /// only while the result stays under [`POW_BITS_LIMIT`].
    pub fn pow(&self, exponent: &Number) -> Number {
        if let (Number::Integer(base), Number::Integer(exp)) = (self, exponent) {
            if let Some(e) = exp.to_u32() {
                let bits = base.bits();
                if bits <= 1 || bits.saturating_mul(u64::from(e)) <= POW_BITS_LIMIT {
                    return Number::Integer(base.pow(e));
                }
            }
        }
        Number::Inexact(self.as_float().powf(exponent.as_float()))
    }

    pub fn neg(&self) -> Number {
        match self {
            Number::Integer(n) => Number::Integer(-n.clone()),
            Number::Rational(r) => Number::Rational(-r.clone()),
            Number::Inexact(x) => Number::Inexact(-x),
        }
    }

    /// Total order across variants.  Exact operands compare exactly; a float
    /// comparison is used only when one side is inexact.
    pub fn compare(&self, rhs: &Number) -> Ordering {
        if let (Number::Integer(a), Number::Integer(b)) = (self, rhs) {
            return a.cmp(b);
        }
        match (self.exact(), rhs.exact()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => {
                let (a, b) = (self.as_float(), rhs.as_float());
                a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
            }
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

// ── Derived operations ────────────────────────────────────────────────────────

impl Number {
    pub fn abs(&self) -> Number {
        match self {
            Number::Integer(n) => Number::Integer(n.abs()),
            Number::Rational(r) => Number::Rational(r.abs()),
            Number::Inexact(x) => Number::Inexact(x.abs()),
        }
    }

    pub fn floor(&self) -> Result<Number, NumberError> {
        match self {
            Number::Integer(_) => Ok(self.clone()),
            Number::Rational(r) => Ok(Number::Integer(r.floor().to_integer())),
            Number::Inexact(x) => integral(x.floor()),
        }
    }

    pub fn ceil(&self) -> Result<Number, NumberError> {
        match self {
            Number::Integer(_) => Ok(self.clone()),
            Number::Rational(r) => Ok(Number::Integer(r.ceil().to_integer())),
            Number::Inexact(x) => integral(x.ceil()),
        }
    }

    /// Rounds half up: `floor(x + 1/2)`.
    pub fn round(&self) -> Result<Number, NumberError> {
        match self {
            Number::Integer(_) => Ok(self.clone()),
            Number::Rational(r) => {
                let half = BigRational::new(BigInt::one(), BigInt::from(2));
                Ok(Number::Integer((r + half).floor().to_integer()))
            }
            Number::Inexact(x) => integral((x + 0.5).floor()),
        }
    }

    /// `n!` exactly for non-negative integral values below
    /// [`FACTORIAL_LIMIT`], including integral floats; `Γ(x + 1)` for
    /// everything else.
    pub fn factorial(&self) -> Result<Number, NumberError> {
        match self.as_integer() {
            Some(n) if !n.is_negative() => {
                let n = n
                    .to_u32()
                    .filter(|&n| n < FACTORIAL_LIMIT)
                    .ok_or(NumberError::ArgumentTooBig)?;
                Ok(Number::Integer((2..=n).fold(BigInt::one(), |acc, k| acc * k)))
            }
            _ => {
                let result = gamma(self.as_float() + 1.0);
                if result.is_finite() {
                    Ok(Number::Inexact(result))
                } else {
                    Err(NumberError::Gamma)
                }
            }
        }
    }

    /// Integral operands (floats included): exact Euclidean remainder, never
    /// negative.  Otherwise the floored float remainder `a - floor(a/b)*b`.
    pub fn modulus(&self, rhs: &Number) -> Result<Number, NumberError> {
        if rhs.is_zero() {
            return Err(NumberError::DivideByZero);
        }
        match (self.as_integer(), rhs.as_integer()) {
            (Some(a), Some(b)) => Ok(Number::Integer(a.mod_floor(&b.abs()))),
            _ => {
                let (a, b) = (self.as_float(), rhs.as_float());
                Ok(Number::Inexact(a - (a / b).floor() * b))
            }
        }
    }
}

fn integral(x: f64) -> Result<Number, NumberError> {
    BigInt::from_f64(x)
        .map(Number::Integer)
        .ok_or(NumberError::InvalidArgument)
}

/// Γ(z) by the Lanczos approximation (g = 7, 9 terms), with the reflection
/// formula below 0.5.  Poles (zero and negative integers) yield NaN.
fn gamma(z: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    const G: f64 = 7.0;

    if z.is_nan() || (z <= 0.0 && z.fract() == 0.0) {
        return f64::NAN;
    }
    if z < 0.5 {
        return std::f64::consts::PI / ((std::f64::consts::PI * z).sin() * gamma(1.0 - z));
    }
    let z = z - 1.0;
    let mut x = COEFFS[0];
    for (i, &c) in COEFFS.iter().enumerate().skip(1) {
        x += c / (z + i as f64);
    }
    let t = z + G + 0.5;
    std::f64::consts::TAU.sqrt() * t.powf(z + 0.5) * (-t).exp() * x
}

// ── String form ───────────────────────────────────────────────────────────────

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{n}"),
            Number::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Number::Inexact(x) => write!(f, "{x:?}"),
        }
    }
}

/// Parses `123`, `-7`, `+7` as integers, `n/d` as an exact rational, and
/// decimal or exponent forms (`1.5`, `2e10`) as inexact floats.  `inf`,
/// `-inf` and `NaN` read back the values they display.
impl FromStr for Number {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NumberError::Parse(s.to_owned());

        match s {
            "inf" | "+inf" => return Ok(Number::Inexact(f64::INFINITY)),
            "-inf" => return Ok(Number::Inexact(f64::NEG_INFINITY)),
            "NaN" => return Ok(Number::Inexact(f64::NAN)),
            _ => {}
        }

        if let Some(n) = parse_integer(s) {
            return Ok(Number::Integer(n));
        }
        if let Some((numer, denom)) = s.split_once('/') {
            let numer = parse_integer(numer).ok_or_else(invalid)?;
            let denom = parse_integer(denom).ok_or_else(invalid)?;
            if denom.is_zero() {
                return Err(invalid());
            }
            return Ok(Number::from_rational(BigRational::new(numer, denom)));
        }
        let float_chars = s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
        if float_chars && s.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(x) = s.parse::<f64>() {
                return Ok(Number::Inexact(x));
            }
        }
        Err(invalid())
    }
}

/// Optional sign followed by one or more ASCII digits.
fn parse_integer(s: &str) -> Option<BigInt> {
    let digits = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigInt::parse_bytes(s.as_bytes(), 10)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
