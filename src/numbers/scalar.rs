//! # Scalar
//!
//! Closed algebra of real and complex numbers used as the cell type of every
//! tensor, matrix and vector of the crate.
//!
//! ## Main Structures and Methods
//! - `Scalar::Real(f64)` / `Scalar::Complex(Complex64)` - the two number kinds
//! - `add`, `sub`, `mul`, `neg` through the `std::ops` traits; mixing a real and a
//!   complex operand promotes the result to `Complex`
//! - `checked_div`, `div_real` - division returns `CalcError::DivisionByZero`
//!   when the divisor has zero magnitude, it never yields `inf` or `0`
//! - `abs`, `real`, `imag`, `conjugate`
//! - `Scalar::parse("1 + 2i - 0.5")` - sums of real and imaginary terms
//!
//! Equality is structural on `(re, im)`: `Real(1.0) == Complex(1 + 0i)`.
//! `num_traits::Zero`/`One` are implemented so that `Scalar` can be stored in
//! `nalgebra` matrices.
use crate::errors::{CalcError, CalcResult};
use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, terminated},
};
use num_complex::Complex64;
use num_traits::{One, Zero};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// real or complex number
#[derive(Clone, Copy, Debug)]
pub enum Scalar {
    Real(f64),
    Complex(Complex64),
}

impl Scalar {
    pub const ZERO: Scalar = Scalar::Real(0.0);
    pub const ONE: Scalar = Scalar::Real(1.0);
    pub const NEG_ONE: Scalar = Scalar::Real(-1.0);
    /// imaginary unit
    pub const I: Scalar = Scalar::Complex(Complex64 { re: 0.0, im: 1.0 });
    pub const NEG_I: Scalar = Scalar::Complex(Complex64 { re: 0.0, im: -1.0 });

    pub fn complex(re: f64, im: f64) -> Self {
        Scalar::Complex(Complex64::new(re, im))
    }

    pub fn real(&self) -> f64 {
        match self {
            Scalar::Real(v) => *v,
            Scalar::Complex(c) => c.re,
        }
    }

    pub fn imag(&self) -> f64 {
        match self {
            Scalar::Real(_) => 0.0,
            Scalar::Complex(c) => c.im,
        }
    }

    /// magnitude
    pub fn abs(&self) -> f64 {
        match self {
            Scalar::Real(v) => v.abs(),
            Scalar::Complex(c) => c.norm(),
        }
    }

    pub fn to_complex(&self) -> Complex64 {
        match self {
            Scalar::Real(v) => Complex64::new(*v, 0.0),
            Scalar::Complex(c) => *c,
        }
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Scalar::Real(_))
    }

    pub fn is_zero(&self) -> bool {
        self.real() == 0.0 && self.imag() == 0.0
    }

    pub fn conjugate(&self) -> Self {
        match self {
            Scalar::Real(v) => Scalar::Real(*v),
            Scalar::Complex(c) => Scalar::Complex(c.conj()),
        }
    }

    /// division by another scalar, failing on a zero-magnitude divisor
    pub fn checked_div(&self, rhs: &Scalar) -> CalcResult<Scalar> {
        if rhs.abs() == 0.0 {
            return Err(CalcError::DivisionByZero);
        }
        match (self, rhs) {
            (Scalar::Real(a), Scalar::Real(b)) => Ok(Scalar::Real(a / b)),
            _ => {
                let (a, b) = (self.to_complex(), rhs.to_complex());
                let denom = b.norm_sqr();
                Ok(Scalar::Complex(Complex64::new(
                    (a.re * b.re + a.im * b.im) / denom,
                    (a.im * b.re - a.re * b.im) / denom,
                )))
            }
        }
    }

    /// division by a raw double
    pub fn div_real(&self, rhs: f64) -> CalcResult<Scalar> {
        if rhs == 0.0 {
            return Err(CalcError::DivisionByZero);
        }
        Ok(match self {
            Scalar::Real(v) => Scalar::Real(v / rhs),
            Scalar::Complex(c) => Scalar::Complex(Complex64::new(c.re / rhs, c.im / rhs)),
        })
    }

    pub fn mul_real(&self, rhs: f64) -> Scalar {
        match self {
            Scalar::Real(v) => Scalar::Real(v * rhs),
            Scalar::Complex(c) => Scalar::Complex(Complex64::new(c.re * rhs, c.im * rhs)),
        }
    }

    /// integer power by repeated multiplication
    pub fn powi(&self, n: u32) -> Scalar {
        (0..n).fold(Scalar::ONE, |acc, _| acc * *self)
    }

    /// Parses text of the form `a + b - c + xi - yi` into a number. Terms ending in
    /// `i` are imaginary, a bare `i` means `1i`, and consecutive terms must be
    /// joined by `+` or `-`. The result is `Real` when the imaginary parts sum to zero.
    pub fn parse(input: &str) -> CalcResult<Scalar> {
        let (_, (real, imag)) = all_consuming(delimited(multispace0, term_sum, multispace0))
            .parse(input)
            .map_err(|_| CalcError::Parse(format!("invalid number '{}'", input)))?;
        if imag == 0.0 {
            Ok(Scalar::Real(real))
        } else {
            Ok(Scalar::complex(real, imag))
        }
    }
}

/// unsigned decimal, e.g. `2` or `0.25`
fn decimal(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(pair(digit1, opt(pair(char('.'), digit1)))),
        |s: &str| s.parse::<f64>(),
    )
    .parse(input)
}

/// `(value, is_imaginary)` of `2`, `2i` or `i`
fn term(input: &str) -> IResult<&str, (f64, bool)> {
    alt((
        map(pair(decimal, opt(char('i'))), |(v, i)| (v, i.is_some())),
        map(char('i'), |_| (1.0, true)),
    ))
    .parse(input)
}

fn signed(sign: char, value: f64) -> f64 {
    if sign == '-' { -value } else { value }
}

/// `(real sum, imaginary sum)` of `[+-] term ([+-] term)*`
fn term_sum(input: &str) -> IResult<&str, (f64, f64)> {
    let (input, first_sign) = opt(terminated(one_of("+-"), multispace0)).parse(input)?;
    let (input, first) = term(input)?;
    let (input, rest) =
        many0(pair(delimited(multispace0, one_of("+-"), multispace0), term)).parse(input)?;
    let terms = std::iter::once((first_sign.unwrap_or('+'), first)).chain(rest);
    let mut sums = (0.0, 0.0);
    for (sign, (value, imaginary)) in terms {
        if imaginary {
            sums.1 += signed(sign, value);
        } else {
            sums.0 += signed(sign, value);
        }
    }
    Ok((input, sums))
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::ZERO
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.real() == other.real() && self.imag() == other.imag()
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Real(v)
    }
}

impl From<Complex64> for Scalar {
    fn from(c: Complex64) -> Self {
        Scalar::Complex(c)
    }
}

impl Add for Scalar {
    type Output = Scalar;
    fn add(self, rhs: Scalar) -> Scalar {
        match (self, rhs) {
            (Scalar::Real(a), Scalar::Real(b)) => Scalar::Real(a + b),
            _ => Scalar::Complex(self.to_complex() + rhs.to_complex()),
        }
    }
}

impl Sub for Scalar {
    type Output = Scalar;
    fn sub(self, rhs: Scalar) -> Scalar {
        match (self, rhs) {
            (Scalar::Real(a), Scalar::Real(b)) => Scalar::Real(a - b),
            _ => Scalar::Complex(self.to_complex() - rhs.to_complex()),
        }
    }
}

impl Mul for Scalar {
    type Output = Scalar;
    fn mul(self, rhs: Scalar) -> Scalar {
        match (self, rhs) {
            (Scalar::Real(a), Scalar::Real(b)) => Scalar::Real(a * b),
            _ => {
                let (a, b) = (self.to_complex(), rhs.to_complex());
                Scalar::Complex(Complex64::new(
                    a.re * b.re - a.im * b.im,
                    a.re * b.im + a.im * b.re,
                ))
            }
        }
    }
}

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        match self {
            Scalar::Real(v) => Scalar::Real(-v),
            Scalar::Complex(c) => Scalar::Complex(-c),
        }
    }
}

impl AddAssign for Scalar {
    fn add_assign(&mut self, rhs: Scalar) {
        *self = *self + rhs;
    }
}

impl SubAssign for Scalar {
    fn sub_assign(&mut self, rhs: Scalar) {
        *self = *self - rhs;
    }
}

impl MulAssign for Scalar {
    fn mul_assign(&mut self, rhs: Scalar) {
        *self = *self * rhs;
    }
}

impl Sum for Scalar {
    fn sum<It: Iterator<Item = Scalar>>(iter: It) -> Scalar {
        iter.fold(Scalar::ZERO, |acc, v| acc + v)
    }
}

impl Zero for Scalar {
    fn zero() -> Self {
        Scalar::ZERO
    }
    fn is_zero(&self) -> bool {
        self.real() == 0.0 && self.imag() == 0.0
    }
}

impl One for Scalar {
    fn one() -> Self {
        Scalar::ONE
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Scalar::Real(v) => write!(f, "{}", v),
            Scalar::Complex(c) => {
                if c.im == 0.0 {
                    write!(f, "{}", c.re)
                } else if c.re == 0.0 {
                    write!(f, "{}i", c.im)
                } else if c.im < 0.0 {
                    write!(f, "{} - {}i", c.re, -c.im)
                } else {
                    write!(f, "{} + {}i", c.re, c.im)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_real_complex_promotion() {
        let a = Scalar::Real(2.0);
        let b = Scalar::complex(1.0, -3.0);
        let sum = a + b;
        assert!(!sum.is_real());
        assert_eq!(sum, Scalar::complex(3.0, -3.0));
        assert_eq!(Scalar::Real(2.0) + Scalar::Real(3.0), Scalar::Real(5.0));
        assert!((Scalar::Real(2.0) * Scalar::Real(3.0)).is_real());
    }

    #[test]
    fn test_complex_multiplication() {
        let a = Scalar::complex(1.0, 2.0);
        let b = Scalar::complex(3.0, -1.0);
        assert_eq!(a * b, Scalar::complex(5.0, 5.0));
        assert_eq!(Scalar::I * Scalar::I, Scalar::NEG_ONE);
    }

    #[test]
    fn test_self_division_is_one() {
        for (re, im) in [(1.0, 2.0), (-3.5, 0.25), (0.0, 7.0), (4.0, 0.0)] {
            let c = Scalar::complex(re, im);
            let q = c.checked_div(&c).unwrap();
            assert_eq!(q, Scalar::Real(1.0));
            assert_eq!(q.imag(), 0.0);
        }
    }

    #[test]
    fn test_division_by_zero() {
        let a = Scalar::complex(1.0, 1.0);
        assert_eq!(
            a.checked_div(&Scalar::ZERO),
            Err(CalcError::DivisionByZero)
        );
        assert_eq!(
            a.checked_div(&Scalar::complex(0.0, 0.0)),
            Err(CalcError::DivisionByZero)
        );
        assert_eq!(Scalar::ONE.div_real(0.0), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_real_by_complex_division() {
        let q = Scalar::Real(2.0).checked_div(&Scalar::I).unwrap();
        assert_eq!(q, Scalar::complex(0.0, -2.0));
    }

    #[test]
    fn test_magnitude_and_projection() {
        let c = Scalar::complex(3.0, -4.0);
        assert_relative_eq!(c.abs(), 5.0);
        assert_eq!(c.real(), 3.0);
        assert_eq!(c.imag(), -4.0);
        assert_eq!(c.conjugate(), Scalar::complex(3.0, 4.0));
        assert_relative_eq!(Scalar::Real(-2.5).abs(), 2.5);
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Scalar::Real(1.0), Scalar::complex(1.0, 0.0));
        assert_ne!(Scalar::Real(1.0), Scalar::complex(1.0, 1e-12));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Scalar::parse("2.5").unwrap(), Scalar::Real(2.5));
        assert_eq!(Scalar::parse("1 + 2i").unwrap(), Scalar::complex(1.0, 2.0));
        assert_eq!(Scalar::parse("-i").unwrap(), Scalar::NEG_I);
        assert_eq!(Scalar::parse("3 - 1 + 2i - 2i").unwrap(), Scalar::Real(2.0));
        assert!(Scalar::parse("abc").is_err());
        assert!(Scalar::parse("").is_err());
        assert_eq!(Scalar::parse(" 0.5i + 4 ").unwrap(), Scalar::complex(4.0, 0.5));
    }

    #[test]
    fn test_parse_needs_operators_between_terms() {
        for text in ["1 2", "2i3", "i i", "1 +", "+ - 1", "1..5", "2 ii"] {
            assert!(
                matches!(Scalar::parse(text), Err(CalcError::Parse(_))),
                "accepted '{}'",
                text
            );
        }
    }

    #[test]
    fn test_powi() {
        assert_eq!(Scalar::I.powi(4), Scalar::ONE);
        assert_eq!(Scalar::Real(2.0).powi(10), Scalar::Real(1024.0));
        assert_eq!(Scalar::Real(5.0).powi(0), Scalar::ONE);
    }
}
