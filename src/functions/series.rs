//! # Series helpers
//!
//! Truncated Taylor expansions expressed as polynomial functions.
//!
//! ## Main Structures and Methods
//! - `exp_series`, `sin_series`, `cos_series` - univariate expansions around 0
//!   built from their derivatives at the origin
//! - `exp_of(n)` - `sum_{k<n} f^k / k!`, the exponential of any polynomial function
//! - `pow_real(p, h, center)` - `f^p` for a real exponent as the binomial Taylor
//!   expansion around `center` with `h` terms
//! - `gamma(x, n)` - `n`-th derivative of `Gamma(x + 1)` from a fixed root polynomial
use crate::errors::{CalcError, CalcResult};
use crate::functions::poly_function::PolynomialFunction;
use crate::numbers::Scalar;
use log::debug;

/// largest argument for which every coefficient of the shifted root polynomial
/// is a finite `f64` (`Gamma(x + 1)` itself overflows past 170)
const GAMMA_MAX_ARG: f64 = 150.0;

/// Taylor coefficients of `Gamma(1 + t)` around `t = 0`
const GAMMA_ROOT: [f64; 20] = [
    1.0, -0.5772, 0.9891, -0.9075, 0.9817, -0.982, 0.9931, -0.996, 0.9981, -0.999, 0.9995,
    -0.9998, 0.9999, -0.9999, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0,
];

impl PolynomialFunction {
    /// `e^x` with `n + 1` terms
    pub fn exp_series(n: usize) -> CalcResult<PolynomialFunction> {
        PolynomialFunction::from_derivatives(&[n + 1], vec![Scalar::ONE; n + 1])
    }

    /// `sin x` with `n + 1` non-zero terms
    pub fn sin_series(n: usize) -> CalcResult<PolynomialFunction> {
        let mut values = Vec::with_capacity(2 * (n + 1));
        let mut term = Scalar::ONE;
        for _ in 0..=n {
            values.push(Scalar::ZERO);
            values.push(term);
            term = -term;
        }
        PolynomialFunction::from_derivatives(&[values.len()], values)
    }

    /// `cos x` with `n + 1` non-zero terms
    pub fn cos_series(n: usize) -> CalcResult<PolynomialFunction> {
        let mut values = Vec::with_capacity(2 * (n + 1));
        let mut term = Scalar::ONE;
        for _ in 0..=n {
            values.push(term);
            values.push(Scalar::ZERO);
            term = -term;
        }
        PolynomialFunction::from_derivatives(&[values.len()], values)
    }

    /// `exp(self)` truncated to `n` terms of the exponential series
    pub fn exp_of(&self, n: usize) -> PolynomialFunction {
        let mut sum = PolynomialFunction::zero();
        let mut power = PolynomialFunction::one();
        for i in 0..n {
            sum = sum.add(&power);
            power = power.multiply(&self.scale(Scalar::Real(1.0 / (i + 1) as f64)));
        }
        sum
    }

    /// `self^p` for a real exponent. Integer exponents are exact; otherwise the
    /// binomial expansion of `(center + (f - center))^p` is regrouped into powers
    /// of `f` and truncated to `h` terms.
    pub fn pow_real(&self, p: f64, h: usize, center: f64) -> CalcResult<PolynomialFunction> {
        if p == 0.0 {
            return Ok(PolynomialFunction::one());
        }
        if p < 0.0 {
            return Err(CalcError::UnsupportedOperation(format!(
                "negative power {} needs polynomial division",
                p
            )));
        }
        if !p.is_finite() || p > i32::MAX as f64 {
            return Err(CalcError::UnsupportedOperation(format!(
                "real power {} is out of range",
                p
            )));
        }
        if p.fract() == 0.0 {
            return self.pow(p as i32);
        }
        if center == 0.0 {
            return Err(CalcError::DivisionByZero);
        }
        if center < 0.0 {
            return Err(CalcError::UnsupportedOperation(format!(
                "real power {} around negative center {}",
                p, center
            )));
        }
        debug!("binomial expansion of f^{} around {} with {} terms", p, center, h);
        let mut sum = PolynomialFunction::zero();
        let mut power = PolynomialFunction::one();
        // center^(p - n) / n!
        let mut prev = center.powf(p);
        // p! / (p - n)!
        let mut falling = 1.0;
        for n in 0..h {
            let mut inner = 0.0;
            let mut coeff = falling;
            for k in 0..h - n {
                inner += coeff;
                coeff *= -(p - (n + k) as f64) / (k + 1) as f64;
            }
            sum = sum.add(&power.scale(Scalar::Real(inner * prev)));
            power = power.multiply(self);
            prev /= center * (n + 1) as f64;
            falling *= p - n as f64;
        }
        Ok(sum)
    }
}

/// `n`-th derivative of `Gamma(x + 1)` for `0 <= x <= 150`.
///
/// `x` is split into an integer part `r` and a remainder in `[-0.5, 0.5)`; the root
/// polynomial is multiplied by the factors `(r + 1 - k + t)` for `k = 1..=r` and
/// differentiated at the remainder.
pub fn gamma(x: f64, n: usize) -> CalcResult<Scalar> {
    if !(0.0..=GAMMA_MAX_ARG).contains(&x) {
        return Err(CalcError::UnsupportedOperation(format!(
            "gamma approximation at {}",
            x
        )));
    }
    let reduced = (x + 0.5) % 1.0 - 0.5;
    let shift = x - reduced;
    let mut approx = PolynomialFunction::from_reals(&[GAMMA_ROOT.len()], &GAMMA_ROOT)?;
    let steps = x.round() as usize;
    for k in 1..=steps {
        let factor = PolynomialFunction::from_reals(&[2], &[1.0 + shift - k as f64, 1.0])?;
        approx = approx.multiply(&factor);
    }
    approx.differ(0, n).apply_reals(&[reduced])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exp_series() {
        let e = PolynomialFunction::exp_series(15).unwrap();
        assert_relative_eq!(
            e.apply_reals(&[1.0]).unwrap().real(),
            std::f64::consts::E,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_sin_cos_series() {
        let s = PolynomialFunction::sin_series(10).unwrap();
        let c = PolynomialFunction::cos_series(10).unwrap();
        assert_eq!(s.degree(0), 21);
        assert_relative_eq!(s.apply_reals(&[0.5]).unwrap().real(), 0.5f64.sin(), epsilon = 1e-12);
        assert_relative_eq!(c.apply_reals(&[0.5]).unwrap().real(), 0.5f64.cos(), epsilon = 1e-12);
        // sin' = cos
        let ds = s.differ(0, 1);
        assert_relative_eq!(ds.apply_reals(&[0.3]).unwrap().real(), 0.3f64.cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_exp_of_polynomial() {
        // exp(2x) at x = 0.25
        let f = PolynomialFunction::from_reals(&[2], &[0.0, 2.0]).unwrap();
        let e = f.exp_of(20);
        assert_relative_eq!(
            e.apply_reals(&[0.25]).unwrap().real(),
            0.5f64.exp(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_pow_real() {
        let x = PolynomialFunction::variable(0, 1);
        let root = x.pow_real(0.5, 10, 4.0).unwrap();
        assert_relative_eq!(root.apply_reals(&[4.0]).unwrap().real(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(
            root.apply_reals(&[4.4]).unwrap().real(),
            4.4f64.sqrt(),
            epsilon = 1e-9
        );
        assert_eq!(x.pow_real(2.0, 5, 1.0).unwrap(), x.pow(2).unwrap());
        assert_eq!(x.pow_real(0.0, 5, 1.0).unwrap(), PolynomialFunction::one());
        assert_eq!(x.pow_real(0.5, 5, 0.0), Err(CalcError::DivisionByZero));
        assert!(matches!(
            x.pow_real(-0.5, 5, 1.0),
            Err(CalcError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_gamma() {
        assert_relative_eq!(gamma(3.0, 0).unwrap().real(), 6.0, epsilon = 1e-12);
        assert_relative_eq!(gamma(4.0, 0).unwrap().real(), 24.0, epsilon = 1e-12);
        assert_relative_eq!(gamma(0.0, 1).unwrap().real(), -0.5772, epsilon = 1e-12);
        assert!(gamma(-1.0, 0).is_err());
    }

    #[test]
    fn test_out_of_range_arguments_are_rejected() {
        for x in [1e18, 150.5, f64::INFINITY, f64::NAN] {
            assert!(matches!(
                gamma(x, 0),
                Err(CalcError::UnsupportedOperation(_))
            ));
        }
        assert!(gamma(150.0, 0).unwrap().real().is_finite());
        let x = PolynomialFunction::variable(0, 1);
        for p in [3e9, f64::INFINITY, f64::NAN] {
            assert!(matches!(
                x.pow_real(p, 5, 1.0),
                Err(CalcError::UnsupportedOperation(_))
            ));
        }
    }
}
