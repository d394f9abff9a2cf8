//! # Polynomial functions over a coefficient tensor
//!
//! `PolynomialFunction` wraps one `Tensor`: axis `m` belongs to variable `m` and
//! index `i` along that axis is the exponent of the variable, so cell
//! `(i_0, ..., i_{k-1})` is the coefficient of `x_0^i_0 * ... * x_{k-1}^i_{k-1}`.
//! The number of axes is the arity; trailing axes of size 1 mean "no dependence".
//!
//! ## Main Structures and Methods
//! - `from_coefficients`, `from_derivatives` (values are derivatives at the origin),
//!   `monomial`, `variable`, `constant`, `zero`, `one`
//! - `apply(args)` - evaluation through the inner product with a tensor of monomials
//! - `add`, `subtract`, `multiply`, `pow`, `scale`, `divide_scalar`, `divide`
//! - calculus (`differ`, `integ`, `gradient`) lives in `functions::calculus`,
//!   substitution in `functions::composition`, the chain-rule solver in
//!   `functions::total_derivative` and series helpers in `functions::series`
use crate::errors::{CalcError, CalcResult};
use crate::mat::tensor::Tensor;
use crate::numbers::Scalar;
use log::debug;
use std::fmt;
use strum_macros::Display;

/// how the values passed to a constructor are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CoefficientMode {
    /// polynomial coefficients
    Coefficients,
    /// partial derivatives of all orders at `x = 0`
    Derivatives,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PolynomialFunction {
    coeffs: Tensor,
}

impl PolynomialFunction {
    pub fn new(mode: CoefficientMode, dims: &[usize], values: Vec<Scalar>) -> CalcResult<Self> {
        debug!("function of shape {:?} from {} {}", dims, values.len(), mode);
        let coeffs = match mode {
            CoefficientMode::Coefficients => Tensor::new(dims, values)?,
            CoefficientMode::Derivatives => Tensor::from_derivatives(dims, values)?,
        };
        Ok(Self { coeffs })
    }

    pub fn from_coefficients(dims: &[usize], values: Vec<Scalar>) -> CalcResult<Self> {
        Self::new(CoefficientMode::Coefficients, dims, values)
    }

    pub fn from_derivatives(dims: &[usize], values: Vec<Scalar>) -> CalcResult<Self> {
        Self::new(CoefficientMode::Derivatives, dims, values)
    }

    /// coefficients given as real numbers
    pub fn from_reals(dims: &[usize], values: &[f64]) -> CalcResult<Self> {
        Self::from_coefficients(dims, values.iter().map(|&v| Scalar::Real(v)).collect())
    }

    pub fn from_tensor(coeffs: Tensor) -> Self {
        Self { coeffs }
    }

    /// zero-arity constant
    pub fn constant(value: Scalar) -> Self {
        Self {
            coeffs: Tensor::scalar(value),
        }
    }

    pub fn zero() -> Self {
        Self::constant(Scalar::ZERO)
    }

    pub fn one() -> Self {
        Self::constant(Scalar::ONE)
    }

    /// `coeff * x_0^powers[0] * ... * x_{k-1}^powers[k-1]`
    pub fn monomial(powers: &[usize], coeff: Scalar) -> Self {
        let dims: Vec<usize> = powers.iter().map(|p| p + 1).collect();
        Self {
            coeffs: Tensor::from_fn(&dims, |idx| {
                if idx == powers { coeff } else { Scalar::ZERO }
            }),
        }
    }

    /// the identity function `x_mode` of a function with `arity` arguments
    pub fn variable(mode: usize, arity: usize) -> Self {
        let mut powers = vec![0; arity.max(mode + 1)];
        powers[mode] = 1;
        Self::monomial(&powers, Scalar::ONE)
    }

    pub fn coeffs(&self) -> &Tensor {
        &self.coeffs
    }

    pub fn dims(&self) -> &[usize] {
        self.coeffs.dims()
    }

    /// number of arguments
    pub fn arity(&self) -> usize {
        self.coeffs.rank()
    }

    /// degree in variable `mode` (0 beyond the arity)
    pub fn degree(&self, mode: usize) -> usize {
        self.coeffs.dim(mode) - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_zero()
    }

    /// `Some(c)` when the function is the constant `c`
    pub fn constant_value(&self) -> Option<Scalar> {
        if self.coeffs.condense().iter().all(|&d| d == 1) {
            self.coeffs.get(0)
        } else {
            None
        }
    }

    /// equivalent function with trailing zero coefficients removed; arity is kept
    pub fn condense(&self) -> Self {
        Self {
            coeffs: self.coeffs.trim(),
        }
    }

    /// Evaluates the function. Fewer arguments than the arity is a domain error;
    /// surplus trailing arguments are dropped.
    pub fn apply(&self, args: &[Scalar]) -> CalcResult<Scalar> {
        let arity = self.arity();
        if args.len() < arity {
            return Err(CalcError::Domain {
                expected: arity,
                got: args.len(),
            });
        }
        let monomials = Self::monomials(&args[..arity], self.dims());
        self.coeffs.inner_product(&monomials)
    }

    pub fn apply_reals(&self, args: &[f64]) -> CalcResult<Scalar> {
        let args: Vec<Scalar> = args.iter().map(|&v| Scalar::Real(v)).collect();
        self.apply(&args)
    }

    /// Tensor of monomials `x_0^i_0 * ... * x_{k-1}^i_{k-1}` in storage order.
    pub fn monomials(args: &[Scalar], dims: &[usize]) -> Tensor {
        let powers: Vec<Vec<Scalar>> = dims
            .iter()
            .zip(args.iter())
            .map(|(&d, &x)| {
                let mut row = Vec::with_capacity(d);
                let mut p = Scalar::ONE;
                for _ in 0..d {
                    row.push(p);
                    p *= x;
                }
                row
            })
            .collect();
        Tensor::from_fn(dims, |idx| {
            idx.iter()
                .enumerate()
                .fold(Scalar::ONE, |acc, (axis, &i)| acc * powers[axis][i])
        })
    }

    pub fn add(&self, other: &PolynomialFunction) -> PolynomialFunction {
        Self {
            coeffs: self.coeffs.add(&other.coeffs),
        }
    }

    pub fn subtract(&self, other: &PolynomialFunction) -> PolynomialFunction {
        Self {
            coeffs: self.coeffs.subtract(&other.coeffs),
        }
    }

    pub fn multiply(&self, other: &PolynomialFunction) -> PolynomialFunction {
        Self {
            coeffs: self.coeffs.convolve(&other.coeffs),
        }
    }

    pub fn scale(&self, scalar: Scalar) -> PolynomialFunction {
        Self {
            coeffs: self.coeffs.scale(scalar),
        }
    }

    pub fn neg(&self) -> PolynomialFunction {
        self.scale(Scalar::NEG_ONE)
    }

    pub fn divide_scalar(&self, scalar: Scalar) -> CalcResult<PolynomialFunction> {
        Ok(Self {
            coeffs: self.coeffs.divide_scalar(scalar)?,
        })
    }

    /// Division by another function. Only constant divisors have a polynomial
    /// quotient; anything else is an unsupported operation.
    pub fn divide(&self, other: &PolynomialFunction) -> CalcResult<PolynomialFunction> {
        match other.constant_value() {
            Some(c) => self.divide_scalar(c),
            None => Err(CalcError::UnsupportedOperation(
                "division by a non-constant polynomial".to_string(),
            )),
        }
    }

    /// Non-negative integer power; `pow(0)` is the constant 1 with all-1 dimensions.
    pub fn pow(&self, n: i32) -> CalcResult<PolynomialFunction> {
        if n < 0 {
            return Err(CalcError::UnsupportedOperation(format!(
                "negative power {} needs polynomial division",
                n
            )));
        }
        if n == 0 {
            let dims = vec![1; self.arity()];
            return Ok(Self {
                coeffs: Tensor::from_fn(&dims, |_| Scalar::ONE),
            });
        }
        let mut t = self.coeffs.clone();
        for _ in 1..n {
            t = t.convolve(&self.coeffs);
        }
        Ok(Self { coeffs: t })
    }
}

impl fmt::Display for PolynomialFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cfg = crate::Utils::render::RenderConfig::default();
        write!(f, "{}", crate::Utils::render::render(self, &cfg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_and_arity() {
        // f(x, y) = 1 + 2x + 3y + 4xy
        let f = PolynomialFunction::from_reals(&[2, 2], &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(f.arity(), 2);
        assert_eq!(f.degree(0), 1);
        assert_eq!(f.degree(7), 0);
        assert_eq!(f.apply_reals(&[2.0, 3.0]).unwrap(), Scalar::Real(38.0));
        // surplus arguments are dropped
        assert_eq!(
            f.apply_reals(&[2.0, 3.0, 100.0]).unwrap(),
            Scalar::Real(38.0)
        );
        assert_eq!(
            f.apply_reals(&[2.0]),
            Err(CalcError::Domain {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_apply_complex_argument() {
        // f(x) = 1 + x^2 at x = i
        let f = PolynomialFunction::from_reals(&[3], &[1.0, 0.0, 1.0]).unwrap();
        assert_eq!(f.apply(&[Scalar::I]).unwrap(), Scalar::ZERO);
    }

    #[test]
    fn test_from_derivatives() {
        // derivatives of e^x at 0 are all 1
        let f = PolynomialFunction::from_derivatives(&[4], vec![Scalar::ONE; 4]).unwrap();
        assert_eq!(f.coeffs().get(3), Some(Scalar::Real(1.0 / 6.0)));
    }

    #[test]
    fn test_coefficient_modes() {
        let values = vec![Scalar::Real(2.0); 3];
        let by_coefficients =
            PolynomialFunction::new(CoefficientMode::Coefficients, &[3], values.clone()).unwrap();
        let by_derivatives =
            PolynomialFunction::new(CoefficientMode::Derivatives, &[3], values).unwrap();
        assert_eq!(by_coefficients.coeffs().get(2), Some(Scalar::Real(2.0)));
        assert_eq!(by_derivatives.coeffs().get(2), Some(Scalar::Real(1.0)));
        assert_eq!(CoefficientMode::Derivatives.to_string(), "Derivatives");
    }

    #[test]
    fn test_pow() {
        let f = PolynomialFunction::from_reals(&[2], &[1.0, 1.0]).unwrap();
        let cube = f.pow(3).unwrap();
        assert_eq!(
            cube,
            PolynomialFunction::from_reals(&[4], &[1.0, 3.0, 3.0, 1.0]).unwrap()
        );
        let g = PolynomialFunction::from_reals(&[2, 2], &[1.0, 1.0, 1.0, 0.0]).unwrap();
        let unit = g.pow(0).unwrap();
        assert_eq!(unit.dims(), &[1, 1]);
        assert_eq!(unit.apply_reals(&[5.0, 7.0]).unwrap(), Scalar::ONE);
        assert!(matches!(
            f.pow(-1),
            Err(CalcError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_divide() {
        let f = PolynomialFunction::from_reals(&[2], &[2.0, 4.0]).unwrap();
        let two = PolynomialFunction::from_reals(&[2], &[2.0, 0.0]).unwrap();
        assert_eq!(
            f.divide(&two).unwrap(),
            PolynomialFunction::from_reals(&[2], &[1.0, 2.0]).unwrap()
        );
        assert!(matches!(
            two.divide(&f),
            Err(CalcError::UnsupportedOperation(_))
        ));
        assert_eq!(
            f.divide(&PolynomialFunction::zero()),
            Err(CalcError::DivisionByZero)
        );
    }

    #[test]
    fn test_monomial_and_variable() {
        let m = PolynomialFunction::monomial(&[2, 1], Scalar::Real(3.0));
        assert_eq!(m.apply_reals(&[2.0, 5.0]).unwrap(), Scalar::Real(60.0));
        let y = PolynomialFunction::variable(1, 3);
        assert_eq!(y.dims(), &[1, 2, 1]);
        assert_eq!(y.apply_reals(&[9.0, 4.0, 9.0]).unwrap(), Scalar::Real(4.0));
    }

    #[test]
    fn test_condense_and_constant_value() {
        let f = PolynomialFunction::from_reals(&[3, 2], &[5.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(f.constant_value(), Some(Scalar::Real(5.0)));
        assert_eq!(f.condense().dims(), &[1, 1]);
        let g = PolynomialFunction::from_reals(&[2], &[0.0, 1.0]).unwrap();
        assert_eq!(g.constant_value(), None);
    }
}
