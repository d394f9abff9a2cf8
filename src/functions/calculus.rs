//! Partial derivatives, integrals and gradients of polynomial functions.
//!
//! Both operators are a single mode product with a transform matrix from
//! `mat::matrix`, so their cost is linear in the number of coefficients.
use crate::functions::poly_function::PolynomialFunction;
use crate::functions::vector_function::VectorFunction;
use crate::mat::matrix::Matrix;
use crate::mat::tensor::Tensor;
use crate::numbers::Scalar;
use rayon::prelude::*;

impl PolynomialFunction {
    /// `n`-th partial derivative along `mode`. When `n` exceeds the degree in
    /// `mode` (or `mode` is beyond the arity) the result is the zero function.
    pub fn differ(&self, mode: usize, n: usize) -> PolynomialFunction {
        if n == 0 {
            return self.clone();
        }
        if mode >= self.arity() || n > self.degree(mode) {
            return PolynomialFunction::zero();
        }
        let m = Matrix::differ_matrix(self.degree(mode), n);
        PolynomialFunction::from_tensor(self.coeffs().mode_product_unchecked(&m, mode))
    }

    /// `n`-fold integral along `mode` without integration constants; a mode
    /// beyond the arity is appended first.
    pub fn integ(&self, mode: usize, n: usize) -> PolynomialFunction {
        if n == 0 {
            return self.clone();
        }
        let coeffs = self.coeffs_with_mode(mode);
        let m = Matrix::integ_matrix(coeffs.dim(mode) - 1, n);
        PolynomialFunction::from_tensor(coeffs.mode_product_unchecked(&m, mode))
    }

    /// `constants.len()` integrations along `mode`, then `c_0 + c_1 x + c_2 x^2 + ...`
    /// (in the variable of `mode`) is added.
    pub fn integ_with_constants(&self, mode: usize, constants: &[Scalar]) -> PolynomialFunction {
        let integral = self.integ(mode, constants.len());
        if constants.is_empty() {
            return integral;
        }
        let mut dims = vec![1; mode + 1];
        dims[mode] = constants.len();
        let polynomial =
            PolynomialFunction::from_tensor(Tensor::from_fn(&dims, |idx| constants[idx[mode]]));
        integral.add(&polynomial)
    }

    /// vector of first partial derivatives, one per mode
    pub fn gradient(&self) -> VectorFunction {
        let components: Vec<PolynomialFunction> = (0..self.arity())
            .into_par_iter()
            .map(|m| self.differ(m, 1))
            .collect();
        VectorFunction::new(components)
    }

    fn coeffs_with_mode(&self, mode: usize) -> Tensor {
        let rank = self.arity();
        if mode < rank {
            self.coeffs().clone()
        } else {
            self.coeffs().with_rank(mode + 1)
        }
    }
}
