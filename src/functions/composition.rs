//! Substitution of one polynomial function into a variable of another.
//!
//! For `f` with maximal power `p` in the target mode and substituted function `g`:
//! `f(.., g, ..) = sum_i f_i(other modes) * g^i`, where `f_i` is the slice of
//! `f`'s coefficients with the target index equal to `i`. The powers `g^0..g^p`
//! are built once by repeated convolution and each non-zero slice coefficient
//! adds a scaled copy of the matching power into a window of the result.
use crate::errors::{CalcError, CalcResult};
use crate::functions::poly_function::PolynomialFunction;
use crate::mat::tensor::Tensor;
use crate::numbers::Scalar;
use log::debug;
use ndarray::{Axis, Dimension};

impl PolynomialFunction {
    /// Substitutes `g` for the variable `mode`. The result keeps every other
    /// variable of `self` and gains the variables of `g`.
    pub fn compose(&self, g: &PolynomialFunction, mode: usize) -> CalcResult<PolynomialFunction> {
        let dims = self.dims();
        if mode >= dims.len() {
            return Err(CalcError::InvalidMode {
                mode,
                arity: dims.len(),
            });
        }
        let p = dims[mode] - 1;
        if p == 0 {
            return Ok(self.clone());
        }
        let g_dims = g.dims();
        let rank = dims.len().max(g_dims.len());
        // the target axis itself contributes nothing; g's axes grow p-fold
        let new_dims: Vec<usize> = (0..rank)
            .map(|i| {
                let own = if i == mode { 0 } else { self.coeffs().dim(i) - 1 };
                1 + own + (g.coeffs().dim(i) - 1) * p
            })
            .collect();
        debug!(
            "compose along {}: {:?} with {:?} -> {:?}",
            mode, dims, g_dims, new_dims
        );
        let mut result = Tensor::zeros(&new_dims);
        let mut power = Tensor::scalar(Scalar::ONE).with_rank(rank);
        for i in 0..=p {
            if i > 0 {
                power = power.convolve(g.coeffs());
            }
            // slice of coefficients with exponent i in the target mode
            let slice = self.coeffs().view().index_axis_move(Axis(mode), i);
            for (idx, &coefficient) in slice.indexed_iter() {
                if coefficient.is_zero() {
                    continue;
                }
                let mut origin = vec![0; rank];
                for (axis, &j) in idx.slice().iter().enumerate() {
                    origin[if axis < mode { axis } else { axis + 1 }] = j;
                }
                result.add_scaled_at(&origin, &power, coefficient);
            }
        }
        Ok(PolynomialFunction::from_tensor(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(dims: &[usize], values: &[f64]) -> PolynomialFunction {
        PolynomialFunction::from_reals(dims, values).unwrap()
    }

    #[test]
    fn test_compose_univariate() {
        // f(x) = 1 + x^2, g(x) = x + 1 -> 2 + 2x + x^2
        let p = f(&[3], &[1.0, 0.0, 1.0]);
        let g = f(&[2], &[1.0, 1.0]);
        let c = p.compose(&g, 0).unwrap();
        assert_eq!(c, f(&[3], &[2.0, 2.0, 1.0]));
    }

    #[test]
    fn test_compose_introduces_new_variable() {
        // f(x, y) = xy, x := y + z -> y^2 + yz
        let p = f(&[2, 2], &[0.0, 0.0, 0.0, 1.0]);
        let g = f(&[1, 2, 2], &[0.0, 1.0, 1.0, 0.0]);
        let c = p.compose(&g, 0).unwrap();
        assert_eq!(c.dims(), &[1, 3, 2]);
        let value = c.apply_reals(&[100.0, 2.0, 5.0]).unwrap();
        assert_eq!(value, Scalar::Real(14.0));
    }

    #[test]
    fn test_compose_without_dependence_is_identity() {
        let p = f(&[1, 3], &[1.0, 2.0, 3.0]);
        let g = f(&[2], &[7.0, 7.0]);
        assert_eq!(p.compose(&g, 0).unwrap(), p);
        assert!(matches!(
            p.compose(&g, 2),
            Err(CalcError::InvalidMode { mode: 2, arity: 2 })
        ));
    }
}
