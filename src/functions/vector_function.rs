//! Ordered tuple of polynomial functions: `F(x) = <f_1(x), ..., f_n(x)>`.
//! Gradients are returned as vector functions and the total-derivative
//! solver builds its chain-rule sums as dot products of two of them.
use crate::errors::{CalcError, CalcResult};
use crate::functions::poly_function::PolynomialFunction;
use crate::mat::matrix::Vector;
use crate::numbers::Scalar;
use itertools::Itertools;
use rayon::prelude::*;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct VectorFunction {
    components: Vec<PolynomialFunction>,
}

impl VectorFunction {
    pub fn new(components: Vec<PolynomialFunction>) -> Self {
        Self { components }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// largest arity among the components
    pub fn arity(&self) -> usize {
        self.components
            .iter()
            .map(|c| c.arity())
            .max()
            .unwrap_or(0)
    }

    pub fn component(&self, i: usize) -> Option<&PolynomialFunction> {
        self.components.get(i)
    }

    pub fn components(&self) -> &[PolynomialFunction] {
        &self.components
    }

    /// Evaluates every component at the same point.
    pub fn apply(&self, args: &[Scalar]) -> CalcResult<Vector> {
        let values = self
            .components
            .par_iter()
            .map(|c| c.apply(args))
            .collect::<CalcResult<Vec<Scalar>>>()?;
        Ok(Vector::from_scalars(values))
    }

    pub fn apply_reals(&self, args: &[f64]) -> CalcResult<Vector> {
        let args: Vec<Scalar> = args.iter().map(|&v| Scalar::Real(v)).collect();
        self.apply(&args)
    }

    pub fn differ(&self, mode: usize, n: usize) -> VectorFunction {
        self.map(|c| c.differ(mode, n))
    }

    pub fn integ(&self, mode: usize, n: usize) -> VectorFunction {
        self.map(|c| c.integ(mode, n))
    }

    pub fn add(&self, other: &VectorFunction) -> CalcResult<VectorFunction> {
        self.zip_with(other, |a, b| a.add(b))
    }

    pub fn subtract(&self, other: &VectorFunction) -> CalcResult<VectorFunction> {
        self.zip_with(other, |a, b| a.subtract(b))
    }

    pub fn scale(&self, scalar: Scalar) -> VectorFunction {
        self.map(|c| c.scale(scalar))
    }

    /// `sum_i f_i * g_i`
    pub fn dot(&self, other: &VectorFunction) -> CalcResult<PolynomialFunction> {
        let products = self.zip_with(other, |a, b| a.multiply(b))?;
        Ok(products
            .components
            .iter()
            .fold(PolynomialFunction::zero(), |acc, p| acc.add(p)))
    }

    /// cross product of two 3-component functions
    pub fn cross(&self, other: &VectorFunction) -> CalcResult<VectorFunction> {
        if self.len() != 3 || other.len() != 3 {
            return Err(CalcError::InvalidShape(format!(
                "cross product needs 3 components, got {} and {}",
                self.len(),
                other.len()
            )));
        }
        let a = &self.components;
        let b = &other.components;
        Ok(VectorFunction::new(vec![
            a[1].multiply(&b[2]).subtract(&a[2].multiply(&b[1])),
            a[2].multiply(&b[0]).subtract(&a[0].multiply(&b[2])),
            a[0].multiply(&b[1]).subtract(&a[1].multiply(&b[0])),
        ]))
    }

    fn map(
        &self,
        op: impl Fn(&PolynomialFunction) -> PolynomialFunction + Sync + Send,
    ) -> VectorFunction {
        VectorFunction::new(self.components.par_iter().map(op).collect())
    }

    fn zip_with(
        &self,
        other: &VectorFunction,
        op: impl Fn(&PolynomialFunction, &PolynomialFunction) -> PolynomialFunction,
    ) -> CalcResult<VectorFunction> {
        if self.len() != other.len() {
            return Err(CalcError::InvalidShape(format!(
                "vector functions of length {} and {}",
                self.len(),
                other.len()
            )));
        }
        Ok(VectorFunction::new(
            self.components
                .iter()
                .zip(other.components.iter())
                .map(|(a, b)| op(a, b))
                .collect(),
        ))
    }
}

impl fmt::Display for VectorFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}>", self.components.iter().join(", "))
    }
}
