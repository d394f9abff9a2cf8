//! # Total derivative (multivariable chain rule)
//!
//! `f.total_differ(t, inner)` differentiates `f` with respect to variable `t`
//! when some variables are themselves functions of others: `inner[m]` is
//! `Some(g)` when `x_m = g(...)` and `None` when `x_m` is independent.
//!
//! ## Purpose
//! `df/dx_t = sum_m (df/dx_m) * (dx_m/dx_t)`, where each `dx_m/dx_t` is again a
//! total derivative of `inner[m]`. The recursion runs over the dependency graph
//! of the variables, so the graph is validated first.
//!
//! ## Main Structures and Methods
//! - `TotalDerivativeSolver` - call-scoped state: the dependency sets, the memo
//!   of already computed `dx_num/dx_denom` and the single allowed inversion
//! - `validate` - depth-first walk with three colors; a back edge is a
//!   `CyclicDependency`, every validated set is closed transitively
//! - `iterate(num, denom)` - `dx_num/dx_denom` with the rules:
//!   `num == denom` gives 1; independent `num` that `denom` does not depend on gives 0
//!   (both directions memoized); independent `num` that `denom` depends on is the
//!   implicit case, solved as `1 / (dx_denom/dx_num)`; otherwise the total
//!   derivative of `inner[num]`
//!
//! ## Interesting Code Features
//! 1. The memo is created per call, so concurrent calls never share state.
//! 2. The chain-rule sum is a dot product of the gradient with the vector of
//!    `dx_m/dx_t`, computed only for modes where `f` has non-trivial degree.
use crate::errors::{CalcError, CalcResult};
use crate::functions::poly_function::PolynomialFunction;
use crate::functions::vector_function::VectorFunction;
use crate::numbers::Scalar;
use log::{debug, info, warn};
use std::collections::{BTreeSet, HashMap};

impl PolynomialFunction {
    /// Total derivative with respect to variable `mode`; `inner[m]` defines
    /// variable `m` in terms of the others (or is `None` for an independent one).
    pub fn total_differ(
        &self,
        mode: usize,
        inner: &[Option<PolynomialFunction>],
    ) -> CalcResult<PolynomialFunction> {
        let modes = inner
            .iter()
            .flatten()
            .map(|g| g.arity())
            .chain([inner.len(), mode + 1, self.arity()])
            .max()
            .unwrap_or(mode + 1);
        let mut solver = TotalDerivativeSolver::new(inner, modes)?;
        solver.differentiate(self, mode)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Visit {
    Unvisited,
    InProgress,
    Validated,
}

struct TotalDerivativeSolver<'a> {
    inner: &'a [Option<PolynomialFunction>],
    dependencies: Vec<BTreeSet<usize>>,
    computed: HashMap<(usize, usize), PolynomialFunction>,
    inverted: Option<(usize, usize)>,
}

impl<'a> TotalDerivativeSolver<'a> {
    fn new(inner: &'a [Option<PolynomialFunction>], modes: usize) -> CalcResult<Self> {
        let mut dependencies = vec![BTreeSet::new(); modes];
        for (m, g) in inner.iter().enumerate() {
            if let Some(g) = g {
                dependencies[m] = g
                    .dims()
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| **d > 1)
                    .map(|(i, _)| i)
                    .collect();
            }
        }
        let mut solver = Self {
            inner,
            dependencies,
            computed: HashMap::new(),
            inverted: None,
        };
        solver.validate()?;
        debug!("validated dependencies: {:?}", solver.dependencies);
        Ok(solver)
    }

    fn validate(&mut self) -> CalcResult<()> {
        let mut state = vec![Visit::Unvisited; self.dependencies.len()];
        for m in 0..self.dependencies.len() {
            self.visit(m, &mut state)?;
        }
        Ok(())
    }

    fn visit(&mut self, mode: usize, state: &mut [Visit]) -> CalcResult<()> {
        match state[mode] {
            Visit::Validated => return Ok(()),
            Visit::InProgress => {
                warn!("cyclic dependency through variable {}", mode);
                return Err(CalcError::CyclicDependency { mode });
            }
            Visit::Unvisited => {}
        }
        state[mode] = Visit::InProgress;
        let direct: Vec<usize> = self.dependencies[mode].iter().copied().collect();
        let mut closure = self.dependencies[mode].clone();
        for d in direct {
            self.visit(d, state)?;
            closure.extend(self.dependencies[d].iter().copied());
        }
        self.dependencies[mode] = closure;
        state[mode] = Visit::Validated;
        Ok(())
    }

    fn depends_on(&self, mode: usize, other: usize) -> bool {
        self.dependencies[mode].contains(&other)
    }

    /// `df/dx_denom = grad f . (dx_0/dx_denom, dx_1/dx_denom, ...)`
    fn differentiate(
        &mut self,
        f: &PolynomialFunction,
        denom: usize,
    ) -> CalcResult<PolynomialFunction> {
        let gradient = f.gradient();
        let mut tangent = Vec::with_capacity(f.arity());
        for m in 0..f.arity() {
            if f.dims()[m] < 2 {
                tangent.push(PolynomialFunction::zero());
            } else {
                tangent.push(self.iterate(m, denom)?);
            }
        }
        gradient.dot(&VectorFunction::new(tangent))
    }

    /// `dx_num/dx_denom`
    fn iterate(&mut self, num: usize, denom: usize) -> CalcResult<PolynomialFunction> {
        if num == denom {
            return Ok(PolynomialFunction::one());
        }
        if let Some(known) = self.computed.get(&(num, denom)) {
            return Ok(known.clone());
        }
        let inner = self.inner;
        let definition = inner.get(num).and_then(|g| g.as_ref());
        let result = match definition {
            Some(g) if !self.dependencies[num].is_empty() => self.differentiate(g, denom)?,
            _ if !self.depends_on(denom, num) => {
                self.computed
                    .insert((denom, num), PolynomialFunction::zero());
                PolynomialFunction::zero()
            }
            _ => self.invert(num, denom)?,
        };
        self.computed.insert((num, denom), result.clone());
        Ok(result)
    }

    /// `dx_num/dx_denom = 1 / (dx_denom/dx_num)` for an independent `num`
    fn invert(&mut self, num: usize, denom: usize) -> CalcResult<PolynomialFunction> {
        match self.inverted {
            Some(pair) if pair != (num, denom) => {
                return Err(CalcError::UnsupportedOperation(format!(
                    "d x{}/d x{} needs a second implicit inversion",
                    num, denom
                )));
            }
            _ => self.inverted = Some((num, denom)),
        }
        info!(
            "d x{}/d x{} taken as the reciprocal of d x{}/d x{}",
            num, denom, denom, num
        );
        let inner = self.inner;
        let outer = inner
            .get(denom)
            .and_then(|g| g.as_ref())
            .ok_or(CalcError::InvalidMode {
                mode: denom,
                arity: inner.len(),
            })?;
        let forward = self.differentiate(outer, num)?;
        let value = forward.constant_value().ok_or_else(|| {
            CalcError::UnsupportedOperation(format!(
                "d x{}/d x{} is not constant and has no polynomial reciprocal",
                denom, num
            ))
        })?;
        let reciprocal = PolynomialFunction::constant(Scalar::ONE.checked_div(&value)?);
        self.computed.insert((denom, num), forward);
        Ok(reciprocal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direct_dependence() {
        // f(x, t) = x^2, x = 3t -> df/dt = 2x * 3
        let f = PolynomialFunction::monomial(&[2, 0], Scalar::ONE);
        let x = PolynomialFunction::monomial(&[0, 1], Scalar::Real(3.0));
        let d = f.total_differ(1, &[Some(x), None]).unwrap();
        assert_relative_eq!(d.apply_reals(&[6.0, 2.0]).unwrap().real(), 36.0);
    }

    #[test]
    fn test_reciprocal_branch() {
        // f(x, t) = x + t with t = 2x: df/dt = 1/2 + 1
        let f = PolynomialFunction::from_reals(&[2, 2], &[0.0, 1.0, 1.0, 0.0]).unwrap();
        let t = PolynomialFunction::monomial(&[1], Scalar::Real(2.0));
        let d = f.total_differ(1, &[None, Some(t)]).unwrap();
        assert_relative_eq!(d.apply_reals(&[5.0, 7.0]).unwrap().real(), 1.5);
    }

    #[test]
    fn test_reciprocal_of_non_constant_is_unsupported() {
        let f = PolynomialFunction::variable(0, 2);
        let t = PolynomialFunction::monomial(&[2], Scalar::ONE);
        assert!(matches!(
            f.total_differ(1, &[None, Some(t)]),
            Err(CalcError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_reciprocal_of_zero_derivative() {
        // f(x, t) = x with t = x - x: t has an x-axis but dt/dx = 0
        let f = PolynomialFunction::variable(0, 2);
        let t = PolynomialFunction::from_reals(&[2, 1], &[0.0, 0.0]).unwrap();
        assert_eq!(
            f.total_differ(1, &[None, Some(t)]),
            Err(CalcError::DivisionByZero)
        );
    }

    #[test]
    fn test_reciprocal_through_transitive_dependence() {
        // y = x, t = 2y, f(x, y, t) = x^2 + t: dx/dt = 1/2, df/dt = x + 1
        let y = PolynomialFunction::variable(0, 1);
        let t = PolynomialFunction::monomial(&[0, 1], Scalar::Real(2.0));
        let f = PolynomialFunction::monomial(&[2, 0, 0], Scalar::ONE)
            .add(&PolynomialFunction::variable(2, 3));
        let d = f.total_differ(2, &[None, Some(y.clone()), Some(t.clone())]).unwrap();
        assert_relative_eq!(d.apply_reals(&[4.0, 0.0, 0.0]).unwrap().real(), 5.0);
        let x = PolynomialFunction::variable(0, 3);
        let dx = x.total_differ(2, &[None, Some(y), Some(t)]).unwrap();
        assert_eq!(dx.constant_value(), Some(Scalar::Real(0.5)));
    }

    #[test]
    fn test_second_inversion_is_unsupported() {
        // f = x + y with x, y independent and t = x + y
        let f = PolynomialFunction::from_reals(&[2, 2], &[0.0, 1.0, 1.0, 0.0]).unwrap();
        let t = PolynomialFunction::from_reals(&[2, 2], &[0.0, 1.0, 1.0, 0.0]).unwrap();
        assert!(matches!(
            f.total_differ(2, &[None, None, Some(t)]),
            Err(CalcError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_cycle() {
        let f = PolynomialFunction::from_reals(&[2, 2], &[0.0, 0.0, 0.0, 1.0]).unwrap();
        let x = PolynomialFunction::variable(1, 2);
        let y = PolynomialFunction::variable(0, 2);
        assert!(matches!(
            f.total_differ(0, &[Some(x), Some(y)]),
            Err(CalcError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn test_unrelated_variable_is_constant() {
        // f(x, y) = xy, nothing depends on anything: d/dx = y
        let f = PolynomialFunction::from_reals(&[2, 2], &[0.0, 0.0, 0.0, 1.0]).unwrap();
        let d = f.total_differ(0, &[]).unwrap();
        assert_eq!(d.apply_reals(&[3.0, 5.0]).unwrap(), Scalar::Real(5.0));
    }
}
