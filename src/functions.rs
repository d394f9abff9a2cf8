#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
///____________________________________________________________________________________________________________________________
/// # Polynomial functions
/// a multivariate polynomial stored as a tensor of coefficients: construction,
/// evaluation and algebra
///# Example
/// ```
/// use RustedPolyTensor::functions::poly_function::PolynomialFunction;
/// // f(x, y) = 1 + 2x + 3y + 4xy
/// let f = PolynomialFunction::from_reals(&[2, 2], &[1.0, 2.0, 3.0, 4.0]).unwrap();
/// let g = f.multiply(&f);
/// assert_eq!(g.degree(0), 2);
/// println!("f(2, 3) = {}", f.apply_reals(&[2.0, 3.0]).unwrap());
/// ```
pub mod poly_function;
/// partial derivatives, integrals and gradients
pub mod calculus;
/// substitution of a function into one variable of another
pub mod composition;
///____________________________________________________________________________________________________________________________
/// # Total derivative
/// chain-rule differentiation through variables defined by other functions
///# Example
/// ```
/// use RustedPolyTensor::functions::poly_function::PolynomialFunction;
/// use RustedPolyTensor::numbers::Scalar;
/// // f(x, t) = x t with x = t: df/dt = t + x
/// let f = PolynomialFunction::monomial(&[1, 1], Scalar::ONE);
/// let x = PolynomialFunction::variable(1, 2);
/// let d = f.total_differ(1, &[Some(x), None]).unwrap();
/// assert_eq!(d.apply_reals(&[2.0, 3.0]).unwrap(), Scalar::Real(5.0));
/// ```
pub mod total_derivative;
/// Taylor series helpers: exponential, sine, cosine, real powers and gamma
pub mod series;
/// vector-valued polynomial functions
pub mod vector_function;
