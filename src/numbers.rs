/// real and complex scalars: the cell type of tensors, matrices and vectors
///# Example
/// ```
/// use RustedPolyTensor::numbers::Scalar;
/// let a = Scalar::complex(1.0, 2.0);
/// let b = Scalar::Real(2.0);
/// let q = (a * b).checked_div(&b).unwrap();
/// assert_eq!(q, a);
/// ```
pub mod scalar;
pub use scalar::Scalar;
