#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
///____________________________________________________________________________________________________________________________
/// # Matrix and Vector
/// `nalgebra`-backed 2-D and 1-D containers of `Scalar`, plus the transform
/// matrices used by the tensor engine (resize, differentiate, integrate)
///# Example
/// ```
/// use RustedPolyTensor::mat::matrix::{Matrix, Vector};
/// let m = Matrix::from_reals(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
/// let v = Vector::from_reals(&[1.0, 1.0]);
/// let r = m.multiply_vector(&v).unwrap();
/// assert_eq!(r, Vector::from_reals(&[3.0, 7.0]));
/// ```
pub mod matrix;
///____________________________________________________________________________________________________________________________
/// # Tensor engine
/// dense n-dimensional coefficient arrays (`ndarray`, dimension 0 fastest) with
/// resizing, mode products, convolution and inner product
///# Example
/// ```
/// use RustedPolyTensor::mat::tensor::Tensor;
/// use RustedPolyTensor::numbers::Scalar;
/// // (1 + x)(1 - x) = 1 - x^2
/// let a = Tensor::from_reals(&[2], &[1.0, 1.0]).unwrap();
/// let b = Tensor::from_reals(&[2], &[1.0, -1.0]).unwrap();
/// assert_eq!(a.convolve(&b), Tensor::from_reals(&[3], &[1.0, 0.0, -1.0]).unwrap());
/// // cells are listed with dimension 0 varying fastest
/// let c = Tensor::from_reals(&[2, 2], &[1.0, 2.0, 3.0, 4.0]).unwrap();
/// assert_eq!(c.get_at(&[1, 0]), Some(Scalar::Real(2.0)));
/// assert_eq!(c.get_at(&[2, 0]), None);
/// ```
pub mod tensor;
