//! # Tensor Engine
//!
//! Dense n-dimensional array of `Scalar` backed by `ndarray::ArrayD` in Fortran
//! layout, so dimension 0 varies fastest in memory and `data()` is the storage
//! order `i_0 + i_1*d_0 + i_2*d_0*d_1 + ...`. Tensors are values: every
//! operation allocates a new tensor and leaves its inputs untouched.
//!
//! ## Main Structures and Methods
//! - `Tensor::new(dims, data)` / `Tensor::from_derivatives(dims, values)` - the
//!   latter divides each value by the product of the factorials of its indices
//! - `add`, `subtract` - both operands are first resized to the elementwise maximum
//!   of their dimension vectors, new cells are zero
//! - `convolve` - polynomial-style product, output index = sum of input indices
//! - `mode_product(matrix, mode)` - every 1-D strand along `mode` is replaced by
//!   `matrix * strand`; resizing, differentiation and integration are built on it
//! - `inner_product` - sum of elementwise products of equal-shaped tensors
//! - `condense`, `trim`, `expand`, `resize`, `resize_with_offset`
//!
//! ## Interesting Code Features
//! 1. Resizing is expressed through transform matrices (`Matrix::resize_matrix`)
//!    applied axis by axis, so the same primitive serves calculus and reshaping.
//! 2. Convolution and composition add scaled copies of one tensor into windows of
//!    the output (`slice_each_axis_mut`), skipping zero cells of both operands.
//! 3. Mode products walk matching `lanes` of the input and output with `Zip`.
use crate::errors::{CalcError, CalcResult};
use crate::mat::matrix::Matrix;
use crate::numbers::Scalar;
use log::debug;
use ndarray::{ArrayD, ArrayViewD, Axis, Dimension, IxDyn, ShapeBuilder, Slice, Zip};
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    data: ArrayD<Scalar>,
}

fn check_dims(dims: &[usize]) -> CalcResult<()> {
    match dims.iter().position(|&d| d == 0) {
        Some(axis) => Err(CalcError::InvalidShape(format!(
            "dimension {} of {:?} is zero",
            axis, dims
        ))),
        None => Ok(()),
    }
}

fn zeros_f(dims: &[usize]) -> ArrayD<Scalar> {
    ArrayD::zeros(IxDyn(dims).f())
}

impl Tensor {
    /// Tensor from a dimension vector (every entry >= 1) and its cells in storage order.
    pub fn new(dims: &[usize], data: Vec<Scalar>) -> CalcResult<Self> {
        check_dims(dims)?;
        let size: usize = dims.iter().product();
        if data.len() != size {
            return Err(CalcError::InvalidShape(format!(
                "dimensions {:?} need {} values, got {}",
                dims,
                size,
                data.len()
            )));
        }
        let data = ArrayD::from_shape_vec(IxDyn(dims).f(), data)
            .map_err(|e| CalcError::InvalidShape(e.to_string()))?;
        Ok(Self { data })
    }

    /// Keeps Fortran layout whatever layout `array` came in.
    fn from_array(array: ArrayD<Scalar>) -> Self {
        if array.t().is_standard_layout() {
            return Self { data: array };
        }
        let data = ArrayD::from_shape_fn(IxDyn(array.shape()).f(), |idx| array[idx.slice()]);
        Self { data }
    }

    /// cell `idx` is `f(idx)`
    pub(crate) fn from_fn(dims: &[usize], mut f: impl FnMut(&[usize]) -> Scalar) -> Self {
        Self {
            data: ArrayD::from_shape_fn(IxDyn(dims).f(), |idx| f(idx.slice())),
        }
    }

    pub fn from_reals(dims: &[usize], data: &[f64]) -> CalcResult<Self> {
        Self::new(dims, data.iter().map(|&v| Scalar::Real(v)).collect())
    }

    /// Tensor whose cells are the partial derivatives of all orders at the origin;
    /// each cell `(i_0, ..., i_{k-1})` is divided by `i_0! * ... * i_{k-1}!`.
    pub fn from_derivatives(dims: &[usize], values: Vec<Scalar>) -> CalcResult<Self> {
        let mut tensor = Self::new(dims, values)?;
        let max_len = dims.iter().copied().max().unwrap_or(1);
        // reciprocal factorials 1/0!, 1/1!, ...
        let mut recip = Vec::with_capacity(max_len);
        let mut acc = 1.0;
        for i in 0..max_len {
            if i > 0 {
                acc /= i as f64;
            }
            recip.push(acc);
        }
        for (idx, cell) in tensor.data.indexed_iter_mut() {
            let coefficient: f64 = idx.slice().iter().map(|&i| recip[i]).product();
            *cell = cell.mul_real(coefficient);
        }
        Ok(tensor)
    }

    pub fn zeros(dims: &[usize]) -> Self {
        Self { data: zeros_f(dims) }
    }

    /// rank-0 tensor holding one value
    pub fn scalar(value: Scalar) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(&[]), value),
        }
    }

    pub fn dims(&self) -> &[usize] {
        self.data.shape()
    }

    /// number of modes (axes)
    pub fn rank(&self) -> usize {
        self.data.ndim()
    }

    /// size of axis `mode`; axes beyond the rank have size 1
    pub fn dim(&self, mode: usize) -> usize {
        self.dims().get(mode).copied().unwrap_or(1)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// cells in storage order (dimension 0 fastest)
    pub fn data(&self) -> &[Scalar] {
        self.data.as_slice_memory_order().unwrap_or(&[])
    }

    pub fn view(&self) -> ArrayViewD<'_, Scalar> {
        self.data.view()
    }

    /// `(multi-index, cell)` pairs in storage order
    pub fn cells(&self) -> Vec<(Vec<usize>, Scalar)> {
        // the transposed view walks its last axis (our axis 0) fastest
        self.data
            .t()
            .indexed_iter()
            .map(|(idx, v)| (idx.slice().iter().rev().copied().collect(), *v))
            .collect()
    }

    /// cell at a flat storage position
    pub fn get(&self, flat: usize) -> Option<Scalar> {
        self.data().get(flat).copied()
    }

    /// Cell at a multi-index; missing trailing indices are 0, surplus indices
    /// must be 0 and every index must lie inside its axis.
    pub fn get_at(&self, indices: &[usize]) -> Option<Scalar> {
        if indices.iter().skip(self.rank()).any(|&i| i != 0) {
            return None;
        }
        let full: Vec<usize> = (0..self.rank())
            .map(|axis| indices.get(axis).copied().unwrap_or(0))
            .collect();
        self.data.get(full.as_slice()).copied()
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|v| v.is_zero())
    }

    /// smallest dimension vector that can hold both tensors
    pub fn fit(a: &Tensor, b: &Tensor) -> Vec<usize> {
        let rank = a.rank().max(b.rank());
        (0..rank).map(|i| a.dim(i).max(b.dim(i))).collect()
    }

    pub fn add(&self, other: &Tensor) -> Tensor {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn subtract(&self, other: &Tensor) -> Tensor {
        self.zip_with(other, |a, b| a - b)
    }

    fn zip_with(&self, other: &Tensor, op: impl Fn(Scalar, Scalar) -> Scalar) -> Tensor {
        let dims = Tensor::fit(self, other);
        let left = self.grow_to(&dims);
        let right = other.grow_to(&dims);
        Tensor::from_array(
            Zip::from(&left.data)
                .and(&right.data)
                .map_collect(|&a, &b| op(a, b)),
        )
    }

    pub fn scale(&self, scalar: Scalar) -> Tensor {
        Tensor::from_array(self.data.mapv(|v| v * scalar))
    }

    pub fn divide_scalar(&self, scalar: Scalar) -> CalcResult<Tensor> {
        let data = self
            .data()
            .iter()
            .map(|v| v.checked_div(&scalar))
            .collect::<CalcResult<Vec<Scalar>>>()?;
        Tensor::new(self.dims(), data)
    }

    /// Smallest dimensions (each at least 1, rank kept) still holding every
    /// non-zero cell.
    pub fn condense(&self) -> Vec<usize> {
        let mut new_dims = vec![1; self.rank()];
        for (idx, v) in self.data.indexed_iter() {
            if v.is_zero() {
                continue;
            }
            for (d, &i) in idx.slice().iter().enumerate() {
                new_dims[d] = new_dims[d].max(i + 1);
            }
        }
        new_dims
    }

    /// tensor shrunk to `condense()`
    pub fn trim(&self) -> Tensor {
        let dims = self.condense();
        if dims == self.dims() {
            return self.clone();
        }
        self.resize_unchecked(&dims, &vec![0; dims.len()])
    }

    /// Appends trailing axes of the given sizes (each at least 1); the existing
    /// cells land at index 0 of every new axis and all other cells are zero.
    pub fn expand(&self, next_dims: &[usize]) -> CalcResult<Tensor> {
        check_dims(next_dims)?;
        Ok(self.expand_unchecked(next_dims))
    }

    fn expand_unchecked(&self, next_dims: &[usize]) -> Tensor {
        let mut dims = self.dims().to_vec();
        dims.extend_from_slice(next_dims);
        let source = self.padded_view(dims.len());
        let mut data = zeros_f(&dims);
        data.slice_each_axis_mut(|ax| Slice::from(0..source.len_of(ax.axis)))
            .assign(&source);
        Tensor { data }
    }

    /// view with size-1 axes appended up to `rank`
    fn padded_view(&self, rank: usize) -> ArrayViewD<'_, Scalar> {
        let mut view = self.data.view();
        while view.ndim() < rank {
            let ax = view.ndim();
            view = view.insert_axis(Axis(ax));
        }
        view
    }

    /// Resizes to `new_dims`. Extra axes are appended with size 1 before any
    /// axis is transformed. Dropping axes is allowed only for axes of size 1.
    pub fn resize(&self, new_dims: &[usize]) -> CalcResult<Tensor> {
        self.resize_with_offset(new_dims, &vec![0; new_dims.len()])
    }

    /// Like `resize`, but every axis `i` gets `offset[i]` zero cells in front of
    /// the copied values.
    pub fn resize_with_offset(&self, new_dims: &[usize], offset: &[usize]) -> CalcResult<Tensor> {
        if offset.len() != new_dims.len() {
            return Err(CalcError::InvalidShape(format!(
                "offset {:?} does not match dimensions {:?}",
                offset, new_dims
            )));
        }
        if new_dims.iter().any(|&d| d == 0) {
            return Err(CalcError::InvalidShape(format!(
                "cannot resize to {:?}",
                new_dims
            )));
        }
        if new_dims.len() < self.rank() && self.dims()[new_dims.len()..].iter().any(|&d| d > 1) {
            return Err(CalcError::InvalidShape(format!(
                "cannot drop non-trivial axes of {:?} when resizing to {:?}",
                self.dims(),
                new_dims
            )));
        }
        Ok(self.resize_unchecked(new_dims, offset))
    }

    fn resize_unchecked(&self, new_dims: &[usize], offset: &[usize]) -> Tensor {
        if self.dims() == new_dims && offset.iter().all(|&o| o == 0) {
            return self.clone();
        }
        let mut t = if new_dims.len() > self.rank() {
            self.expand_unchecked(&vec![1; new_dims.len() - self.rank()])
        } else if new_dims.len() < self.rank() {
            // only size-1 axes are dropped
            let mut view = self.data.view();
            while view.ndim() > new_dims.len() {
                let ax = view.ndim() - 1;
                view = view.index_axis_move(Axis(ax), 0);
            }
            Tensor::from_array(view.to_owned())
        } else {
            self.clone()
        };
        for (axis, (&size, &before)) in new_dims.iter().zip(offset.iter()).enumerate() {
            if t.dims()[axis] == size && before == 0 {
                continue;
            }
            let m = Matrix::resize_matrix(t.dims()[axis], size, before);
            t = t.mode_product_unchecked(&m, axis);
        }
        t
    }

    /// growth to dimensions that contain the current ones
    pub(crate) fn grow_to(&self, new_dims: &[usize]) -> Tensor {
        self.resize_unchecked(new_dims, &vec![0; new_dims.len()])
    }

    /// Mode product: `matrix` (L x K) applied to every strand along axis `mode`
    /// of size K; the result has size L along `mode`.
    pub fn mode_product(&self, matrix: &Matrix, mode: usize) -> CalcResult<Tensor> {
        if mode >= self.rank() {
            return Err(CalcError::InvalidShape(format!(
                "mode {} out of bounds for tensor of rank {}",
                mode,
                self.rank()
            )));
        }
        if matrix.cols() != self.dims()[mode] {
            return Err(CalcError::InvalidShape(format!(
                "matrix columns ({}) must match mode-{} size ({})",
                matrix.cols(),
                mode,
                self.dims()[mode]
            )));
        }
        Ok(self.mode_product_unchecked(matrix, mode))
    }

    pub(crate) fn mode_product_unchecked(&self, matrix: &Matrix, mode: usize) -> Tensor {
        let mut new_dims = self.dims().to_vec();
        new_dims[mode] = matrix.rows();
        debug!(
            "mode product along {}: {:?} -> {:?}",
            mode,
            self.dims(),
            new_dims
        );
        let mut data = zeros_f(&new_dims);
        Zip::from(data.lanes_mut(Axis(mode)))
            .and(self.data.lanes(Axis(mode)))
            .for_each(|mut target, strand| {
                let values = matrix.apply_to_strand(&strand.to_vec());
                for (cell, value) in target.iter_mut().zip(values) {
                    *cell = value;
                }
            });
        Tensor { data }
    }

    /// Adds `factor * source` into the window of `self` that starts at `origin`.
    /// `source` has the rank of `self` and the window lies inside `self`.
    pub(crate) fn add_scaled_at(&mut self, origin: &[usize], source: &Tensor, factor: Scalar) {
        let mut window = self.data.slice_each_axis_mut(|ax| {
            let start = origin[ax.axis.index()];
            Slice::from(start..start + source.dim(ax.axis.index()))
        });
        window.zip_mut_with(&source.data, |cell, &v| {
            if !v.is_zero() {
                *cell += factor * v;
            }
        });
    }

    /// Polynomial (convolution) product: the result has size `a_i + b_i - 1` on
    /// every axis and cell `i + j` accumulates `A[i] * B[j]`.
    pub fn convolve(&self, other: &Tensor) -> Tensor {
        let rank = self.rank().max(other.rank());
        let new_dims: Vec<usize> = (0..rank).map(|i| self.dim(i) + other.dim(i) - 1).collect();
        let right = other.with_rank(rank);
        let mut out = Tensor::zeros(&new_dims);
        for (idx, &a) in self.padded_view(rank).indexed_iter() {
            if a.is_zero() {
                continue;
            }
            out.add_scaled_at(idx.slice(), &right, a);
        }
        out
    }

    /// the same cells with size-1 axes appended up to `rank`
    pub(crate) fn with_rank(&self, rank: usize) -> Tensor {
        if rank <= self.rank() {
            return self.clone();
        }
        self.expand_unchecked(&vec![1; rank - self.rank()])
    }

    /// sum of elementwise products of two tensors of identical dimensions
    pub fn inner_product(&self, other: &Tensor) -> CalcResult<Scalar> {
        if self.dims() != other.dims() {
            return Err(CalcError::InvalidShape(format!(
                "inner product of {:?} and {:?}",
                self.dims(),
                other.dims()
            )));
        }
        Ok(Zip::from(&self.data)
            .and(&other.data)
            .fold(Scalar::ZERO, |acc, &a, &b| acc + a * b))
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let items: Vec<String> = self.data().iter().map(|v| v.to_string()).collect();
        write!(
            f,
            "Dimensions: {:?}, Data: [{}]",
            self.dims(),
            items.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(dims: &[usize], data: &[f64]) -> Tensor {
        Tensor::from_reals(dims, data).unwrap()
    }

    #[test]
    fn test_construction_checks_length() {
        assert!(Tensor::from_reals(&[2, 2], &[1.0, 2.0, 3.0]).is_err());
        assert!(Tensor::from_reals(&[2, 0], &[]).is_err());
        assert_eq!(t(&[2, 3], &[0.0; 6]).len(), 6);
        assert_eq!(Tensor::scalar(Scalar::ONE).rank(), 0);
    }

    #[test]
    fn test_from_derivatives_divides_by_factorials() {
        let values = vec![Scalar::Real(6.0); 6];
        let tensor = Tensor::from_derivatives(&[3, 2], values).unwrap();
        // cell (i, j) -> 6 / (i! j!)
        assert_eq!(tensor.get_at(&[0, 0]), Some(Scalar::Real(6.0)));
        assert_eq!(tensor.get_at(&[1, 0]), Some(Scalar::Real(6.0)));
        assert_eq!(tensor.get_at(&[2, 0]), Some(Scalar::Real(3.0)));
        assert_eq!(tensor.get_at(&[2, 1]), Some(Scalar::Real(3.0)));
        assert_eq!(tensor.get_at(&[1, 1]), Some(Scalar::Real(6.0)));
    }

    #[test]
    fn test_add_resizes_to_fit() {
        // (1 + 2x) + (3 + 4y)
        let a = t(&[2], &[1.0, 2.0]);
        let b = t(&[1, 2], &[3.0, 4.0]);
        let sum = a.add(&b);
        assert_eq!(sum.dims(), &[2, 2]);
        assert_eq!(sum, t(&[2, 2], &[4.0, 2.0, 4.0, 0.0]));
        let diff = a.subtract(&b);
        assert_eq!(diff, t(&[2, 2], &[-2.0, 2.0, -4.0, 0.0]));
    }

    #[test]
    fn test_resize_embeds_at_origin() {
        let a = t(&[2, 2], &[1.0, 2.0, 3.0, 4.0]);
        let grown = a.resize(&[3, 2, 2]).unwrap();
        assert_eq!(grown.dims(), &[3, 2, 2]);
        assert_eq!(grown.get_at(&[1, 1, 0]), Some(Scalar::Real(4.0)));
        assert_eq!(grown.get_at(&[2, 1, 0]), Some(Scalar::ZERO));
        assert_eq!(grown.get_at(&[1, 1, 1]), Some(Scalar::ZERO));
        assert!(a.resize(&[2]).is_err());
        assert!(a.resize(&[2, 0]).is_err());
    }

    #[test]
    fn test_resize_with_offset_shifts_each_axis() {
        let a = t(&[2, 1], &[1.0, 2.0]);
        let shifted = a.resize_with_offset(&[3, 2], &[1, 1]).unwrap();
        assert_eq!(shifted.get_at(&[1, 1]), Some(Scalar::Real(1.0)));
        assert_eq!(shifted.get_at(&[2, 1]), Some(Scalar::Real(2.0)));
        assert_eq!(shifted.get_at(&[0, 0]), Some(Scalar::ZERO));
    }

    #[test]
    fn test_convolve_is_polynomial_product() {
        // (1 + x)(1 - x) = 1 - x^2
        let a = t(&[2], &[1.0, 1.0]);
        let b = t(&[2], &[1.0, -1.0]);
        assert_eq!(a.convolve(&b), t(&[3], &[1.0, 0.0, -1.0]));
        // (1 + x)(1 + y) = 1 + x + y + xy
        let c = t(&[1, 2], &[1.0, 1.0]);
        assert_eq!(a.convolve(&c), t(&[2, 2], &[1.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_mode_product() {
        // derivative along axis 1 of 1 + 2y + 3y^2 (+x terms)
        let a = t(&[2, 3], &[1.0, 5.0, 2.0, 0.0, 3.0, 0.0]);
        let d = Matrix::differ_matrix(2, 1);
        let r = a.mode_product(&d, 1).unwrap();
        assert_eq!(r, t(&[2, 2], &[2.0, 0.0, 6.0, 0.0]));
        assert!(matches!(
            a.mode_product(&d, 0),
            Err(CalcError::InvalidShape(_))
        ));
        assert!(a.mode_product(&d, 5).is_err());
    }

    #[test]
    fn test_inner_product() {
        let a = t(&[2, 2], &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.inner_product(&a).unwrap(), Scalar::Real(30.0));
        assert!(a.inner_product(&t(&[4], &[1.0; 4])).is_err());
    }

    #[test]
    fn test_condense_and_trim() {
        let a = t(&[3, 2], &[1.0, 2.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(a.condense(), vec![2, 1]);
        assert_eq!(a.trim(), t(&[2, 1], &[1.0, 2.0]));
        assert_eq!(Tensor::zeros(&[2, 2]).condense(), vec![1, 1]);
    }

    #[test]
    fn test_expand_and_scale() {
        let a = t(&[2], &[1.0, 2.0]);
        let e = a.expand(&[2]).unwrap();
        assert_eq!(e, t(&[2, 2], &[1.0, 2.0, 0.0, 0.0]));
        assert_eq!(a.scale(Scalar::Real(3.0)), t(&[2], &[3.0, 6.0]));
        assert_eq!(
            a.divide_scalar(Scalar::ZERO),
            Err(CalcError::DivisionByZero)
        );
    }

    #[test]
    fn test_accessors_check_bounds() {
        let a = t(&[2, 2], &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.get_at(&[1, 1]), Some(Scalar::Real(4.0)));
        assert_eq!(a.get_at(&[1]), Some(Scalar::Real(2.0)));
        assert_eq!(a.get_at(&[0, 1, 0]), Some(Scalar::Real(3.0)));
        assert_eq!(a.get_at(&[3, 0]), None);
        assert_eq!(a.get_at(&[2, 1]), None);
        assert_eq!(a.get_at(&[0, 0, 1]), None);
        assert_eq!(a.get(3), Some(Scalar::Real(4.0)));
        assert_eq!(a.get(4), None);
        assert!(matches!(a.expand(&[0]), Err(CalcError::InvalidShape(_))));
        assert!(a.expand(&[2, 0]).is_err());
    }

    #[test]
    fn test_cells_follow_storage_order() {
        let a = t(&[2, 3], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let cells = a.cells();
        assert_eq!(cells[1], (vec![1, 0], Scalar::Real(2.0)));
        assert_eq!(cells[2], (vec![0, 1], Scalar::Real(3.0)));
        assert_eq!(cells[5], (vec![1, 2], Scalar::Real(6.0)));
        assert_eq!(a.data()[4], Scalar::Real(5.0));
        // results of arithmetic keep the same storage order
        let doubled = a.add(&a);
        assert_eq!(doubled.data()[1], Scalar::Real(4.0));
        assert_eq!(a.scale(Scalar::Real(2.0)).data(), doubled.data());
    }

    #[test]
    fn test_display() {
        let a = t(&[2], &[1.0, 2.5]);
        assert_eq!(a.to_string(), "Dimensions: [2], Data: [1, 2.5]");
    }
}
