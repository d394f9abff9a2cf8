//! # Matrix and Vector
//!
//! Two-dimensional and one-dimensional containers of `Scalar` backed by
//! `nalgebra::DMatrix` / `nalgebra::DVector`.
//!
//! They serve two purposes:
//! 1) plain linear algebra (sum, product, transpose, dot product,
//!    matrix-vector product) with shape checks reported as `CalcError::InvalidShape`;
//! 2) transform matrices of the tensor engine: a mode product with
//!    `Matrix::resize_matrix`, `Matrix::differ_matrix` or `Matrix::integ_matrix`
//!    resizes, differentiates or integrates a coefficient tensor along one axis.
use crate::errors::{CalcError, CalcResult};
use crate::numbers::Scalar;
use nalgebra::{DMatrix, DVector};
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    data: DMatrix<Scalar>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: DMatrix::from_element(rows, cols, Scalar::ZERO),
        }
    }

    /// from row-major real values
    pub fn from_reals(rows: usize, cols: usize, values: &[f64]) -> CalcResult<Self> {
        Self::from_scalars(rows, cols, values.iter().map(|&v| Scalar::Real(v)).collect())
    }

    /// from row-major scalars
    pub fn from_scalars(rows: usize, cols: usize, values: Vec<Scalar>) -> CalcResult<Self> {
        if values.len() != rows * cols {
            return Err(CalcError::InvalidShape(format!(
                "{}x{} matrix needs {} values, got {}",
                rows,
                cols,
                rows * cols,
                values.len()
            )));
        }
        Ok(Self {
            data: DMatrix::from_row_iterator(rows, cols, values),
        })
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn get(&self, row: usize, col: usize) -> Scalar {
        self.data[(row, col)]
    }

    pub fn as_nalgebra(&self) -> &DMatrix<Scalar> {
        &self.data
    }

    fn check_same_shape(&self, other: &Matrix, op: &str) -> CalcResult<()> {
        if self.data.shape() != other.data.shape() {
            return Err(CalcError::InvalidShape(format!(
                "cannot {} {:?} and {:?} matrices",
                op,
                self.data.shape(),
                other.data.shape()
            )));
        }
        Ok(())
    }

    pub fn add(&self, other: &Matrix) -> CalcResult<Matrix> {
        self.check_same_shape(other, "add")?;
        Ok(Matrix {
            data: &self.data + &other.data,
        })
    }

    pub fn subtract(&self, other: &Matrix) -> CalcResult<Matrix> {
        self.check_same_shape(other, "subtract")?;
        Ok(Matrix {
            data: &self.data - &other.data,
        })
    }

    pub fn scale(&self, scalar: Scalar) -> Matrix {
        Matrix {
            data: self.data.map(|v| v * scalar),
        }
    }

    pub fn divide_scalar(&self, scalar: Scalar) -> CalcResult<Matrix> {
        let mut data = self.data.clone();
        for v in data.iter_mut() {
            *v = v.checked_div(&scalar)?;
        }
        Ok(Matrix { data })
    }

    pub fn multiply(&self, other: &Matrix) -> CalcResult<Matrix> {
        if self.cols() != other.rows() {
            return Err(CalcError::InvalidShape(format!(
                "cannot multiply {:?} by {:?}",
                self.data.shape(),
                other.data.shape()
            )));
        }
        Ok(Matrix {
            data: &self.data * &other.data,
        })
    }

    pub fn transpose(&self) -> Matrix {
        Matrix {
            data: self.data.transpose(),
        }
    }

    pub fn multiply_vector(&self, vector: &Vector) -> CalcResult<Vector> {
        if self.cols() != vector.len() {
            return Err(CalcError::InvalidShape(format!(
                "cannot multiply {:?} matrix by vector of length {}",
                self.data.shape(),
                vector.len()
            )));
        }
        Ok(Vector {
            data: &self.data * &vector.data,
        })
    }

    /// Applies the matrix to one strand of a tensor. The strand length must equal
    /// the column count; zero matrix entries are skipped.
    pub(crate) fn apply_to_strand(&self, strand: &[Scalar]) -> Vec<Scalar> {
        (0..self.rows())
            .map(|l| {
                let mut sum = Scalar::ZERO;
                for (m, value) in strand.iter().enumerate() {
                    let entry = self.data[(l, m)];
                    if !entry.is_zero() {
                        sum += entry * *value;
                    }
                }
                sum
            })
            .collect()
    }

    /// `new_size x old_size` matrix copying a vector into a longer (or shorter)
    /// one, with `before` empty cells in front of the first copied value
    pub fn resize_matrix(old_size: usize, new_size: usize, before: usize) -> Matrix {
        let mut m = Matrix::zeros(new_size, old_size);
        for i in 0..old_size {
            if i + before >= new_size {
                break;
            }
            m.data[(i + before, i)] = Scalar::ONE;
        }
        m
    }

    /// Matrix of the `k`-th derivative of a degree-`n` polynomial, `k <= n`:
    /// `(n+1-k) x (n+1)`, row `i` holds `(i+1)(i+2)...(i+k)` at column `i+k`.
    pub fn differ_matrix(n: usize, k: usize) -> Matrix {
        let rows = n + 1 - k;
        let mut m = Matrix::zeros(rows, n + 1);
        for i in 0..rows {
            let factor: f64 = (0..k).map(|j| (i + j + 1) as f64).product();
            m.data[(i, i + k)] = Scalar::Real(factor);
        }
        m
    }

    /// Matrix of the `k`-th integral of a degree-`n` polynomial:
    /// `(n+1+k) x (n+1)`, column `i` holds `1/[(i+1)(i+2)...(i+k)]` at row `i+k`.
    pub fn integ_matrix(n: usize, k: usize) -> Matrix {
        let cols = n + 1;
        let mut m = Matrix::zeros(cols + k, cols);
        for i in 0..cols {
            let factor: f64 = (0..k).map(|j| (i + j + 1) as f64).product();
            m.data[(i + k, i)] = Scalar::Real(1.0 / factor);
        }
        m
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for r in 0..self.rows() {
            if r > 0 {
                write!(f, "\n ")?;
            }
            let row: Vec<String> = (0..self.cols()).map(|c| self.get(r, c).to_string()).collect();
            write!(f, "[{}]", row.join(", "))?;
        }
        write!(f, "]")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Vector {
    data: DVector<Scalar>,
}

impl Vector {
    pub fn from_scalars(values: Vec<Scalar>) -> Self {
        Self {
            data: DVector::from_vec(values),
        }
    }

    pub fn from_reals(values: &[f64]) -> Self {
        Self::from_scalars(values.iter().map(|&v| Scalar::Real(v)).collect())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, i: usize) -> Scalar {
        self.data[i]
    }

    pub fn as_slice(&self) -> &[Scalar] {
        self.data.as_slice()
    }

    fn check_len(&self, other: &Vector) -> CalcResult<()> {
        if self.len() != other.len() {
            return Err(CalcError::InvalidShape(format!(
                "vector lengths differ: {} and {}",
                self.len(),
                other.len()
            )));
        }
        Ok(())
    }

    pub fn add(&self, other: &Vector) -> CalcResult<Vector> {
        self.check_len(other)?;
        Ok(Vector {
            data: &self.data + &other.data,
        })
    }

    pub fn subtract(&self, other: &Vector) -> CalcResult<Vector> {
        self.check_len(other)?;
        Ok(Vector {
            data: &self.data - &other.data,
        })
    }

    pub fn scale(&self, scalar: Scalar) -> Vector {
        Vector {
            data: self.data.map(|v| v * scalar),
        }
    }

    /// unconjugated dot product
    pub fn dot(&self, other: &Vector) -> CalcResult<Scalar> {
        self.check_len(other)?;
        Ok(self.data.dot(&other.data))
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let items: Vec<String> = self.data.iter().map(|v| v.to_string()).collect();
        write!(f, "<{}>", items.join(", "))
    }
}
