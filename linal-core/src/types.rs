//! Vector and matrix operands
//!
//! Both are immutable value objects from the caller's point of view:
//! engine routines borrow them and return new values. Routines that
//! eliminate in place clone into an owned scratch copy first.

use std::fmt;
use std::ops::{Index, IndexMut};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use crate::{format_real, LinalError};

/// Decimal places used by `Display`
const DISPLAY_PLACES: usize = 4;

/// Ordered sequence of real components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<f64>", from = "Vec<f64>")]
pub struct Vector {
    data: DVector<f64>,
}

/// Rectangular grid of reals, addressed `(row, col)` from 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<f64>>", try_from = "Vec<Vec<f64>>")]
pub struct Matrix {
    data: DMatrix<f64>,
}

impl Vector {
    pub fn new(components: Vec<f64>) -> Self {
        Self { data: DVector::from_vec(components) }
    }

    pub fn from_slice(components: &[f64]) -> Self {
        Self { data: DVector::from_column_slice(components) }
    }

    pub fn zeros(dim: usize) -> Self {
        Self { data: DVector::zeros(dim) }
    }

    pub fn from_dvector(data: DVector<f64>) -> Self {
        Self { data }
    }

    /// Number of components
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied()
    }

    pub fn components(&self) -> &[f64] {
        self.data.as_slice()
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter()
    }

    pub fn as_dvector(&self) -> &DVector<f64> {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.as_slice().to_vec()
    }

    /// Largest absolute componentwise difference is within `eps`
    pub fn approx_eq(&self, other: &Vector, eps: f64) -> bool {
        self.dim() == other.dim()
            && self.iter().zip(other.iter()).all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Matrix {
    /// Build from row lists. An empty list yields the 0×0 matrix.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, LinalError> {
        if rows.is_empty() {
            return Ok(Self::empty());
        }
        let cols = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(LinalError::format_error(format!(
                    "matrix row {} has {} entries, expected {}",
                    i + 1, row.len(), cols
                )));
            }
        }
        let n = rows.len();
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Ok(Self { data: DMatrix::from_row_slice(n, cols, &flat) })
    }

    /// Build from a row-major slice; `values.len()` must equal `rows * cols`
    pub fn from_row_slice(rows: usize, cols: usize, values: &[f64]) -> Self {
        Self { data: DMatrix::from_row_slice(rows, cols, values) }
    }

    /// Stack vectors as the columns of a matrix
    pub fn from_columns(columns: &[Vector]) -> Result<Self, LinalError> {
        let Some(first) = columns.first() else {
            return Ok(Self::empty());
        };
        let dim = first.dim();
        if let Some((i, v)) = columns.iter().enumerate().find(|(_, v)| v.dim() != dim) {
            return Err(LinalError::dimension_mismatch(format!(
                "vector {} has dimension {}, expected {}",
                i + 1, v.dim(), dim
            )));
        }
        let cols: Vec<DVector<f64>> = columns.iter().map(|v| v.as_dvector().clone()).collect();
        Ok(Self { data: DMatrix::from_columns(&cols) })
    }

    pub fn from_dmatrix(data: DMatrix<f64>) -> Self {
        Self { data }
    }

    /// The 0×0 matrix produced by an empty literal
    pub fn empty() -> Self {
        Self { data: DMatrix::zeros(0, 0) }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { data: DMatrix::zeros(rows, cols) }
    }

    pub fn identity(n: usize) -> Self {
        Self { data: DMatrix::identity(n, n) }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }

    /// Row `i` as a vector. Panics when out of range, like indexing.
    pub fn row(&self, i: usize) -> Vector {
        Vector::from_dvector(self.data.row(i).transpose())
    }

    /// Column `j` as a vector. Panics when out of range, like indexing.
    pub fn column(&self, j: usize) -> Vector {
        Vector::from_dvector(self.data.column(j).clone_owned())
    }

    pub fn transpose(&self) -> Matrix {
        Self { data: self.data.transpose() }
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a != b {
            self.data.swap_rows(a, b);
        }
    }

    pub fn as_dmatrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn into_dmatrix(self) -> DMatrix<f64> {
        self.data
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows())
            .map(|i| (0..self.cols()).map(|j| self.data[(i, j)]).collect())
            .collect()
    }

    /// Same shape and every entry within `eps`
    pub fn approx_eq(&self, other: &Matrix, eps: f64) -> bool {
        self.rows() == other.rows()
            && self.cols() == other.cols()
            && self.data.iter().zip(other.data.iter()).all(|(a, b)| (a - b).abs() <= eps)
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        &mut self.data[index]
    }
}

impl From<Vec<f64>> for Vector {
    fn from(components: Vec<f64>) -> Self {
        Vector::new(components)
    }
}

impl From<Vector> for Vec<f64> {
    fn from(v: Vector) -> Self {
        v.to_vec()
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = LinalError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Matrix::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(m: Matrix) -> Self {
        m.to_rows()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, x) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", format_real(*x, DISPLAY_PLACES))?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.rows() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", self.row(i))?;
        }
        write!(f, "]")
    }
}
