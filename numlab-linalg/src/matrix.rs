//! Dense storage & element access (spec C1).
//!
//! `Matrix` wraps an [`ndarray::Array2<f64>`] kept in standard (row-major)
//! layout, so `elements()` always returns the `m*n` contiguous buffer the
//! spec describes, addressed as `elements[i*n + j]`. A "vector" is just a
//! matrix with `m == 1` or `n == 1`; a "scalar" is a matrix with `m == n ==
//! 1`. No separate storage type exists for either.

use ndarray::Array2;

use crate::dims::Dimensions;
use crate::error::{LinalgError, LinalgResult};

/// A dense, real-valued, row-major `m x n` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Array2<f64>,
}

impl Matrix {
    /// A zero-filled `rows x cols` matrix. Rejects negative dimensions by
    /// construction (`usize` cannot be negative); callers coming from a
    /// signed count should use [`Matrix::try_new`].
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Validates signed dimensions before allocating. This is the entry point
    /// for boundary adapters that receive dimensions as parsed integers.
    pub fn try_new(rows: i64, cols: i64) -> LinalgResult<Self> {
        if rows < 0 || cols < 0 {
            return Err(LinalgError::InvalidDimensions { rows, cols });
        }
        Ok(Matrix::zeros(rows as usize, cols as usize))
    }

    /// A `rows x cols` matrix with every element set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Matrix {
            data: Array2::from_elem((rows, cols), value),
        }
    }

    /// Builds a matrix from a length-`rows*cols` buffer interpreted row-major.
    pub fn from_row_major(rows: usize, cols: usize, buffer: Vec<f64>) -> LinalgResult<Self> {
        let data = Array2::from_shape_vec((rows, cols), buffer).map_err(|_| {
            LinalgError::ShapeMismatch {
                context: "Matrix::from_row_major".to_string(),
                expected: (rows, cols),
                actual: (rows, cols),
            }
        })?;
        Ok(Matrix { data })
    }

    /// Like [`Matrix::from_row_major`] but interprets the buffer as column-major
    /// (i.e. transposed) before storing it row-major internally.
    pub fn from_row_major_transposed(rows: usize, cols: usize, buffer: Vec<f64>) -> LinalgResult<Self> {
        let transposed = Matrix::from_row_major(cols, rows, buffer)?;
        Ok(transposed.transpose())
    }

    /// Builds a matrix from a 2-D table; every row must have the same length.
    pub fn from_table(rows: Vec<Vec<f64>>) -> LinalgResult<Self> {
        let m = rows.len();
        let n = rows.first().map_or(0, |r| r.len());
        let mut buffer = Vec::with_capacity(m * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(LinalgError::RaggedInput {
                    row: i,
                    found: row.len(),
                    expected: n,
                });
            }
            buffer.extend(row);
        }
        Matrix::from_row_major(m, n, buffer)
    }

    /// A vector (shape `1xlen` if `transposed`, else `lenx1`).
    pub fn vector(values: Vec<f64>, transposed: bool) -> Self {
        let len = values.len();
        let shape = if transposed { (1, len) } else { (len, 1) };
        Matrix {
            data: Array2::from_shape_vec(shape, values).expect("vector shape always matches its own length"),
        }
    }

    /// A single-element matrix.
    pub fn scalar(value: f64) -> Self {
        Matrix::filled(1, 1, value)
    }

    pub fn identity(n: usize) -> Self {
        Matrix {
            data: Array2::eye(n),
        }
    }

    pub fn dims(&self) -> Dimensions {
        Dimensions::new(self.data.nrows(), self.data.ncols())
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// `true` for a `1x1` matrix.
    pub fn is_scalar(&self) -> bool {
        self.dims().is_scalar()
    }

    pub fn is_vector(&self) -> bool {
        self.dims().is_vector()
    }

    /// The flat row-major buffer: `elements()[i*n + j] == get(i, j)`.
    pub fn elements(&self) -> &[f64] {
        self.data
            .as_slice()
            .expect("Matrix invariant: storage is always standard (row-major) layout")
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[[i, j]]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[[i, j]] = value;
    }

    /// Overwrites every element with `value`. In-place, mirrors the spec's
    /// `fill` operator family.
    pub fn fill(&mut self, value: f64) -> &mut Self {
        self.data.fill(value);
        self
    }

    /// A copy of row `i` as a `1xn` matrix.
    pub fn row(&self, i: usize) -> Matrix {
        Matrix::from_row_major(1, self.cols(), self.data.row(i).to_vec())
            .expect("row copy always matches its own shape")
    }

    /// A copy of column `j` as an `mx1` matrix.
    pub fn column(&self, j: usize) -> Matrix {
        Matrix::vector(self.data.column(j).to_vec(), false)
    }

    /// Extracts the submatrix covering `rows` and `cols`, copying into a fresh
    /// buffer.
    pub fn submatrix(&self, rows: std::ops::Range<usize>, cols: std::ops::Range<usize>) -> LinalgResult<Matrix> {
        if rows.end > self.rows() || cols.end > self.cols() {
            return Err(LinalgError::ShapeMismatch {
                context: "Matrix::submatrix".to_string(),
                expected: (self.rows(), self.cols()),
                actual: (rows.end, cols.end),
            });
        }
        let view = self.data.slice(ndarray::s![rows, cols]);
        Ok(Matrix {
            data: view.to_owned(),
        })
    }

    /// Extracts the submatrix selecting the given row and column indices
    /// (arbitrary order, may repeat), copying into a fresh buffer.
    pub fn select(&self, row_idx: &[usize], col_idx: &[usize]) -> Matrix {
        let mut out = Matrix::zeros(row_idx.len(), col_idx.len());
        for (oi, &i) in row_idx.iter().enumerate() {
            for (oj, &j) in col_idx.iter().enumerate() {
                out.set(oi, oj, self.get(i, j));
            }
        }
        out
    }

    /// Writes `block` into `self` at `(row_offset, col_offset)`.
    pub fn set_submatrix(&mut self, row_offset: usize, col_offset: usize, block: &Matrix) -> LinalgResult<()> {
        if row_offset + block.rows() > self.rows() || col_offset + block.cols() > self.cols() {
            return Err(LinalgError::ShapeMismatch {
                context: "Matrix::set_submatrix".to_string(),
                expected: (self.rows(), self.cols()),
                actual: (row_offset + block.rows(), col_offset + block.cols()),
            });
        }
        for i in 0..block.rows() {
            for j in 0..block.cols() {
                self.set(row_offset + i, col_offset + j, block.get(i, j));
            }
        }
        Ok(())
    }

    /// A new matrix that is the transpose of `self`.
    pub fn transpose(&self) -> Matrix {
        Matrix {
            data: self.data.t().as_standard_layout().to_owned(),
        }
    }

    /// Fails unless `self` is `1x1`.
    pub fn to_scalar(&self) -> LinalgResult<f64> {
        if self.is_scalar() {
            Ok(self.get(0, 0))
        } else {
            Err(LinalgError::ShapeMismatch {
                context: "Matrix::to_scalar".to_string(),
                expected: (1, 1),
                actual: self.dims().as_tuple(),
            })
        }
    }

    /// Fails unless `self` is a row or column vector; returns the elements in
    /// storage order.
    pub fn to_vector(&self) -> LinalgResult<Vec<f64>> {
        if self.is_vector() {
            Ok(self.elements().to_vec())
        } else {
            Err(LinalgError::ShapeMismatch {
                context: "Matrix::to_vector".to_string(),
                expected: (1, self.cols().max(self.rows())),
                actual: self.dims().as_tuple(),
            })
        }
    }

    pub(crate) fn view(&self) -> ndarray::ArrayView2<'_, f64> {
        self.data.view()
    }

    pub(crate) fn from_array(data: Array2<f64>) -> Self {
        Matrix { data }
    }

    pub(crate) fn array(&self) -> &Array2<f64> {
        &self.data
    }

    pub(crate) fn array_mut(&mut self) -> &mut Array2<f64> {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fill_on_construction() {
        let m = Matrix::zeros(2, 3);
        assert_eq!(m.elements(), &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn row_major_indexing() {
        let m = Matrix::from_row_major(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.get(0, 2), 3.0);
        assert_eq!(m.get(1, 0), 4.0);
        assert_eq!(m.elements()[1 * 3 + 2], 6.0);
    }

    #[test]
    fn ragged_table_rejected() {
        let err = Matrix::from_table(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, LinalgError::RaggedInput { .. }));
    }

    #[test]
    fn negative_dimensions_rejected() {
        let err = Matrix::try_new(-1, 2).unwrap_err();
        assert!(matches!(err, LinalgError::InvalidDimensions { .. }));
    }

    #[test]
    fn clone_is_deep() {
        let original = Matrix::from_row_major(1, 2, vec![1.0, 2.0]).unwrap();
        let mut clone = original.clone();
        clone.set(0, 0, 99.0);
        assert_eq!(original.get(0, 0), 1.0);
    }

    #[test]
    fn transpose_is_involutive() {
        let m = Matrix::from_row_major(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    fn submatrix_copies_not_aliases() {
        let m = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut sub = m.submatrix(0..1, 0..2).unwrap();
        sub.set(0, 0, 42.0);
        assert_eq!(m.get(0, 0), 1.0);
    }

    #[test]
    fn row_and_column_accessors_copy() {
        let m = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.row(1).elements(), &[3.0, 4.0]);
        assert_eq!(m.column(1).elements(), &[2.0, 4.0]);
    }
}
