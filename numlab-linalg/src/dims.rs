//! Immutable shape record used in error messages and broadcast decisions.

use crate::matrix::Matrix;
use std::fmt;

/// An `(m, n)` pair: `m` rows, `n` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

impl Dimensions {
    pub fn new(rows: usize, cols: usize) -> Self {
        Dimensions { rows, cols }
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn is_row_vector(&self) -> bool {
        self.rows == 1
    }

    pub fn is_col_vector(&self) -> bool {
        self.cols == 1
    }

    pub fn is_vector(&self) -> bool {
        self.is_row_vector() || self.is_col_vector()
    }

    pub fn is_scalar(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }

    pub fn as_tuple(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The spec keeps `size()` as an algebraic quantity, not just an integer
    /// pair: decomposition code in C7/C8 consumes shape as a `1x2` matrix.
    /// This is that conversion; `as_tuple` covers the plain Rust case.
    pub fn shape_vector(&self) -> Matrix {
        Matrix::from_row_major(1, 2, vec![self.rows as f64, self.cols as f64])
            .expect("1x2 buffer always matches a 1x2 shape")
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
