//! LU decomposition with partial pivoting (spec C4).
//!
//! Crout's algorithm: column `k` is eliminated using the largest-magnitude
//! candidate pivot in rows `k..m`, swapped into place before elimination.
//! Singular matrices never produce an `Err` here: [`LuDecomposition::compute`]
//! always succeeds and records whether the result is usable via
//! [`LuDecomposition::is_nonsingular`]; only [`LuDecomposition::solve`] turns
//! that into a [`crate::error::LinalgError::Singular`].

use numlab_core::diagnostics::default_diagnostics;

use crate::error::{LinalgError, LinalgResult};
use crate::matrix::Matrix;

/// In-place LU factorization of a square matrix: `P*A = L*U`.
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    lu: Matrix,
    pivots: Vec<usize>,
    pivot_sign: f64,
    n: usize,
}

impl LuDecomposition {
    pub fn compute(a: &Matrix) -> LinalgResult<Self> {
        let dims = a.dims();
        if !dims.is_square() {
            return Err(LinalgError::ShapeMismatch {
                context: "LuDecomposition::compute".to_string(),
                expected: (dims.rows, dims.rows),
                actual: dims.as_tuple(),
            });
        }
        let n = dims.rows;
        let mut lu = a.clone();
        let mut pivots: Vec<usize> = (0..n).collect();
        let mut pivot_sign = 1.0;

        for k in 0..n {
            let mut pivot_row = k;
            let mut max_magnitude = lu.get(k, k).abs();
            for i in (k + 1)..n {
                let magnitude = lu.get(i, k).abs();
                if magnitude > max_magnitude {
                    max_magnitude = magnitude;
                    pivot_row = i;
                }
            }
            if pivot_row != k {
                swap_rows(&mut lu, k, pivot_row);
                pivots.swap(k, pivot_row);
                pivot_sign = -pivot_sign;
            }

            let pivot = lu.get(k, k);
            if pivot.abs() < f64::EPSILON {
                continue;
            }
            for i in (k + 1)..n {
                let factor = lu.get(i, k) / pivot;
                lu.set(i, k, factor);
                for j in (k + 1)..n {
                    let updated = lu.get(i, j) - factor * lu.get(k, j);
                    lu.set(i, j, updated);
                }
            }
        }

        let decomposition = LuDecomposition {
            lu,
            pivots,
            pivot_sign,
            n,
        };
        if !decomposition.is_nonsingular() {
            default_diagnostics().warn("LuDecomposition::compute: matrix is singular to working precision");
        }
        Ok(decomposition)
    }

    pub fn is_nonsingular(&self) -> bool {
        (0..self.n).all(|k| self.lu.get(k, k).abs() >= f64::EPSILON)
    }

    /// `det(A)`, valid even when the matrix is singular (returns `0.0`).
    pub fn det(&self) -> f64 {
        (0..self.n).fold(self.pivot_sign, |acc, k| acc * self.lu.get(k, k))
    }

    pub fn l(&self) -> Matrix {
        let mut out = Matrix::zeros(self.n, self.n);
        for i in 0..self.n {
            out.set(i, i, 1.0);
            for j in 0..i {
                out.set(i, j, self.lu.get(i, j));
            }
        }
        out
    }

    pub fn u(&self) -> Matrix {
        let mut out = Matrix::zeros(self.n, self.n);
        for i in 0..self.n {
            for j in i..self.n {
                out.set(i, j, self.lu.get(i, j));
            }
        }
        out
    }

    /// The row permutation applied before elimination, as a dense matrix.
    pub fn p(&self) -> Matrix {
        let mut out = Matrix::zeros(self.n, self.n);
        for (row, &original) in self.pivots.iter().enumerate() {
            out.set(row, original, 1.0);
        }
        out
    }

    /// The pivot permutation as an integer vector: row `i` of the pivoted
    /// working matrix came from row `pivot()[i]` of the original input.
    pub fn pivot(&self) -> Vec<usize> {
        self.pivots.clone()
    }

    /// The pivot permutation as a vector of `f64`, for callers that want the
    /// same permutation as numeric data.
    pub fn pivot_as_doubles(&self) -> Vec<f64> {
        self.pivots.iter().map(|&p| p as f64).collect()
    }

    /// `P^-1 * L`: the lower-triangular factor with the row pivoting undone,
    /// so row `i` lands back at the position it held in the original matrix.
    pub fn unpivoted_l(&self) -> Matrix {
        let l = self.l();
        let mut out = Matrix::zeros(self.n, self.n);
        for (row, &original) in self.pivots.iter().enumerate() {
            for col in 0..self.n {
                out.set(original, col, l.get(row, col));
            }
        }
        out
    }

    /// `A^-1`, solved against the identity through the stored factors. Fails
    /// with [`LinalgError::Singular`] under the same condition as [`LuDecomposition::solve`].
    pub fn inverse(&self) -> LinalgResult<Matrix> {
        self.solve(&Matrix::identity(self.n))
    }

    /// Solves `A*x = b` via forward/back substitution against the stored
    /// factors. `b` may have multiple columns (solved independently).
    pub fn solve(&self, b: &Matrix) -> LinalgResult<Matrix> {
        if !self.is_nonsingular() {
            return Err(LinalgError::Singular);
        }
        if b.rows() != self.n {
            return Err(LinalgError::ShapeMismatch {
                context: "LuDecomposition::solve".to_string(),
                expected: (self.n, b.cols()),
                actual: b.dims().as_tuple(),
            });
        }

        let nx = b.cols();
        let mut x = Matrix::zeros(self.n, nx);
        for (row, &original) in self.pivots.iter().enumerate() {
            for col in 0..nx {
                x.set(row, col, b.get(original, col));
            }
        }

        for k in 0..self.n {
            for i in (k + 1)..self.n {
                let factor = self.lu.get(i, k);
                for col in 0..nx {
                    let updated = x.get(i, col) - x.get(k, col) * factor;
                    x.set(i, col, updated);
                }
            }
        }

        for k in (0..self.n).rev() {
            let pivot = self.lu.get(k, k);
            for col in 0..nx {
                let scaled = x.get(k, col) / pivot;
                x.set(k, col, scaled);
            }
            for i in 0..k {
                let factor = self.lu.get(i, k);
                for col in 0..nx {
                    let updated = x.get(i, col) - x.get(k, col) * factor;
                    x.set(i, col, updated);
                }
            }
        }

        Ok(x)
    }
}

fn swap_rows(m: &mut Matrix, a: usize, b: usize) {
    if a == b {
        return;
    }
    for j in 0..m.cols() {
        let tmp = m.get(a, j);
        m.set(a, j, m.get(b, j));
        m.set(b, j, tmp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn det_matches_known_value() {
        let a = Matrix::from_row_major(2, 2, vec![4.0, 3.0, 6.0, 3.0]).unwrap();
        let lu = LuDecomposition::compute(&a).unwrap();
        assert!((lu.det() - (-6.0)).abs() < 1e-9);
    }

    #[test]
    fn solve_recovers_known_solution() {
        let a = Matrix::from_row_major(2, 2, vec![2.0, 1.0, 5.0, 7.0]).unwrap();
        let b = Matrix::vector(vec![11.0, 13.0], false);
        let lu = LuDecomposition::compute(&a).unwrap();
        let x = lu.solve(&b).unwrap();
        let reconstructed = a.times(&x).unwrap();
        assert!(reconstructed.approx_eq(&b, 1e-9));
    }

    #[test]
    fn singular_matrix_reports_but_does_not_error_on_compute() {
        let a = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 2.0, 4.0]).unwrap();
        let lu = LuDecomposition::compute(&a).unwrap();
        assert!(!lu.is_nonsingular());
        assert!(lu.solve(&Matrix::vector(vec![1.0, 1.0], false)).is_err());
    }

    #[test]
    fn l_times_u_recovers_permuted_a() {
        let a = Matrix::from_row_major(3, 3, vec![2.0, 1.0, 1.0, 4.0, 3.0, 3.0, 8.0, 7.0, 9.0]).unwrap();
        let lu = LuDecomposition::compute(&a).unwrap();
        let reconstructed = lu.l().times(&lu.u()).unwrap();
        let permuted = lu.p().times(&a).unwrap();
        assert!(reconstructed.approx_eq(&permuted, 1e-9));
    }

    #[test]
    fn pivot_as_doubles_matches_pivot() {
        let a = Matrix::from_row_major(3, 3, vec![2.0, 1.0, 1.0, 4.0, 3.0, 3.0, 8.0, 7.0, 9.0]).unwrap();
        let lu = LuDecomposition::compute(&a).unwrap();
        let ints = lu.pivot();
        let doubles = lu.pivot_as_doubles();
        assert_eq!(ints.len(), doubles.len());
        for (&i, &d) in ints.iter().zip(&doubles) {
            assert_eq!(i as f64, d);
        }
    }

    #[test]
    fn unpivoted_l_undoes_the_row_permutation() {
        let a = Matrix::from_row_major(3, 3, vec![2.0, 1.0, 1.0, 4.0, 3.0, 3.0, 8.0, 7.0, 9.0]).unwrap();
        let lu = LuDecomposition::compute(&a).unwrap();
        let unpivoted = lu.unpivoted_l();
        let repivoted = lu.p().times(&unpivoted).unwrap();
        assert!(repivoted.approx_eq(&lu.l(), 1e-9));
    }

    #[test]
    fn inverse_matches_known_two_by_two() {
        let a = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let lu = LuDecomposition::compute(&a).unwrap();
        let inv = lu.inverse().unwrap();
        assert!(inv.approx_eq(&Matrix::from_row_major(2, 2, vec![-2.0, 1.0, 1.5, -0.5]).unwrap(), 1e-9));
    }
}
