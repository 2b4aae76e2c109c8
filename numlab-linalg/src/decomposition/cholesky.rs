//! Cholesky decomposition of a symmetric positive-definite matrix (spec C6).
//!
//! Only the lower triangle of the input is read. As with [`crate::decomposition::lu`],
//! a non-SPD input does not fail `compute`; it flips [`CholeskyDecomposition::is_spd`]
//! to `false` and [`CholeskyDecomposition::solve`] is what turns that into an error.

use numlab_core::diagnostics::default_diagnostics;

use crate::error::{LinalgError, LinalgResult};
use crate::matrix::Matrix;

#[derive(Debug, Clone)]
pub struct CholeskyDecomposition {
    l: Matrix,
    spd: bool,
    n: usize,
}

impl CholeskyDecomposition {
    pub fn compute(a: &Matrix) -> LinalgResult<Self> {
        let dims = a.dims();
        if !dims.is_square() {
            return Err(LinalgError::ShapeMismatch {
                context: "CholeskyDecomposition::compute".to_string(),
                expected: (dims.rows, dims.rows),
                actual: dims.as_tuple(),
            });
        }
        let n = dims.rows;
        let mut l = Matrix::zeros(n, n);
        let mut spd = true;

        for j in 0..n {
            let mut d = 0.0;
            for k in 0..j {
                let mut s = 0.0;
                for i in 0..k {
                    s += l.get(k, i) * l.get(j, i);
                }
                let value = if l.get(k, k).abs() < f64::EPSILON {
                    0.0
                } else {
                    (a.get(j, k) - s) / l.get(k, k)
                };
                l.set(j, k, value);
                d += value * value;
            }
            let diag = a.get(j, j) - d;
            spd &= diag > 0.0;
            l.set(j, j, diag.max(0.0).sqrt());
        }

        let decomposition = CholeskyDecomposition { l, spd, n };
        if !decomposition.spd {
            default_diagnostics().warn("CholeskyDecomposition::compute: matrix is not symmetric positive-definite");
        }
        Ok(decomposition)
    }

    pub fn is_spd(&self) -> bool {
        self.spd
    }

    pub fn l(&self) -> Matrix {
        self.l.clone()
    }

    /// Solves `A*x = b` via forward/back substitution against `L`. Requires
    /// [`CholeskyDecomposition::is_spd`].
    pub fn solve(&self, b: &Matrix) -> LinalgResult<Matrix> {
        if !self.spd {
            return Err(LinalgError::Singular);
        }
        if b.rows() != self.n {
            return Err(LinalgError::ShapeMismatch {
                context: "CholeskyDecomposition::solve".to_string(),
                expected: (self.n, b.cols()),
                actual: b.dims().as_tuple(),
            });
        }

        let nx = b.cols();
        let mut x = b.clone();

        for k in 0..self.n {
            for col in 0..nx {
                let mut sum = x.get(k, col);
                for i in 0..k {
                    sum -= self.l.get(k, i) * x.get(i, col);
                }
                x.set(k, col, sum / self.l.get(k, k));
            }
        }

        for k in (0..self.n).rev() {
            for col in 0..nx {
                let mut sum = x.get(k, col);
                for i in (k + 1)..self.n {
                    sum -= self.l.get(i, k) * x.get(i, col);
                }
                x.set(k, col, sum / self.l.get(k, k));
            }
        }

        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn l_times_l_transpose_recovers_a() {
        let a = Matrix::from_row_major(3, 3, vec![4.0, 12.0, -16.0, 12.0, 37.0, -43.0, -16.0, -43.0, 98.0]).unwrap();
        let chol = CholeskyDecomposition::compute(&a).unwrap();
        assert!(chol.is_spd());
        let reconstructed = chol.l().times(&chol.l().transpose()).unwrap();
        assert!(reconstructed.approx_eq(&a, 1e-8));
    }

    #[test]
    fn solve_recovers_known_solution() {
        let a = Matrix::from_row_major(2, 2, vec![4.0, 2.0, 2.0, 3.0]).unwrap();
        let b = Matrix::vector(vec![10.0, 8.0], false);
        let chol = CholeskyDecomposition::compute(&a).unwrap();
        let x = chol.solve(&b).unwrap();
        assert!(a.times(&x).unwrap().approx_eq(&b, 1e-8));
    }

    #[test]
    fn non_spd_matrix_is_flagged_not_errored() {
        let a = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 2.0, 1.0]).unwrap();
        let chol = CholeskyDecomposition::compute(&a).unwrap();
        assert!(!chol.is_spd());
        assert!(chol.solve(&Matrix::vector(vec![1.0, 1.0], false)).is_err());
    }
}
