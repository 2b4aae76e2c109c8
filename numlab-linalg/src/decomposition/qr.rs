//! QR decomposition via Householder reflections (spec C5).
//!
//! Column `k` is zeroed below the diagonal by a reflector built from that
//! column's tail; the reflector coefficients are packed below the diagonal of
//! the working copy (JAMA/LINPACK style) instead of materializing each
//! Householder matrix, and the diagonal of `R` is cached separately since the
//! in-place elimination overwrites it with the reflector's leading term.

use crate::error::{LinalgError, LinalgResult};
use crate::matrix::Matrix;

#[derive(Debug, Clone)]
pub struct QrDecomposition {
    qr: Matrix,
    diag: Vec<f64>,
    m: usize,
    n: usize,
}

impl QrDecomposition {
    /// Requires `self.rows() >= self.cols()`.
    pub fn compute(a: &Matrix) -> LinalgResult<Self> {
        let (m, n) = a.dims().as_tuple();
        if m < n {
            return Err(LinalgError::ShapeMismatch {
                context: "QrDecomposition::compute: requires rows >= cols".to_string(),
                expected: (n, n),
                actual: (m, n),
            });
        }

        let mut qr = a.clone();
        let mut diag = vec![0.0; n];

        for k in 0..n {
            let norm = (k..m).map(|i| qr.get(i, k).powi(2)).sum::<f64>().sqrt();
            if norm.abs() < f64::EPSILON {
                diag[k] = 0.0;
                continue;
            }
            let norm = if qr.get(k, k) < 0.0 { -norm } else { norm };
            for i in k..m {
                let scaled = qr.get(i, k) / norm;
                qr.set(i, k, scaled);
            }
            let updated_kk = qr.get(k, k) + 1.0;
            qr.set(k, k, updated_kk);

            for j in (k + 1)..n {
                let dot = (k..m).map(|i| qr.get(i, k) * qr.get(i, j)).sum::<f64>();
                let factor = -dot / qr.get(k, k);
                for i in k..m {
                    let updated = qr.get(i, j) + factor * qr.get(i, k);
                    qr.set(i, j, updated);
                }
            }
            diag[k] = -norm;
        }

        Ok(QrDecomposition { qr, diag, m, n })
    }

    pub fn is_full_rank(&self) -> bool {
        self.diag.iter().all(|&d| d.abs() >= f64::EPSILON)
    }

    /// The `mxn` matrix of Householder reflectors, as packed in the working
    /// buffer's strict-and-main lower triangle (zero above the diagonal).
    pub fn h(&self) -> Matrix {
        let mut h = Matrix::zeros(self.m, self.n);
        for i in 0..self.m {
            for j in 0..self.n.min(i + 1) {
                h.set(i, j, self.qr.get(i, j));
            }
        }
        h
    }

    /// The `mxn` matrix of reflectors, upper-triangular part dropped.
    pub fn r(&self) -> Matrix {
        let mut r = Matrix::zeros(self.n, self.n);
        for i in 0..self.n {
            r.set(i, i, self.diag[i]);
            for j in (i + 1)..self.n {
                r.set(i, j, self.qr.get(i, j));
            }
        }
        r
    }

    /// The `mxn` orthonormal factor, reconstructed from the packed reflectors.
    pub fn q(&self) -> Matrix {
        let mut q = Matrix::zeros(self.m, self.n);
        for k in (0..self.n).rev() {
            for i in 0..self.m {
                q.set(i, k, 0.0);
            }
            q.set(k, k, 1.0);
            for j in k..self.n {
                if self.qr.get(k, k).abs() < f64::EPSILON {
                    continue;
                }
                let dot = (k..self.m).map(|i| self.qr.get(i, k) * q.get(i, j)).sum::<f64>();
                let factor = -dot / self.qr.get(k, k);
                for i in k..self.m {
                    let updated = q.get(i, j) + factor * self.qr.get(i, k);
                    q.set(i, j, updated);
                }
            }
        }
        q
    }

    /// Least-squares solution of `A*x = b` (exact when `A` is square and
    /// nonsingular). Requires `is_full_rank()`.
    pub fn solve(&self, b: &Matrix) -> LinalgResult<Matrix> {
        if !self.is_full_rank() {
            return Err(LinalgError::RankDeficient);
        }
        if b.rows() != self.m {
            return Err(LinalgError::ShapeMismatch {
                context: "QrDecomposition::solve".to_string(),
                expected: (self.m, b.cols()),
                actual: b.dims().as_tuple(),
            });
        }

        let nx = b.cols();
        let mut x = b.clone();

        for k in 0..self.n {
            for j in 0..nx {
                let dot = (k..self.m).map(|i| self.qr.get(i, k) * x.get(i, j)).sum::<f64>();
                let factor = -dot / self.qr.get(k, k);
                for i in k..self.m {
                    let updated = x.get(i, j) + factor * self.qr.get(i, k);
                    x.set(i, j, updated);
                }
            }
        }

        for k in (0..self.n).rev() {
            for j in 0..nx {
                let scaled = x.get(k, j) / self.diag[k];
                x.set(k, j, scaled);
            }
            for i in 0..k {
                for j in 0..nx {
                    let updated = x.get(i, j) - x.get(k, j) * self.qr.get(i, k);
                    x.set(i, j, updated);
                }
            }
        }

        x.submatrix(0..self.n, 0..nx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn q_is_orthonormal() {
        let a = Matrix::from_row_major(3, 2, vec![1.0, -1.0, 2.0, 1.0, 0.0, 3.0]).unwrap();
        let qr = QrDecomposition::compute(&a).unwrap();
        let q = qr.q();
        let gram = q.transpose().times(&q).unwrap();
        assert!(gram.approx_eq(&Matrix::identity(2), 1e-8));
    }

    #[test]
    fn q_times_r_recovers_a() {
        let a = Matrix::from_row_major(3, 2, vec![1.0, -1.0, 2.0, 1.0, 0.0, 3.0]).unwrap();
        let qr = QrDecomposition::compute(&a).unwrap();
        let reconstructed = qr.q().times(&qr.r()).unwrap();
        assert!(reconstructed.approx_eq(&a, 1e-8));
    }

    #[test]
    fn solve_recovers_exact_square_solution() {
        let a = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Matrix::vector(vec![5.0, 6.0], false);
        let qr = QrDecomposition::compute(&a).unwrap();
        let x = qr.solve(&b).unwrap();
        assert!(a.times(&x).unwrap().approx_eq(&b, 1e-8));
    }

    #[test]
    fn non_tall_matrix_rejected() {
        let a = Matrix::zeros(2, 3);
        assert!(QrDecomposition::compute(&a).is_err());
    }

    #[test]
    fn h_is_zero_above_the_diagonal() {
        let a = Matrix::from_row_major(3, 2, vec![1.0, -1.0, 2.0, 1.0, 0.0, 3.0]).unwrap();
        let qr = QrDecomposition::compute(&a).unwrap();
        let h = qr.h();
        assert_eq!(h.get(0, 1), 0.0);
    }
}
