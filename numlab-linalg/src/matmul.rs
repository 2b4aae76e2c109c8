//! Matrix multiplication engine (spec C3).
//!
//! `times` is plain GEMM, SAXPY-tiled: for each output row `i`,
//! `result[i, :] += A[i, k] * B[k, :]` accumulated over `k`. Row `i` only ever
//! reads `A`'s row `i` and writes `result`'s row `i`, so splitting the row
//! range `[0, A.m)` across workers needs no synchronization beyond the
//! scheduler's own latch, and the range can be handed straight to
//! `numlab_core::scheduler`.

use numlab_core::diagnostics::default_diagnostics;

use crate::error::{LinalgError, LinalgResult};
use crate::matrix::Matrix;

#[cfg(feature = "parallel")]
use numlab_core::config::DEFAULT_TILE_THRESHOLD;
#[cfg(feature = "parallel")]
use numlab_core::scheduler::global_scheduler;
#[cfg(feature = "parallel")]
use std::sync::Arc;

fn check_matmul_shapes(a: (usize, usize), b: (usize, usize)) -> LinalgResult<()> {
    if a.1 != b.0 {
        return Err(LinalgError::ShapeMismatch {
            context: "Matrix::times".to_string(),
            expected: (a.1, a.1),
            actual: b,
        });
    }
    Ok(())
}

/// A pluggable accelerator for the fused `A*B+C` primitive. The default build
/// carries no implementation; a caller wires one in through [`Matrix::forward_with_backend`].
pub trait GpuBackend: Send + Sync {
    /// Whether this backend is willing to handle a multiplication of this shape.
    fn test(&self, inner_dim: usize, a_cols: usize, b_cols: usize) -> bool;

    /// Computes `a.times(b)?.plus(c)` using the accelerated path.
    fn forward(&self, a: &Matrix, b: &Matrix, c: &Matrix) -> LinalgResult<Matrix>;
}

impl Matrix {
    /// Matrix product `self * other`. `self` is `mxk`, `other` is `kxn`,
    /// the result is `mxn`.
    ///
    /// When built with the `parallel` feature and the process scheduler is
    /// running (see `numlab_core::scheduler::Scheduler::parallelize`), rows of
    /// the output are computed by a bounded worker pool; otherwise this runs
    /// single-threaded on the calling thread.
    pub fn times(&self, other: &Matrix) -> LinalgResult<Matrix> {
        check_matmul_shapes(self.dims().as_tuple(), other.dims().as_tuple())?;
        let m = self.rows();
        let n = other.cols();

        if other.cols() == 1 {
            return self.times_vector(other);
        }

        #[cfg(feature = "parallel")]
        {
            if global_scheduler().is_running() {
                return Ok(self.times_parallel(other, m, n));
            }
        }
        Ok(self.times_serial(other, 0, m, n))
    }

    fn times_serial(&self, other: &Matrix, lo: usize, hi: usize, n: usize) -> Matrix {
        let mut out = Matrix::zeros(hi - lo, n);
        let k = self.cols();
        for (out_i, i) in (lo..hi).enumerate() {
            for kk in 0..k {
                let a_ik = self.get(i, kk);
                if a_ik == 0.0 {
                    continue;
                }
                for j in 0..n {
                    let current = out.get(out_i, j);
                    out.set(out_i, j, current + a_ik * other.get(kk, j));
                }
            }
        }
        out
    }

    #[cfg(feature = "parallel")]
    fn times_parallel(&self, other: &Matrix, m: usize, n: usize) -> Matrix {
        use std::sync::Mutex;

        let out = Arc::new(Mutex::new(Matrix::zeros(m, n)));
        let a = self.clone();
        let b = other.clone();
        let threshold = DEFAULT_TILE_THRESHOLD;
        let out_for_worker = Arc::clone(&out);
        global_scheduler().run_row_slices(0, m, threshold, move |lo, hi| {
            let slice = a.times_serial(&b, lo, hi, n);
            let mut guard = out_for_worker.lock().unwrap();
            guard
                .set_submatrix(lo, 0, &slice)
                .expect("slice shape always matches its own row range");
        });
        Arc::try_unwrap(out)
            .expect("all workers have joined by the time run_row_slices returns")
            .into_inner()
            .unwrap()
    }

    /// Matrix-vector fast path: `self` is `mxk`, `other` is `kx1`. Skips the
    /// scheduler entirely since a single row's dot product is already the
    /// unit of work the spec wants tiled.
    fn times_vector(&self, other: &Matrix) -> LinalgResult<Matrix> {
        let vec = other.elements();
        let mut out = Matrix::zeros(self.rows(), 1);
        for i in 0..self.rows() {
            let row = self.row(i);
            let dot = row.elements().iter().zip(vec).map(|(a, b)| a * b).sum::<f64>();
            out.set(i, 0, dot);
        }
        Ok(out)
    }

    /// The diagonal of `self * other`, computed as `min(self.rows(),
    /// other.cols())` dot-products instead of materializing the full
    /// product: `result[i] = dot(self.row(i), other.column(i))`.
    pub fn diagonal_times(&self, other: &Matrix) -> LinalgResult<Matrix> {
        check_matmul_shapes(self.dims().as_tuple(), other.dims().as_tuple())?;
        let len = self.rows().min(other.cols());
        let mut diag = Vec::with_capacity(len);
        for i in 0..len {
            let dot = (0..self.cols()).map(|k| self.get(i, k) * other.get(k, i)).sum::<f64>();
            diag.push(dot);
        }
        Ok(Matrix::vector(diag, false))
    }

    /// Elementwise (Hadamard) product, as an alias kept alongside `times`
    /// because callers coming from the matrix-multiplication API expect an
    /// `array_times` sibling next to `times`; delegates to
    /// [`Matrix::elementwise_multiply`].
    pub fn array_times(&self, other: &Matrix) -> LinalgResult<Matrix> {
        self.elementwise_multiply(other)
    }

    /// The fused primitive `self.times(b)?.plus(c)`, optionally dispatched to
    /// a [`GpuBackend`] when one accepts the shape.
    pub fn forward(&self, b: &Matrix, c: &Matrix) -> LinalgResult<Matrix> {
        self.times(b)?.plus(c)
    }

    /// Like [`Matrix::forward`] but offers the shape to `backend` first,
    /// falling back to the CPU path when the backend declines.
    pub fn forward_with_backend(&self, b: &Matrix, c: &Matrix, backend: &dyn GpuBackend) -> LinalgResult<Matrix> {
        if backend.test(self.cols(), self.rows(), b.cols()) {
            default_diagnostics().info("forward: dispatched to GPU backend");
            backend.forward(self, b, c)
        } else {
            self.forward(b, c)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn times_matches_known_product() {
        let a = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Matrix::from_row_major(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let c = a.times(&b).unwrap();
        assert_eq!(c.elements(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn times_rejects_inner_dimension_mismatch() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 2);
        assert!(a.times(&b).is_err());
    }

    #[test]
    fn times_vector_fast_path_matches_general_path() {
        let a = Matrix::from_row_major(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let v = Matrix::vector(vec![10.0, 100.0], false);
        let via_fast_path = a.times(&v).unwrap();
        assert_eq!(via_fast_path.elements(), &[210.0, 430.0, 650.0]);
    }

    #[test]
    fn diagonal_times_matches_the_diagonal_of_the_full_product() {
        let a = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let b = Matrix::from_row_major(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
        let full = a.times(&b).unwrap();
        let diag = a.diagonal_times(&b).unwrap();
        assert_eq!(diag.elements(), &[full.get(0, 0), full.get(1, 1)]);
    }

    #[test]
    fn diagonal_times_on_a_non_square_result_takes_the_shorter_axis() {
        let a = Matrix::from_row_major(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = Matrix::from_row_major(2, 2, vec![1.0, 0.0, 0.0, 1.0]).unwrap();
        let diag = a.diagonal_times(&b).unwrap();
        assert_eq!(diag.elements(), &[1.0, 4.0]);
    }

    #[test]
    fn forward_fuses_matmul_and_add() {
        let a = Matrix::identity(2);
        let b = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let c = Matrix::filled(2, 2, 1.0);
        let result = a.forward(&b, &c).unwrap();
        assert_eq!(result.elements(), &[2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    #[cfg(feature = "parallel")]
    fn parallel_path_matches_serial_path() {
        let a = Matrix::from_row_major(40, 5, (0..200).map(|x| x as f64).collect()).unwrap();
        let b = Matrix::from_row_major(5, 3, (0..15).map(|x| x as f64 * 0.5).collect()).unwrap();
        let serial = a.times(&b).unwrap();

        global_scheduler().parallelize_with(2, std::sync::Arc::new(numlab_core::diagnostics::NullDiagnostics));
        let parallel = a.times(&b).unwrap();
        global_scheduler().unparallelize();

        assert!(serial.approx_eq(&parallel, 1e-9));
    }
}
