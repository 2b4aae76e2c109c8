//! Elementwise application and broadcasting arithmetic (spec C2).
//!
//! Two shapes are broadcast-compatible exactly when numpy would consider them
//! so for a pair of 2-D arrays: equal shapes, one side a `1x1` scalar, or one
//! side a row/column vector whose non-1 axis matches the other operand. Every
//! pure operator here has an in-place twin that mutates `self` and returns
//! `&mut Self` for chaining, matching the `fill` convention in [`crate::matrix`].

use ndarray::{Array2, Zip};
use numlab_core::config::TINY_TOLERANCE;
use numlab_core::diagnostics::default_diagnostics;

use crate::error::{LinalgError, LinalgResult};
use crate::matrix::Matrix;

fn broadcast_target(a: (usize, usize), b: (usize, usize), context: &str) -> LinalgResult<(usize, usize)> {
    let axis = |x: usize, y: usize| -> Option<usize> {
        if x == y {
            Some(x)
        } else if x == 1 {
            Some(y)
        } else if y == 1 {
            Some(x)
        } else {
            None
        }
    };
    match (axis(a.0, b.0), axis(a.1, b.1)) {
        (Some(rows), Some(cols)) => Ok((rows, cols)),
        _ => Err(LinalgError::ShapeMismatch {
            context: context.to_string(),
            expected: a,
            actual: b,
        }),
    }
}

fn broadcast_binary<F>(a: &Matrix, b: &Matrix, context: &str, mut op: F) -> LinalgResult<Matrix>
where
    F: FnMut(f64, f64) -> f64,
{
    let target = broadcast_target(a.dims().as_tuple(), b.dims().as_tuple(), context)?;
    let av = a
        .array()
        .broadcast(target)
        .expect("broadcast_target already validated compatibility");
    let bv = b
        .array()
        .broadcast(target)
        .expect("broadcast_target already validated compatibility");
    let mut out = Array2::<f64>::zeros(target);
    Zip::from(&mut out).and(av).and(bv).for_each(|o, &x, &y| *o = op(x, y));
    Ok(Matrix::from_array(out))
}

impl Matrix {
    /// Applies `f` to every element, returning a new matrix.
    pub fn apply<F: Fn(f64) -> f64>(&self, f: F) -> Matrix {
        Matrix::from_array(self.array().mapv(f))
    }

    /// Applies `f` to every element in place.
    pub fn apply_in_place<F: Fn(f64) -> f64>(&mut self, f: F) -> &mut Self {
        self.array_mut().mapv_inplace(f);
        self
    }

    /// Applies `f` to each row (as a `1xn` matrix), collecting the results
    /// into a new matrix of the same shape as the per-row outputs stacked.
    pub fn apply_by_row<F: Fn(&Matrix) -> Matrix>(&self, f: F) -> LinalgResult<Matrix> {
        let mut rows = Vec::with_capacity(self.rows());
        for i in 0..self.rows() {
            rows.push(f(&self.row(i)).to_vector()?);
        }
        Matrix::from_table(rows)
    }

    /// Applies `f` to each column (as an `mx1` matrix), stacking the results
    /// back into columns of a new matrix.
    pub fn apply_by_column<F: Fn(&Matrix) -> Matrix>(&self, f: F) -> LinalgResult<Matrix> {
        let transformed = self.transpose().apply_by_row(|row| f(&row.transpose()).transpose())?;
        Ok(transformed.transpose())
    }

    /// Elementwise sum with numpy-style broadcasting.
    pub fn plus(&self, other: &Matrix) -> LinalgResult<Matrix> {
        broadcast_binary(self, other, "Matrix::plus", |a, b| a + b)
    }

    /// Elementwise difference with numpy-style broadcasting.
    pub fn minus(&self, other: &Matrix) -> LinalgResult<Matrix> {
        broadcast_binary(self, other, "Matrix::minus", |a, b| a - b)
    }

    /// Elementwise (Hadamard) product with numpy-style broadcasting. Not to
    /// be confused with [`crate::matmul`]'s `times`, which is matrix product.
    pub fn elementwise_multiply(&self, other: &Matrix) -> LinalgResult<Matrix> {
        broadcast_binary(self, other, "Matrix::elementwise_multiply", |a, b| a * b)
    }

    /// Elementwise quotient with numpy-style broadcasting. A divisor whose
    /// magnitude is below [`TINY_TOLERANCE`] is nudged away from zero (sign
    /// preserved) and a warning is emitted, rather than producing `inf`/`NaN`.
    pub fn elementwise_divide(&self, other: &Matrix) -> LinalgResult<Matrix> {
        let mut saw_tiny_divisor = false;
        let result = broadcast_binary(self, other, "Matrix::elementwise_divide", |a, b| {
            let safe_b = if b.abs() < TINY_TOLERANCE {
                saw_tiny_divisor = true;
                if b.is_sign_negative() {
                    -TINY_TOLERANCE
                } else {
                    TINY_TOLERANCE
                }
            } else {
                b
            };
            a / safe_b
        })?;
        if saw_tiny_divisor {
            default_diagnostics().warn("elementwise_divide: divisor near zero, clamped to tiny_tolerance");
        }
        Ok(result)
    }

    /// Elementwise `self[i,j] ^ other[i,j]`, broadcasting as usual.
    pub fn array_power(&self, other: &Matrix) -> LinalgResult<Matrix> {
        broadcast_binary(self, other, "Matrix::array_power", f64::powf)
    }

    /// In-place `self += other`.
    pub fn add(&mut self, other: &Matrix) -> LinalgResult<&mut Self> {
        *self = self.plus(other)?;
        Ok(self)
    }

    /// In-place `self -= other`.
    pub fn subtract(&mut self, other: &Matrix) -> LinalgResult<&mut Self> {
        *self = self.minus(other)?;
        Ok(self)
    }

    /// In-place elementwise `self *= other`.
    pub fn multiply(&mut self, other: &Matrix) -> LinalgResult<&mut Self> {
        *self = self.elementwise_multiply(other)?;
        Ok(self)
    }

    /// Pure-form division. A scalar divisor uses [`Matrix::elementwise_divide`]'s
    /// tiny-tolerance broadcasting path; a matrix divisor is treated as
    /// `self * other^-1`, computed through [`crate::decomposition::LuDecomposition`].
    pub fn division(&self, other: &Matrix) -> LinalgResult<Matrix> {
        if other.is_scalar() {
            self.elementwise_divide(other)
        } else {
            let inverse = crate::decomposition::LuDecomposition::compute(other)?.inverse()?;
            self.times(&inverse)
        }
    }

    /// In-place `self = self.division(other)`.
    pub fn divide(&mut self, other: &Matrix) -> LinalgResult<&mut Self> {
        *self = self.division(other)?;
        Ok(self)
    }

    /// In-place `self[i,j] = self[i,j] ^ other[i,j]`.
    pub fn array_raise(&mut self, other: &Matrix) -> LinalgResult<&mut Self> {
        *self = self.array_power(other)?;
        Ok(self)
    }

    /// The 1-norm: the maximum absolute column sum.
    pub fn norm1(&self) -> f64 {
        (0..self.cols())
            .map(|j| (0..self.rows()).map(|i| self.get(i, j).abs()).sum::<f64>())
            .fold(0.0, f64::max)
    }

    /// The 2-norm: the largest singular value, via [`crate::decomposition::SvdDecomposition`].
    pub fn norm2(&self) -> LinalgResult<f64> {
        Ok(crate::decomposition::SvdDecomposition::compute(self)?.norm2())
    }

    /// The infinity-norm: the maximum absolute row sum.
    pub fn norm_inf(&self) -> f64 {
        (0..self.rows())
            .map(|i| (0..self.cols()).map(|j| self.get(i, j).abs()).sum::<f64>())
            .fold(0.0, f64::max)
    }

    /// The Frobenius norm, accumulated with `f64::hypot` to avoid premature
    /// overflow on large elements.
    pub fn norm_f(&self) -> f64 {
        self.elements().iter().fold(0.0, |acc, &x| acc.hypot(x))
    }

    /// Approximate equality under the given absolute tolerance, elementwise.
    pub fn approx_eq(&self, other: &Matrix, tolerance: f64) -> bool {
        if self.dims() != other.dims() {
            return false;
        }
        self.elements()
            .iter()
            .zip(other.elements())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_broadcasts_row_vector_across_rows() {
        let m = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let row = Matrix::from_row_major(1, 2, vec![10.0, 20.0]).unwrap();
        let sum = m.plus(&row).unwrap();
        assert_eq!(sum.elements(), &[11.0, 22.0, 13.0, 24.0]);
    }

    #[test]
    fn plus_broadcasts_scalar() {
        let m = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let sum = m.plus(&Matrix::scalar(1.0)).unwrap();
        assert_eq!(sum.elements(), &[2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn incompatible_shapes_reject() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(3, 2);
        assert!(a.plus(&b).is_err());
    }

    #[test]
    fn elementwise_divide_clamps_tiny_divisor() {
        let a = Matrix::scalar(1.0);
        let b = Matrix::scalar(0.0);
        let result = a.elementwise_divide(&b).unwrap();
        assert!(result.get(0, 0).is_finite());
    }

    #[test]
    fn norms_match_hand_computation() {
        let m = Matrix::from_row_major(2, 2, vec![1.0, -7.0, -2.0, 3.0]).unwrap();
        assert_eq!(m.norm1(), 10.0);
        assert_eq!(m.norm_inf(), 8.0);
        assert!((m.norm_f() - (1.0f64 + 49.0 + 4.0 + 9.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn apply_by_row_doubles_each_row() {
        let m = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let doubled = m.apply_by_row(|row| row.apply(|x| x * 2.0)).unwrap();
        assert_eq!(doubled.elements(), &[2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn division_by_a_scalar_uses_elementwise_path() {
        let m = Matrix::from_row_major(1, 2, vec![4.0, 8.0]).unwrap();
        let divided = m.division(&Matrix::scalar(2.0)).unwrap();
        assert_eq!(divided.elements(), &[2.0, 4.0]);
    }

    #[test]
    fn division_by_a_matrix_uses_the_inverse() {
        let a = Matrix::identity(2);
        let b = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let divided = a.division(&b).unwrap();
        let expected = crate::decomposition::LuDecomposition::compute(&b).unwrap().inverse().unwrap();
        assert!(divided.approx_eq(&expected, 1e-9));
    }

    #[test]
    fn norm2_of_identity_is_one() {
        let m = Matrix::identity(3);
        assert!((m.norm2().unwrap() - 1.0).abs() < 1e-8);
    }
}
