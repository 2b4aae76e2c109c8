//! L2 weight regularization (spec C10).

use numlab_linalg::Matrix;

/// A regularization penalty added to a layer's cost and gradient. `None`
/// leaves both unchanged, so callers can hold a `Regularization` unconditionally
/// rather than branching on whether one is configured.
#[derive(Debug, Clone, Copy)]
pub enum Regularization {
    None,
    L2 { lambda: f64 },
}

impl Regularization {
    /// The scalar penalty added to the unregularized cost, `(lambda / 2m) *
    /// sum(W elementwise* W)`. `m` is the number of training examples the
    /// unregularized cost was itself averaged over.
    pub fn cost(&self, m: f64, weights: &Matrix) -> f64 {
        match self {
            Regularization::None => 0.0,
            Regularization::L2 { lambda } => {
                let sum_sq: f64 = weights.elements().iter().map(|x| x * x).sum();
                (lambda / (2.0 * m)) * sum_sq
            }
        }
    }

    /// The penalty's gradient with respect to `weights`, `(lambda / m) * W`.
    pub fn gradient(&self, m: f64, weights: &Matrix) -> Matrix {
        match self {
            Regularization::None => Matrix::zeros(weights.rows(), weights.cols()),
            Regularization::L2 { lambda } => weights.apply(|x| (lambda / m) * x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_contributes_nothing() {
        let w = Matrix::from_row_major(1, 2, vec![3.0, -4.0]).unwrap();
        assert_eq!(Regularization::None.cost(10.0, &w), 0.0);
        assert_eq!(Regularization::None.gradient(10.0, &w).elements(), &[0.0, 0.0]);
    }

    #[test]
    fn l2_cost_matches_hand_computation() {
        let w = Matrix::from_row_major(1, 2, vec![3.0, 4.0]).unwrap();
        let l2 = Regularization::L2 { lambda: 0.1 };
        let m = 5.0;
        assert!((l2.cost(m, &w) - (0.1 / (2.0 * m)) * 25.0).abs() < 1e-12);
    }

    #[test]
    fn l2_gradient_is_lambda_over_m_times_weights() {
        let w = Matrix::from_row_major(1, 2, vec![3.0, -4.0]).unwrap();
        let l2 = Regularization::L2 { lambda: 0.5 };
        let m = 2.0;
        assert_eq!(l2.gradient(m, &w).elements(), &[0.75, -1.0]);
    }
}
