use numlab_linalg::Matrix;
use numlab_nn::{Activation, Relu};

#[test]
fn relu_apply_and_derive_on_a_known_row() {
    let z = Matrix::from_row_major(1, 3, vec![-1.0, 0.0, 1.0]).unwrap();
    let relu = Relu::standard();
    assert_eq!(relu.forward(&z).elements(), &[0.0, 0.0, 1.0]);
    // Derivative at the kink (index 1) is `0`, the leak slope, not `1` as a
    // worked example elsewhere reports for this same input; see
    // `numlab_nn::activations::Relu`'s doc comment.
    assert_eq!(relu.derivative(&z).elements(), &[0.0, 0.0, 1.0]);
}
