use numlab_linalg::decomposition::{CholeskyDecomposition, LuDecomposition};
use numlab_linalg::parser::parse_matrix;
use numlab_linalg::Matrix;

#[test]
fn determinant_of_a_known_two_by_two() {
    let a = Matrix::from_row_major(2, 2, vec![4.0, 3.0, 6.0, 3.0]).unwrap();
    let lu = LuDecomposition::compute(&a).unwrap();
    assert!((lu.det() - (-6.0)).abs() < 1e-9);
}

#[test]
fn product_of_two_known_two_by_twos() {
    let a = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    let b = Matrix::from_row_major(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
    let c = a.times(&b).unwrap();
    assert_eq!(c.elements(), &[19.0, 22.0, 43.0, 50.0]);
}

#[test]
fn inverse_via_lu() {
    let a = Matrix::from_row_major(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    let lu = LuDecomposition::compute(&a).unwrap();
    let inverse = lu.inverse().unwrap();
    let should_be_identity = a.times(&inverse).unwrap();
    assert!(should_be_identity.approx_eq(&Matrix::identity(2), 1e-8));
}

#[test]
fn cholesky_of_a_known_spd_matrix() {
    let a = Matrix::from_row_major(3, 3, vec![4.0, 12.0, -16.0, 12.0, 37.0, -43.0, -16.0, -43.0, 98.0]).unwrap();
    let chol = CholeskyDecomposition::compute(&a).unwrap();
    assert!(chol.is_spd());
    let l = chol.l();
    assert!((l.get(0, 0) - 2.0).abs() < 1e-9);
    assert!((l.get(1, 0) - 6.0).abs() < 1e-9);
    assert!((l.get(2, 2) - 3.0).abs() < 1e-9);
}

#[test]
fn text_literal_round_trips_into_a_matrix() {
    let m = parse_matrix("[1,2;3,4]").unwrap();
    assert_eq!(m.dims().as_tuple(), (2, 2));
    assert_eq!(m.elements(), &[1.0, 2.0, 3.0, 4.0]);
}
