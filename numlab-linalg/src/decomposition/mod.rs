//! Classical dense factorizations (spec C4-C8).
//!
//! Every factorization follows the same shape: `compute` always succeeds and
//! a predicate (`is_nonsingular`, `is_full_rank`, `is_spd`) reports numerical
//! usability instead of `compute` itself failing; only `solve` turns an
//! unusable factorization into an `Err`.

pub mod cholesky;
pub mod eigen;
pub mod lu;
pub mod qr;
pub mod svd;

pub use cholesky::CholeskyDecomposition;
pub use eigen::EigenDecomposition;
pub use lu::LuDecomposition;
pub use qr::QrDecomposition;
pub use svd::SvdDecomposition;
