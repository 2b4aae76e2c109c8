//! Dense real-valued matrix type, classical decompositions, a tiled
//! parallel multiplication engine, and the text/CSV boundary adapters
//! that read and write matrices.
//!
//! `Matrix` (storage, C1) is the common currency every other module
//! operates on: [`ops`] adds elementwise application and broadcasting
//! arithmetic (C2), [`matmul`] adds matrix-matrix/matrix-vector products
//! (C3), [`decomposition`] adds LU/QR/Cholesky/SVD/eigendecomposition
//! (C4-C8), and [`parser`]/[`csv`] add the two text boundary formats (C9).

pub mod csv;
pub mod decomposition;
pub mod dims;
pub mod error;
pub mod matmul;
pub mod matrix;
pub mod ops;
pub mod parser;

pub use decomposition::{CholeskyDecomposition, EigenDecomposition, LuDecomposition, QrDecomposition, SvdDecomposition};
pub use dims::Dimensions;
pub use error::{LinalgError, LinalgResult};
pub use matmul::GpuBackend;
pub use matrix::Matrix;
