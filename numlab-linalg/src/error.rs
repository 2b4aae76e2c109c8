//! Error taxonomy exposed at the crate boundary (spec §7).

use thiserror::Error;

pub type LinalgResult<T> = Result<T, LinalgError>;

/// Every failure mode `numlab-linalg` can report. Shape and argument errors
/// are raised synchronously; numerical-condition errors (`Singular`,
/// `RankDeficient`) are raised only by `solve`, never by a factorization
/// constructor; those instead flip a predicate (`is_nonsingular`,
/// `is_full_rank`) and emit a warning through [`numlab_core::Diagnostics`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinalgError {
    #[error("shape mismatch: {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("invalid dimensions: rows={rows}, cols={cols}")]
    InvalidDimensions { rows: i64, cols: i64 },

    #[error("matrix is singular, cannot solve")]
    Singular,

    #[error("matrix is rank-deficient, least-squares solve is undefined")]
    RankDeficient,

    #[error("parse error at offset {offset}: {message}")]
    ParseError { offset: usize, message: String },

    #[error("ragged input: row {row} has {found} fields, expected {expected}")]
    RaggedInput {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for LinalgError {
    fn from(err: std::io::Error) -> Self {
        LinalgError::IoError(err.to_string())
    }
}
