use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinalgError {
    #[error("expected a square matrix, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
    #[error("dimension mismatch: {left:?} against {right:?}")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    #[error("the matrix {0} is singular")]
    Singular(String),
}
