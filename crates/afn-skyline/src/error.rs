//! Error types for the skyline solver.

use thiserror::Error;

/// Errors from skyline assembly, factorization and substitution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkylineError {
    /// A diagonal pivot vanished during factorization. The row maps back to a
    /// network node that is disconnected or locally rank-deficient.
    #[error("Singular pivot at row {row} (value {value:e})")]
    SingularPivot { row: usize, value: f64 },

    #[error("Matrix has not been factorized")]
    NotFactored,

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Entry ({row}, {col}) lies outside the skyline profile")]
    OutsideProfile { row: usize, col: usize },
}

pub type SkylineResult<T> = Result<T, SkylineError>;
