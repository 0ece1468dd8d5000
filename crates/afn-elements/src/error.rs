//! Error types for flow element evaluation.

use afn_core::AfnError;
use thiserror::Error;

/// Errors from element construction or evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementError {
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid element parameter: {what}")]
    InvalidParameter { what: &'static str },
}

pub type ElementResult<T> = Result<T, ElementError>;

impl From<ElementError> for AfnError {
    fn from(e: ElementError) -> Self {
        match e {
            ElementError::NonPhysical { what } => AfnError::NonFinite {
                what,
                value: f64::NAN,
            },
            ElementError::InvalidParameter { what } => AfnError::InvalidArg { what },
        }
    }
}
