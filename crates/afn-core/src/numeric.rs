use crate::AfnError;

/// Floating point type used throughout the system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, AfnError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(AfnError::NonFinite { what, value: v })
    }
}
