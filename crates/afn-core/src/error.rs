use thiserror::Error;

pub type AfnResult<T> = Result<T, AfnError>;

#[derive(Error, Debug)]
pub enum AfnError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
