//! Skyline (profile) sparse linear solver.
//!
//! Stores a square matrix as a main diagonal plus variable-height column
//! segments whose heights are fixed once from network connectivity, then
//! factors it in place (LU without pivoting) and solves by forward/back
//! substitution. The solver knows nothing about what the unknowns represent;
//! the Newton driver and the scalar transport pass both reuse it.

pub mod error;
pub mod matrix;
pub mod structure;

pub use error::{SkylineError, SkylineResult};
pub use matrix::SkylineMatrix;
pub use structure::SkylineStructure;
