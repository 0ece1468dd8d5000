//! afn-core: stable foundation for the airnet workspace.
//!
//! Contains:
//! - units (uom SI types + constructors + moist-air constants)
//! - numeric (Real + finite-value guard)
//! - ids (stable compact IDs for network objects)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{AfnError, AfnResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
