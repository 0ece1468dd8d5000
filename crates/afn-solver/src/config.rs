//! Newton driver configuration.

/// How the pressure vector is initialized before the Newton iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitMethod {
    /// Assemble and solve once with every element's laminar/linear form.
    Linear,
    /// Keep the pressures left in the context by the previous solve
    /// (warm start across timesteps).
    Retain,
}

/// Newton driver configuration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Maximum Newton iterations before the solve fails
    pub max_iterations: usize,
    /// Absolute per-node residual tolerance (kg/s)
    pub abs_tol: f64,
    /// Relative per-node tolerance: residual over the node's total
    /// absolute flow
    pub rel_tol: f64,
    /// Correction-ratio threshold below which Steffensen over-relaxation
    /// engages; the ratio of consecutive corrections must fall under this
    /// (typically negative: oscillating corrections)
    pub accel_limit: f64,
    /// Maximum pressure change per node per iteration (Pa)
    pub max_pressure_step: f64,
    /// Pressure initialization method
    pub init: InitMethod,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            abs_tol: 1e-6,
            rel_tol: 1e-4,
            accel_limit: -0.5,
            max_pressure_step: 500.0,
            init: InitMethod::Linear,
        }
    }
}
