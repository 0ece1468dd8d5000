//! Per-timestep inputs supplied by the host.

use afn_graph::Network;

use crate::error::{SolverError, SolverResult};

/// Thermodynamic and scalar state of one node for this timestep.
///
/// For boundary nodes these are the ambient/Dirichlet values; for internal
/// nodes temperature and humidity come from the host's thermal model (they
/// set the densities the flow laws see) and the scalar fields are the values
/// the transport pass starts from.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeConditions {
    /// Dry-bulb temperature (degC)
    pub temperature: f64,
    /// Humidity ratio (kg water / kg dry air)
    pub humidity_ratio: f64,
    /// CO2 concentration (ppm)
    pub co2: f64,
    /// Generic contaminant concentration
    pub contaminant: f64,
}

impl Default for NodeConditions {
    fn default() -> Self {
        Self {
            temperature: 20.0,
            humidity_ratio: 0.0,
            co2: 400.0,
            contaminant: 0.0,
        }
    }
}

/// Everything the host supplies per solve call.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepInputs {
    /// Per-link control value (opening factor, damper position), 0..=1
    pub controls: Vec<f64>,
    /// Per-node conditions
    pub nodes: Vec<NodeConditions>,
    /// Barometric pressure (Pa)
    pub barometric_pressure: f64,
    /// Local wind speed (m/s)
    pub wind_speed: f64,
    /// Wind pressure coefficient per node for the current wind direction;
    /// only boundary-node entries are read
    pub wind_cp: Vec<f64>,
    /// Temperature of the environment duct segments run through (degC)
    pub duct_env_temperature: f64,
    /// Humidity ratio of the duct environment
    pub duct_env_humidity: f64,
}

impl StepInputs {
    /// Defaults for a network: all links fully open, still standard air.
    pub fn new(network: &Network) -> Self {
        Self {
            controls: vec![1.0; network.links().len()],
            nodes: vec![NodeConditions::default(); network.nodes().len()],
            barometric_pressure: 101_325.0,
            wind_speed: 0.0,
            wind_cp: vec![0.0; network.nodes().len()],
            duct_env_temperature: 20.0,
            duct_env_humidity: 0.0,
        }
    }

    /// Check vector lengths against the network.
    pub fn validate(&self, network: &Network) -> SolverResult<()> {
        let n_nodes = network.nodes().len();
        let n_links = network.links().len();
        if self.controls.len() != n_links {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "controls length mismatch: {} != {n_links}",
                    self.controls.len()
                ),
            });
        }
        if self.nodes.len() != n_nodes {
            return Err(SolverError::ProblemSetup {
                what: format!("nodes length mismatch: {} != {n_nodes}", self.nodes.len()),
            });
        }
        if self.wind_cp.len() != n_nodes {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "wind_cp length mismatch: {} != {n_nodes}",
                    self.wind_cp.len()
                ),
            });
        }
        if !(self.barometric_pressure > 0.0) || !self.wind_speed.is_finite() {
            return Err(SolverError::ProblemSetup {
                what: "barometric pressure must be positive and wind speed finite".into(),
            });
        }
        Ok(())
    }
}
