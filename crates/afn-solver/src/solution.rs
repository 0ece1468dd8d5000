//! Converged solution published to the host.

use afn_core::{LinkId, NodeId};
use afn_elements::ElementFlow;

/// The output of one solve: converged nodal pressures, resolved link flows
/// and the transported scalar fields, indexed by node/link position.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Relative pressure per node (Pa); boundary entries hold the wind term
    pub pressures: Vec<f64>,
    /// Resolved flow per link (single signed or explicit two-way)
    pub flows: Vec<ElementFlow>,
    /// Node temperatures after transport (degC)
    pub temperature: Vec<f64>,
    /// Node humidity ratios after transport
    pub humidity: Vec<f64>,
    /// Node CO2 concentrations after transport (ppm)
    pub co2: Vec<f64>,
    /// Node generic contaminant concentrations after transport
    pub contaminant: Vec<f64>,
    /// Newton iterations used
    pub iterations: usize,
}

impl Solution {
    pub fn pressure(&self, node: NodeId) -> f64 {
        self.pressures[node.index() as usize]
    }

    pub fn flow(&self, link: LinkId) -> ElementFlow {
        self.flows[link.index() as usize]
    }

    pub fn temperature(&self, node: NodeId) -> f64 {
        self.temperature[node.index() as usize]
    }

    pub fn humidity(&self, node: NodeId) -> f64 {
        self.humidity[node.index() as usize]
    }

    pub fn co2(&self, node: NodeId) -> f64 {
        self.co2[node.index() as usize]
    }

    pub fn contaminant(&self, node: NodeId) -> f64 {
        self.contaminant[node.index() as usize]
    }
}
