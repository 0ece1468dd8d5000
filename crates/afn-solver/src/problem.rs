//! Problem definition: topology plus the element attached to each link.

use std::collections::HashMap;

use afn_core::LinkId;
use afn_elements::FlowElement;
use afn_graph::Network;

use crate::error::{SolverError, SolverResult};

/// An airflow network problem: a validated network and one flow element per
/// link. Built once per simulation run; the per-timestep variability
/// (controls, ambient state) arrives through [`crate::StepInputs`].
pub struct AirflowProblem<'a> {
    network: &'a Network,
    elements: HashMap<LinkId, Box<dyn FlowElement>>,
}

impl<'a> AirflowProblem<'a> {
    pub fn new(network: &'a Network) -> Self {
        Self {
            network,
            elements: HashMap::new(),
        }
    }

    pub fn network(&self) -> &Network {
        self.network
    }

    /// Attach an element to a link. Each link carries exactly one element.
    pub fn set_element(
        &mut self,
        link: LinkId,
        element: Box<dyn FlowElement>,
    ) -> SolverResult<()> {
        let Some(info) = self.network.link(link) else {
            return Err(SolverError::ProblemSetup {
                what: format!("link {link} does not exist in the network"),
            });
        };
        if self.elements.contains_key(&link) {
            return Err(SolverError::ProblemSetup {
                what: format!("link {link} ({}) already has an element", info.name),
            });
        }
        self.elements.insert(link, element);
        Ok(())
    }

    /// The element on a link, if one has been attached.
    pub fn element(&self, link: LinkId) -> Option<&dyn FlowElement> {
        self.elements.get(&link).map(|b| b.as_ref())
    }

    /// Every link must have an element before solving.
    pub fn validate(&self) -> SolverResult<()> {
        for link in self.network.links() {
            if !self.elements.contains_key(&link.id) {
                return Err(SolverError::ProblemSetup {
                    what: format!("link {} ({}) has no flow element", link.id, link.name),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use afn_core::units::m;
    use afn_elements::PowerLawCrack;
    use afn_graph::NetworkBuilder;

    fn crack() -> Box<dyn FlowElement> {
        Box::new(PowerLawCrack::with_default_exponent(0.001).unwrap())
    }

    #[test]
    fn validate_requires_element_per_link() {
        let mut b = NetworkBuilder::new();
        let out = b.add_boundary("outdoor", m(0.0));
        let z = b.add_zone("zone", m(0.0));
        let link = b.add_link("crack", out, z, m(1.0), m(1.0));
        let net = b.build().unwrap();

        let mut problem = AirflowProblem::new(&net);
        assert!(problem.validate().is_err());
        problem.set_element(link, crack()).unwrap();
        assert!(problem.validate().is_ok());
        // Second attachment on the same link is a setup error
        assert!(problem.set_element(link, crack()).is_err());
    }
}
