//! Flow element library for the airflow network.
//!
//! Each element kind converts the pressure difference across a link into a
//! directed mass flow and its derivative with respect to that difference.
//! Elements are deterministic functions of state and parameters; the solver
//! treats them uniformly through the [`FlowElement`] trait.
//!
//! Conventions shared by every element:
//! - positive pressure difference drives flow from the link's `from` node to
//!   its `to` node; the upstream side for density is chosen by the sign;
//! - `control` in 0..=1 scales the element (opening factor, damper position);
//!   a control of exactly 0 yields exactly zero flow and a finite derivative;
//! - results are never NaN or infinite; near-zero pressure differences take a
//!   laminar/linear branch so the Jacobian stays regular.

pub mod common;
pub mod cpd;
pub mod crack;
pub mod detailed_opening;
pub mod distribution;
pub mod duct;
pub mod error;
pub mod fan;
pub mod fixed;
pub mod horizontal_opening;
pub mod leakage;
pub mod opening;
pub mod traits;

pub use cpd::ConstantPressureDrop;
pub use crack::PowerLawCrack;
pub use detailed_opening::{DetailedOpening, OpeningStage};
pub use distribution::{DistributionComponent, DistributionKind};
pub use duct::{DuctLoss, DuctSegment};
pub use error::{ElementError, ElementResult};
pub use fan::{ConstantVolumeFan, CurveFan};
pub use fixed::{FixedFlow, FixedFlowKind};
pub use horizontal_opening::HorizontalOpening;
pub use leakage::{EffectiveLeakageArea, LeakageRatio};
pub use opening::SimpleOpening;
pub use traits::{ElementFlow, EvalMode, FlowDeriv, FlowElement};
