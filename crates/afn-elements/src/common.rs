//! Common utilities for element calculations.

use crate::error::{ElementError, ElementResult};
use afn_core::ensure_finite;
use afn_core::units::constants::{P_STD_PA, T_STD_C};
use afn_air::properties::{density, dynamic_viscosity};

/// Reference (standard) air density used to normalize element coefficients.
pub fn standard_density() -> f64 {
    density(P_STD_PA, T_STD_C, 0.0)
}

/// Reference (standard) air dynamic viscosity.
pub fn standard_viscosity() -> f64 {
    dynamic_viscosity(T_STD_C)
}

/// Ensure a value is finite, returning ElementError if not.
pub fn check_finite(value: f64, what: &'static str) -> ElementResult<()> {
    ensure_finite(value, what).map_err(|_| ElementError::NonPhysical { what })?;
    Ok(())
}

/// Reference-condition correction applied to power-law coefficients so a
/// coefficient measured at standard conditions holds at the local state.
pub fn reference_correction(expn: f64, rho_up: f64, visc_up: f64) -> f64 {
    (standard_density() / rho_up).powf(expn - 1.0)
        * (standard_viscosity() / visc_up).powf(2.0 * expn - 1.0)
}

/// Pick the smaller-magnitude of the laminar and turbulent flows, returning
/// (flow, derivative). Near zero pressure difference the laminar branch wins,
/// keeping the derivative finite; at larger differences the turbulent branch
/// governs.
pub fn laminar_turbulent_select(
    flow_lam: f64,
    dflow_lam: f64,
    flow_turb: f64,
    dflow_turb: f64,
) -> (f64, f64) {
    if flow_turb.abs() < flow_lam.abs() {
        (flow_turb, dflow_turb)
    } else {
        (flow_lam, dflow_lam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_reference_values() {
        assert!((standard_density() - 1.204).abs() < 0.002);
        assert!((standard_viscosity() - 1.81e-5).abs() < 2e-7);
    }

    #[test]
    fn correction_is_unity_at_reference() {
        let c = reference_correction(0.65, standard_density(), standard_viscosity());
        assert!((c - 1.0).abs() < 1e-12);
    }

    #[test]
    fn select_prefers_laminar_near_zero() {
        // Tiny dp: turbulent |dp|^n dwarfs laminar dp only far from zero
        let (f, df) = laminar_turbulent_select(1e-20, 1e-10, 1e-8, 1e3);
        assert_eq!(f, 1e-20);
        assert_eq!(df, 1e-10);
    }

    #[test]
    fn check_finite_rejects_nan() {
        assert!(check_finite(f64::NAN, "test").is_err());
        assert!(check_finite(1.0, "test").is_ok());
    }
}
