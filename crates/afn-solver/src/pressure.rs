//! Stack (buoyancy) and wind pressure source terms.
//!
//! Both are added to the unknown nodal pressure difference before a link's
//! element is evaluated, so the elements only ever see one total dP.

use afn_air::AirState;
use afn_core::units::constants::G0_MPS2;

/// Stack pressure contribution for one link (Pa, added to dp from -> to).
///
/// Follows the hydrostatic path from the `from` node's reference height down
/// to its link opening, across the opening, and up to the `to` node's
/// reference height. The column between the two openings uses the density of
/// the upstream side, decided by the previous iteration's flow direction to
/// avoid an unstable self-reference; at exactly zero flow the two densities
/// are averaged.
pub fn stack_pressure(
    node_height_from: f64,
    node_height_to: f64,
    link_height_from: f64,
    link_height_to: f64,
    from_state: &AirState,
    to_state: &AirState,
    prev_flow: f64,
) -> f64 {
    let rho_up = if prev_flow > 0.0 {
        from_state.density
    } else if prev_flow < 0.0 {
        to_state.density
    } else {
        0.5 * (from_state.density + to_state.density)
    };

    G0_MPS2
        * (from_state.density * (node_height_from - link_height_from)
            + rho_up * (link_height_from - link_height_to)
            + to_state.density * (link_height_to - node_height_to))
}

/// Wind pressure at a boundary node (Pa, relative to still ambient).
///
/// `cp` is the pressure coefficient already resolved for the current wind
/// direction by the host; this core only consumes the value.
pub fn wind_pressure(cp: f64, outdoor_density: f64, wind_speed: f64) -> f64 {
    cp * 0.5 * outdoor_density * wind_speed * wind_speed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_height_difference_no_stack() {
        let air = AirState::default();
        let ps = stack_pressure(0.0, 0.0, 0.0, 0.0, &air, &air, 0.0);
        assert_eq!(ps, 0.0);
    }

    #[test]
    fn cold_column_drives_downward_flow() {
        // Same opening heights, nodes 3 m apart: the link column dominates.
        let warm = AirState::from_raw(101_325.0, 25.0, 0.0);
        let cold = AirState::from_raw(101_325.0, 0.0, 0.0);
        // from at the bottom, to at the top, cold air upstream (flow < 0)
        let ps_cold = stack_pressure(0.0, 3.0, 1.0, 2.0, &warm, &cold, -0.1);
        let ps_warm = stack_pressure(0.0, 3.0, 1.0, 2.0, &warm, &cold, 0.1);
        // Denser column between the openings lowers dp(from->to) more
        assert!(ps_cold < ps_warm);
        assert!(ps_cold < 0.0);
    }

    #[test]
    fn zero_flow_averages_densities() {
        let warm = AirState::from_raw(101_325.0, 25.0, 0.0);
        let cold = AirState::from_raw(101_325.0, 0.0, 0.0);
        let avg = stack_pressure(0.0, 1.0, 0.0, 1.0, &warm, &cold, 0.0);
        let up = stack_pressure(0.0, 1.0, 0.0, 1.0, &warm, &cold, 1.0);
        let down = stack_pressure(0.0, 1.0, 0.0, 1.0, &warm, &cold, -1.0);
        assert!(((up + down) * 0.5 - avg).abs() < 1e-12);
    }

    #[test]
    fn wind_pressure_quadratic_in_speed() {
        let rho = AirState::default().density;
        let p1 = wind_pressure(0.6, rho, 5.0);
        let p2 = wind_pressure(0.6, rho, 10.0);
        assert!((p2 / p1 - 4.0).abs() < 1e-12);
        assert!(wind_pressure(-0.3, rho, 5.0) < 0.0);
    }
}
