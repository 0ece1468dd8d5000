//! Scalar transport and pressure set-point control scenarios.

use afn_air::AirState;
use afn_core::units::m;
use afn_elements::{ConstantVolumeFan, DuctSegment, FlowElement, PowerLawCrack};
use afn_graph::NetworkBuilder;
use afn_solver::{
    AirflowProblem, NodeConditions, SetPointSearch, SolverConfig, SolverContext, StepInputs,
};

fn crack_kgps(c: f64) -> Box<dyn FlowElement> {
    Box::new(
        PowerLawCrack::with_default_exponent(c / AirState::default().density.sqrt()).unwrap(),
    )
}

#[test]
fn transport_mixes_and_attenuates_along_ducts() {
    // outdoor --fan--> z1 --duct--> z2 --crack--> exhaust
    let mut b = NetworkBuilder::new();
    let out = b.add_boundary("outdoor", m(0.0));
    let exhaust = b.add_boundary("exhaust", m(0.0));
    let z1 = b.add_zone("z1", m(0.0));
    let z2 = b.add_zone("z2", m(0.0));
    let l_fan = b.add_link("supply_fan", out, z1, m(0.0), m(0.0));
    let l_duct = b.add_link("duct", z1, z2, m(0.0), m(0.0));
    let l_out = b.add_link("relief", z2, exhaust, m(0.0), m(0.0));
    let net = b.build().unwrap();

    let ua_heat = 50.0;
    let mut problem = AirflowProblem::new(&net);
    problem
        .set_element(l_fan, Box::new(ConstantVolumeFan::new(0.1).unwrap()))
        .unwrap();
    problem
        .set_element(
            l_duct,
            Box::new(
                DuctSegment::new(8.0, 0.3, 0.07, 1e-4, 1.0)
                    .unwrap()
                    .with_losses(ua_heat, 0.0),
            ),
        )
        .unwrap();
    problem.set_element(l_out, crack_kgps(0.05)).unwrap();

    let mut inputs = StepInputs::new(&net);
    // Warm supply air, cold duct environment, stale initial zone air
    inputs.nodes[out.index() as usize] = NodeConditions {
        temperature: 30.0,
        co2: 400.0,
        ..NodeConditions::default()
    };
    for z in [z1, z2] {
        inputs.nodes[z.index() as usize] = NodeConditions {
            temperature: 20.0,
            co2: 1000.0,
            ..NodeConditions::default()
        };
    }
    inputs.duct_env_temperature = 0.0;

    // Tight flow tolerances so the transport balances close exactly
    let config = SolverConfig {
        abs_tol: 1e-8,
        rel_tol: 1e-6,
        ..SolverConfig::default()
    };
    let mut ctx = SolverContext::new(&net);
    let solution = ctx.solve(&problem, &inputs, &config).unwrap();

    // z1 receives supply air directly
    assert!((solution.temperature(z1) - 30.0).abs() < 2e-3);
    // z2 receives duct air attenuated toward the 0 C environment
    let m_duct = solution.flow(l_duct).net();
    assert!(m_duct > 0.05);
    let cp = AirState::from_raw(101_325.0, 30.0, 0.0).specific_heat();
    let att = (-ua_heat / (m_duct * cp)).exp();
    let expected = att * 30.0;
    assert!(
        (solution.temperature(z2) - expected).abs() < 2e-3,
        "z2 temperature {} vs expected {expected}",
        solution.temperature(z2)
    );
    assert!(solution.temperature(z2) < solution.temperature(z1));

    // CO2 advects unattenuated: both zones flush to the supply value
    assert!((solution.co2(z1) - 400.0).abs() < 1e-3);
    assert!((solution.co2(z2) - 400.0).abs() < 1e-3);
    // Boundary values are never overwritten
    assert!((solution.temperature(out) - 30.0).abs() < 1e-12);
}

#[test]
fn set_point_search_hits_target_zone_pressure() {
    // Exhaust fan depressurizes the zone; find the control that holds -5 Pa.
    let mut b = NetworkBuilder::new();
    let out = b.add_boundary("outdoor", m(0.0));
    let zone = b.add_zone("zone", m(0.0));
    let l_crack = b.add_link("envelope", out, zone, m(0.0), m(0.0));
    let l_fan = b.add_link("exhaust_fan", zone, out, m(0.0), m(0.0));
    let net = b.build().unwrap();

    let mut problem = AirflowProblem::new(&net);
    problem.set_element(l_crack, crack_kgps(0.001)).unwrap();
    problem
        .set_element(l_fan, Box::new(ConstantVolumeFan::new(0.01).unwrap()))
        .unwrap();

    let inputs = StepInputs::new(&net);
    let search = SetPointSearch {
        fan_link: l_fan,
        node: zone,
        target_pressure: -5.0,
        pressure_tolerance: 0.05,
        max_bisections: 50,
    };

    let mut ctx = SolverContext::new(&net);
    let (solution, control) = ctx
        .solve_with_set_point(&problem, &inputs, &SolverConfig::default(), &search)
        .unwrap();

    assert!(
        (solution.pressure(zone) + 5.0).abs() <= 0.05,
        "zone pressure {}",
        solution.pressure(zone)
    );
    assert!(control > 0.0 && control < 1.0);
    // At -5 Pa the envelope admits 0.001 * 5^0.65; the fan extracts it
    let expected_in = 0.001 * 5.0_f64.powf(0.65);
    assert!((solution.flow(l_crack).net() - expected_in).abs() / expected_in < 0.02);
}

#[test]
fn unreachable_set_point_returns_nearest_endpoint() {
    let mut b = NetworkBuilder::new();
    let out = b.add_boundary("outdoor", m(0.0));
    let zone = b.add_zone("zone", m(0.0));
    let l_crack = b.add_link("envelope", out, zone, m(0.0), m(0.0));
    let l_fan = b.add_link("exhaust_fan", zone, out, m(0.0), m(0.0));
    let net = b.build().unwrap();

    let mut problem = AirflowProblem::new(&net);
    problem.set_element(l_crack, crack_kgps(0.001)).unwrap();
    problem
        .set_element(l_fan, Box::new(ConstantVolumeFan::new(0.01).unwrap()))
        .unwrap();

    let inputs = StepInputs::new(&net);
    let search = SetPointSearch {
        fan_link: l_fan,
        node: zone,
        target_pressure: -1000.0,
        pressure_tolerance: 0.05,
        max_bisections: 50,
    };

    let mut ctx = SolverContext::new(&net);
    let (solution, control) = ctx
        .solve_with_set_point(&problem, &inputs, &SolverConfig::default(), &search)
        .unwrap();

    // Full fan speed is the closest the system can get
    assert_eq!(control, 1.0);
    assert!(solution.pressure(zone) < -5.0);
    assert!(solution.pressure(zone) > -1000.0);
}
