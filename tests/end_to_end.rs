//! End-to-end runs of both exact methods, including the built-in
//! San Francisco instance.

use tsp_exact_solver::api::{self, Method};
use tsp_exact_solver::exact::{EngineConfig, SolverEngine};
use tsp_exact_solver::instance::{TspInstance, SELF_LOOP_SENTINEL};
use tsp_exact_solver::milp::BranchBoundSolver;

fn engine_for(instance: TspInstance) -> SolverEngine {
    SolverEngine::new(instance, Box::new(BranchBoundSolver::new()))
}

/// Fixed asymmetric 6-node instance used to cross-check the two methods.
fn asymmetric_six() -> TspInstance {
    let s = SELF_LOOP_SENTINEL;
    let matrix = vec![
        vec![s, 12.0, 29.0, 22.0, 13.0, 24.0],
        vec![19.0, s, 19.0, 25.0, 28.0, 17.0],
        vec![30.0, 21.0, s, 20.0, 10.0, 15.0],
        vec![21.0, 27.0, 18.0, s, 14.0, 23.0],
        vec![16.0, 26.0, 11.0, 13.0, s, 26.0],
        vec![25.0, 15.0, 16.0, 22.0, 25.0, s],
    ];
    TspInstance::from_matrix("asym-6", matrix, s).unwrap()
}

#[test]
fn methods_agree_on_asymmetric_instance() {
    let engine = engine_for(asymmetric_six());
    let mtz = engine.solve_mtz().unwrap();
    let lazy = engine.solve_cutting_plane().unwrap();

    assert!(lazy.is_converged());
    assert!((mtz.objective - lazy.objective.unwrap()).abs() < 1e-6);

    let n = engine.instance().dimension;
    for tour in [&mtz.tour, lazy.tour.as_ref().unwrap()] {
        assert!(tour.is_complete(n));
        assert!((tour.cost(engine.instance()) - mtz.objective).abs() < 1e-6);
    }
}

#[test]
fn san_francisco_cutting_plane() {
    let engine = engine_for(TspInstance::san_francisco());
    let result = engine.solve_cutting_plane().unwrap();

    assert!(result.is_converged());
    let objective = result.objective.unwrap();
    let tour = result.tour.unwrap();
    assert!(tour.is_complete(10));
    assert!((tour.cost(engine.instance()) - objective).abs() < 1e-6);
    // A sentinel edge in the tour would dwarf any real travel cost.
    assert!(objective < SELF_LOOP_SENTINEL);

    for step in &result.steps {
        let mut nodes: Vec<usize> = step.components.iter().flatten().copied().collect();
        nodes.sort_unstable();
        assert_eq!(nodes, (0..10).collect::<Vec<_>>());
    }
    assert!(result.steps.last().unwrap().is_final);
    assert_eq!(result.steps.len(), result.iterations);
}

#[test]
fn san_francisco_methods_agree() {
    let engine = engine_for(TspInstance::san_francisco());
    let mtz = engine.solve_mtz().unwrap();
    let lazy = engine.solve_cutting_plane().unwrap();
    assert!((mtz.objective - lazy.objective.unwrap()).abs() < 1e-6);
}

#[test]
fn reruns_are_deterministic() {
    let engine = engine_for(TspInstance::san_francisco());
    let first = engine.solve_cutting_plane().unwrap();
    let second = engine.solve_cutting_plane().unwrap();

    assert_eq!(first.objective, second.objective);
    assert_eq!(
        first.tour.as_ref().unwrap().nodes,
        second.tour.as_ref().unwrap().nodes
    );
    assert_eq!(first.cuts, second.cuts);
    assert_eq!(first.iterations, second.iterations);
}

#[test]
fn response_envelope_round_trip() {
    let engine = engine_for(TspInstance::san_francisco());
    let response = api::solve(&engine, Method::CuttingPlane);
    assert!(response.success);

    let json = serde_json::to_string(&response).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["method"], "Lazy Subtours");
    assert_eq!(parsed["tour"][0], 0);
    assert_eq!(parsed["tour"][10], 0);
    assert!(parsed["animation_steps"].as_array().unwrap().len() >= 1);
    assert!(parsed.get("error").is_none());
}

#[test]
fn iteration_limit_is_an_error_not_a_hang() {
    let engine = SolverEngine::with_config(
        TspInstance::san_francisco(),
        Box::new(BranchBoundSolver::new()),
        EngineConfig {
            max_iterations: 1,
            ..EngineConfig::default()
        },
    );

    // The fixed instance needs more than one iteration, so the bound must
    // trip unless the very first relaxation already happens to be a tour.
    match engine.solve_cutting_plane() {
        Ok(result) => assert!(result.is_converged() && result.iterations == 1),
        Err(err) => assert!(err.to_string().contains("1 iteration")),
    }
}
