//! Iterative exact solve via lazy subtour elimination.
//!
//! Each iteration solves the assignment relaxation under all cuts found
//! so far, partitions the rounded selection into components, records one
//! animation step, and either converges (single spanning component) or
//! adds one cut per illegal component and loops. Cuts only accumulate;
//! since every cut permanently forbids one node subset from closing a
//! cycle and there are finitely many subsets, the loop terminates.

use super::{EngineConfig, SolveError};
use crate::formulation;
use crate::instance::TspInstance;
use crate::milp::MilpSolver;
use crate::subtour::{connected_components, Selection};
use crate::tour::Tour;
use crate::trace::{AnimationStep, TraceRecorder};

/// Result of a cutting-plane run.
///
/// `tour` and `objective` are present iff the loop converged to a single
/// spanning tour. The non-converged shape only arises through the
/// stall safety valve; the steps and cuts gathered up to that point are
/// still returned for inspection.
#[derive(Debug, Clone)]
pub struct CuttingPlaneSolution {
    pub tour: Option<Tour>,
    pub objective: Option<f64>,
    /// Every subtour-elimination cut applied, in discovery order
    pub cuts: Vec<Vec<usize>>,
    /// One animation step per iteration
    pub steps: Vec<AnimationStep>,
    pub iterations: usize,
}

impl CuttingPlaneSolution {
    pub fn is_converged(&self) -> bool {
        self.tour.is_some()
    }
}

pub(super) fn solve(
    instance: &TspInstance,
    solver: &dyn MilpSolver,
    config: &EngineConfig,
) -> Result<CuttingPlaneSolution, SolveError> {
    let n = instance.dimension;
    let mut cuts: Vec<Vec<usize>> = Vec::new();
    let mut recorder = TraceRecorder::new();
    let mut iteration = 0;

    loop {
        iteration += 1;
        if iteration > config.max_iterations {
            return Err(SolveError::IterationLimit {
                limit: config.max_iterations,
            });
        }

        // Formulating: degree constraints plus every cut found so far.
        let (mut problem, edges) = formulation::assignment_relaxation(instance);
        for cut in &cuts {
            problem.add_constraint(formulation::subtour_cut_constraint(&edges, cut));
        }

        // Solving
        let outcome = solver.solve(&problem).map_err(|msg| {
            SolveError::InvariantViolation(format!("solver call failed: {}", msg))
        })?;
        if !outcome.status.is_success() {
            return Err(SolveError::SolverFailure {
                iteration,
                status: outcome.status,
            });
        }
        let values = outcome.values.ok_or_else(|| {
            SolveError::InvariantViolation("solver reported success without values".to_string())
        })?;
        let objective = outcome.objective.ok_or_else(|| {
            SolveError::InvariantViolation(
                "solver reported success without an objective".to_string(),
            )
        })?;

        // Detecting
        let selection =
            Selection::from_fractional(&edges.value_matrix(&values), config.integrality_tol)
                .map_err(SolveError::InvariantViolation)?;
        let components = connected_components(&selection);
        let is_final = components.len() == 1 && components[0].len() == n;
        log::debug!(
            "iteration {}: objective {}, {} component(s)",
            iteration,
            objective,
            components.len()
        );

        // Recording: one step per iteration, converged or not.
        recorder.record(AnimationStep {
            iteration,
            objective,
            edges: selection.edges(),
            components: components.clone(),
            is_final,
        });

        if is_final {
            let tour = Tour::extract(&selection).map_err(SolveError::InvariantViolation)?;
            log::info!(
                "converged after {} iteration(s) with {} cut(s): objective {}, tour {}",
                iteration,
                cuts.len(),
                objective,
                tour
            );
            return Ok(CuttingPlaneSolution {
                tour: Some(tour),
                objective: Some(objective),
                cuts,
                steps: recorder.into_steps(),
                iterations: iteration,
            });
        }

        // Cutting: forbid each illegal component from recurring. A subset
        // that is already cut must not reappear; if only such repeats are
        // found, stop with the current state instead of looping forever.
        let mut new_cuts = 0;
        for component in &components {
            if component.len() < n && !cuts.contains(component) {
                cuts.push(component.clone());
                new_cuts += 1;
            }
        }
        if new_cuts == 0 {
            log::warn!(
                "iteration {}: {} components but no new cuts, stopping without convergence",
                iteration,
                components.len()
            );
            return Ok(CuttingPlaneSolution {
                tour: None,
                objective: None,
                cuts,
                steps: recorder.into_steps(),
                iterations: iteration,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::SELF_LOOP_SENTINEL;
    use crate::milp::{BranchBoundSolver, MilpOutcome, MilpProblem, SolveStatus};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    fn unit_square() -> TspInstance {
        let s = SELF_LOOP_SENTINEL;
        let d = std::f64::consts::SQRT_2;
        let matrix = vec![
            vec![s, 1.0, d, 1.0],
            vec![1.0, s, 1.0, d],
            vec![d, 1.0, s, 1.0],
            vec![1.0, d, 1.0, s],
        ];
        TspInstance::from_matrix("unit-square", matrix, s).unwrap()
    }

    /// Scripted solver replaying prepared outcomes, one per invocation.
    struct ScriptedSolver {
        outcomes: RefCell<VecDeque<MilpOutcome>>,
    }

    impl ScriptedSolver {
        fn new(outcomes: Vec<MilpOutcome>) -> Self {
            ScriptedSolver {
                outcomes: RefCell::new(outcomes.into()),
            }
        }

        /// Success outcome whose values select exactly the given edges of
        /// an n-node assignment model.
        fn selection_outcome(edges: &[(usize, usize)], n: usize, objective: f64) -> MilpOutcome {
            let mut values = vec![0.0; n * n];
            for &(i, j) in edges {
                values[i * n + j] = 1.0;
            }
            MilpOutcome {
                status: SolveStatus::Optimal,
                values: Some(values),
                objective: Some(objective),
            }
        }
    }

    impl MilpSolver for ScriptedSolver {
        fn solve(&self, _problem: &MilpProblem) -> Result<MilpOutcome, String> {
            self.outcomes
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| "scripted solver exhausted".to_string())
        }
    }

    #[test]
    fn test_unit_square_converges_in_two_iterations() {
        let instance = unit_square();
        let solver = BranchBoundSolver::new();
        let result = solve(&instance, &solver, &EngineConfig::default()).unwrap();

        assert!(result.is_converged());
        assert!(result.iterations <= 2);
        assert!((result.objective.unwrap() - 4.0).abs() < 1e-6);

        let tour = result.tour.unwrap();
        assert!(tour.is_complete(4));
        assert!((tour.cost(&instance) - result.objective.unwrap()).abs() < 1e-6);

        // Relaxation optima are tied between the perimeter tour and two
        // 2-node subtours of cost 2 each; if the solver picks the latter
        // first, the cuts must follow.
        if result.iterations == 2 {
            let first = &result.steps[0];
            assert_eq!(first.components.len(), 2);
            assert!((first.objective - 4.0).abs() < 1e-6);
            assert!(!first.is_final);
            assert!(!result.cuts.is_empty());
        }
        assert!(result.steps.last().unwrap().is_final);
    }

    #[test]
    fn test_forced_subtours_take_two_iterations() {
        // Edges inside {0,1} and {2,3} cost 1, everything else 10: the
        // relaxation strictly prefers the two 2-node subtours (cost 4),
        // and only the cuts push it to the real optimum 22.
        let s = SELF_LOOP_SENTINEL;
        let mut matrix = vec![vec![10.0; 4]; 4];
        for i in 0..4 {
            matrix[i][i] = s;
        }
        for &(i, j) in &[(0, 1), (1, 0), (2, 3), (3, 2)] {
            matrix[i][j] = 1.0;
        }
        let instance = TspInstance::from_matrix("paired", matrix, s).unwrap();

        let solver = BranchBoundSolver::new();
        let result = solve(&instance, &solver, &EngineConfig::default()).unwrap();

        assert!(result.is_converged());
        assert_eq!(result.iterations, 2);
        assert!((result.objective.unwrap() - 22.0).abs() < 1e-6);

        let first = &result.steps[0];
        assert_eq!(first.components, vec![vec![0, 1], vec![2, 3]]);
        assert!((first.objective - 4.0).abs() < 1e-6);
        assert!(!first.is_final);

        assert_eq!(result.cuts, vec![vec![0, 1], vec![2, 3]]);
        let last = result.steps.last().unwrap();
        assert!(last.is_final);
        assert_eq!(last.components, vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_steps_partition_all_nodes() {
        let instance = unit_square();
        let solver = BranchBoundSolver::new();
        let result = solve(&instance, &solver, &EngineConfig::default()).unwrap();

        for step in &result.steps {
            let mut nodes: Vec<usize> = step.components.iter().flatten().copied().collect();
            nodes.sort_unstable();
            assert_eq!(nodes, (0..4).collect::<Vec<_>>());
            assert_eq!(
                step.is_final,
                step.components.len() == 1 && step.components[0].len() == 4
            );
        }
    }

    #[test]
    fn test_cut_monotonicity() {
        let instance = unit_square();
        let solver = BranchBoundSolver::new();
        let result = solve(&instance, &solver, &EngineConfig::default()).unwrap();

        // No subset appears twice in the accumulated cut list.
        for (a, cut_a) in result.cuts.iter().enumerate() {
            for cut_b in result.cuts.iter().skip(a + 1) {
                assert_ne!(cut_a, cut_b);
            }
        }
        // A subset cut in an earlier iteration never recurs as a full
        // illegal component later.
        for (a, step_a) in result.steps.iter().enumerate() {
            for step_b in result.steps.iter().skip(a + 1) {
                for component in &step_a.components {
                    if component.len() < 4 {
                        assert!(!step_b.components.contains(component));
                    }
                }
            }
        }
    }

    #[test]
    fn test_scripted_subtours_then_tour() {
        let instance = unit_square();
        let solver = ScriptedSolver::new(vec![
            ScriptedSolver::selection_outcome(&[(0, 1), (1, 0), (2, 3), (3, 2)], 4, 4.0),
            ScriptedSolver::selection_outcome(&[(0, 1), (1, 2), (2, 3), (3, 0)], 4, 4.0),
        ]);

        let result = solve(&instance, &solver, &EngineConfig::default()).unwrap();
        assert!(result.is_converged());
        assert_eq!(result.iterations, 2);
        assert_eq!(result.cuts, vec![vec![0, 1], vec![2, 3]]);
        assert_eq!(result.tour.unwrap().nodes, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_stall_valve_returns_state() {
        // The same illegal partition twice in a row: the second iteration
        // finds nothing new to cut and must stop rather than spin.
        let instance = unit_square();
        let subtours = [(0, 1), (1, 0), (2, 3), (3, 2)];
        let solver = ScriptedSolver::new(vec![
            ScriptedSolver::selection_outcome(&subtours, 4, 4.0),
            ScriptedSolver::selection_outcome(&subtours, 4, 4.0),
        ]);

        let result = solve(&instance, &solver, &EngineConfig::default()).unwrap();
        assert!(!result.is_converged());
        assert!(result.tour.is_none());
        assert!(result.objective.is_none());
        assert_eq!(result.iterations, 2);
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.cuts, vec![vec![0, 1], vec![2, 3]]);
    }

    #[test]
    fn test_solver_failure_carries_iteration() {
        let instance = unit_square();
        let solver = ScriptedSolver::new(vec![
            ScriptedSolver::selection_outcome(&[(0, 1), (1, 0), (2, 3), (3, 2)], 4, 4.0),
            MilpOutcome::failure(SolveStatus::Infeasible),
        ]);

        let err = solve(&instance, &solver, &EngineConfig::default()).unwrap_err();
        match err {
            SolveError::SolverFailure { iteration, status } => {
                assert_eq!(iteration, 2);
                assert_eq!(status, SolveStatus::Infeasible);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_iteration_limit() {
        let instance = unit_square();
        // Keep replaying fresh illegal partitions so cuts always grow:
        // alternate the two ways to pair up four nodes that include 0|1.
        let solver = ScriptedSolver::new(vec![
            ScriptedSolver::selection_outcome(&[(0, 1), (1, 0), (2, 3), (3, 2)], 4, 4.0),
            ScriptedSolver::selection_outcome(&[(0, 2), (2, 0), (1, 3), (3, 1)], 4, 4.0),
            ScriptedSolver::selection_outcome(&[(0, 3), (3, 0), (1, 2), (2, 1)], 4, 4.0),
        ]);
        let config = EngineConfig {
            max_iterations: 3,
            ..EngineConfig::default()
        };

        let err = solve(&instance, &solver, &config).unwrap_err();
        match err {
            SolveError::IterationLimit { limit } => assert_eq!(limit, 3),
            other => panic!("unexpected error: {}", other),
        }
    }
}
