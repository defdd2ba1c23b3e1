//! One-shot exact solve via the MTZ ordering formulation.

use super::{EngineConfig, SolveError};
use crate::formulation;
use crate::instance::TspInstance;
use crate::milp::MilpSolver;
use crate::subtour::Selection;
use crate::tour::Tour;

/// Result of an MTZ solve.
#[derive(Debug, Clone)]
pub struct MtzSolution {
    pub tour: Tour,
    pub objective: f64,
}

pub(super) fn solve(
    instance: &TspInstance,
    solver: &dyn MilpSolver,
    config: &EngineConfig,
) -> Result<MtzSolution, SolveError> {
    let (problem, edges) = formulation::mtz_formulation(instance);
    log::debug!(
        "MTZ model: {} variables, {} constraints",
        problem.num_vars(),
        problem.num_constraints()
    );

    let outcome = solver
        .solve(&problem)
        .map_err(|msg| SolveError::InvariantViolation(format!("solver call failed: {}", msg)))?;
    if !outcome.status.is_success() {
        return Err(SolveError::SolverFailure {
            iteration: 1,
            status: outcome.status,
        });
    }

    let values = outcome.values.ok_or_else(|| {
        SolveError::InvariantViolation("solver reported success without values".to_string())
    })?;
    let objective = outcome.objective.ok_or_else(|| {
        SolveError::InvariantViolation("solver reported success without an objective".to_string())
    })?;

    let selection = Selection::from_fractional(&edges.value_matrix(&values), config.integrality_tol)
        .map_err(SolveError::InvariantViolation)?;
    let tour = Tour::extract(&selection).map_err(SolveError::InvariantViolation)?;

    log::info!("MTZ solve done: objective {}, tour {}", objective, tour);
    Ok(MtzSolution { tour, objective })
}
