//! Exact solution engine.
//!
//! [`SolverEngine`] owns one immutable instance and a boxed MILP solver
//! and exposes the two exact methods: the one-shot MTZ formulation and
//! the iterative cutting-plane loop. Each call is independent; no state
//! crosses solve boundaries.

mod cutting_plane;
mod mtz;

pub use cutting_plane::CuttingPlaneSolution;
pub use mtz::MtzSolution;

use crate::instance::TspInstance;
use crate::milp::{MilpSolver, SolveStatus};
use std::fmt;

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Hard bound on cutting-plane iterations; breaching it is an error,
    /// never a hang
    pub max_iterations: usize,
    /// Tolerance when rounding solver values to a 0/1 selection
    pub integrality_tol: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_iterations: 100,
            integrality_tol: 1e-4,
        }
    }
}

/// Failure of one solve request.
#[derive(Debug)]
pub enum SolveError {
    /// The external solver returned a non-success status
    SolverFailure {
        iteration: usize,
        status: SolveStatus,
    },
    /// An internal postcondition failed; a defect, not a user condition
    InvariantViolation(String),
    /// The cutting-plane loop hit its iteration bound without converging
    IterationLimit { limit: usize },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::SolverFailure { iteration, status } => write!(
                f,
                "solver failed at iteration {} with status: {}",
                iteration, status
            ),
            SolveError::InvariantViolation(msg) => {
                write!(f, "internal invariant violated: {}", msg)
            }
            SolveError::IterationLimit { limit } => {
                write!(f, "no convergence within {} iterations", limit)
            }
        }
    }
}

impl std::error::Error for SolveError {}

/// Exact TSP solver bound to one instance and one MILP backend.
pub struct SolverEngine {
    instance: TspInstance,
    solver: Box<dyn MilpSolver>,
    config: EngineConfig,
}

impl SolverEngine {
    pub fn new(instance: TspInstance, solver: Box<dyn MilpSolver>) -> Self {
        Self::with_config(instance, solver, EngineConfig::default())
    }

    pub fn with_config(
        instance: TspInstance,
        solver: Box<dyn MilpSolver>,
        config: EngineConfig,
    ) -> Self {
        SolverEngine {
            instance,
            solver,
            config,
        }
    }

    pub fn instance(&self) -> &TspInstance {
        &self.instance
    }

    /// Solve with the one-shot MTZ formulation.
    pub fn solve_mtz(&self) -> Result<MtzSolution, SolveError> {
        mtz::solve(&self.instance, self.solver.as_ref(), &self.config)
    }

    /// Solve with the iterative lazy subtour-elimination method.
    pub fn solve_cutting_plane(&self) -> Result<CuttingPlaneSolution, SolveError> {
        cutting_plane::solve(&self.instance, self.solver.as_ref(), &self.config)
    }
}
