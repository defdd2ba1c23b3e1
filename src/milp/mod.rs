//! Solver-agnostic mixed-integer program description.
//!
//! The optimization engine never talks to a concrete solver directly. It
//! builds a [`MilpProblem`] (linear objective, variable kinds and bounds,
//! linear constraints) and hands it to a [`MilpSolver`], which reports a
//! [`SolveStatus`] plus a value for every variable on success. Status is
//! always checked before any value is trusted.

mod branch_bound;

pub use branch_bound::BranchBoundSolver;

use std::fmt;

/// Opaque handle to a decision variable of a [`MilpProblem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(usize);

impl VarId {
    /// Position of the variable in the problem's (and the outcome's) order
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind and bounds of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarKind {
    /// 0/1 integer variable
    Binary,
    /// Continuous variable with inclusive bounds
    Continuous { lb: f64, ub: f64 },
}

/// Comparison operator of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    Le,
    Ge,
    Eq,
}

/// A linear constraint `sum(coeff * var) op rhs`.
#[derive(Debug, Clone)]
pub struct LinConstraint {
    pub terms: Vec<(VarId, f64)>,
    pub op: ConstraintOp,
    pub rhs: f64,
}

/// A minimization problem over binary and continuous variables.
#[derive(Debug, Clone, Default)]
pub struct MilpProblem {
    vars: Vec<(VarKind, f64)>,
    constraints: Vec<LinConstraint>,
}

impl MilpProblem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a decision variable with the given objective coefficient.
    pub fn add_var(&mut self, kind: VarKind, obj_coeff: f64) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push((kind, obj_coeff));
        id
    }

    /// Add a linear constraint over previously created variables.
    pub fn add_constraint(&mut self, constraint: LinConstraint) {
        self.constraints.push(constraint);
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Variables in creation order as (kind, objective coefficient)
    pub fn vars(&self) -> &[(VarKind, f64)] {
        &self.vars
    }

    pub fn constraints(&self) -> &[LinConstraint] {
        &self.constraints
    }

    /// Evaluate the objective for a full variable assignment.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.vars
            .iter()
            .zip(values)
            .map(|(&(_, obj), &v)| obj * v)
            .sum()
    }
}

/// Termination status reported by a solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven optimal
    Optimal,
    /// Optimal within numerical tolerance
    OptimalInaccurate,
    /// No feasible assignment exists
    Infeasible,
    /// Objective unbounded below
    Unbounded,
    /// Any other solver-specific failure
    Other(String),
}

impl SolveStatus {
    /// Whether the reported variable values may be used.
    pub fn is_success(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::OptimalInaccurate)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "optimal"),
            SolveStatus::OptimalInaccurate => write!(f, "optimal_inaccurate"),
            SolveStatus::Infeasible => write!(f, "infeasible"),
            SolveStatus::Unbounded => write!(f, "unbounded"),
            SolveStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Result of one solver invocation.
#[derive(Debug, Clone)]
pub struct MilpOutcome {
    pub status: SolveStatus,
    /// One value per variable, in creation order; present iff the status
    /// is a success
    pub values: Option<Vec<f64>>,
    /// Objective of the returned assignment
    pub objective: Option<f64>,
}

impl MilpOutcome {
    pub fn failure(status: SolveStatus) -> Self {
        MilpOutcome {
            status,
            values: None,
            objective: None,
        }
    }
}

/// The external solver seam. Implementations are free to be slow and
/// black-box; the engine treats every call as a blocking oracle.
pub trait MilpSolver {
    fn solve(&self, problem: &MilpProblem) -> Result<MilpOutcome, String>;
}
