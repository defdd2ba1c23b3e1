//! Default MILP backend: LP relaxations via `minilp` plus best-first
//! branch and bound on the binary variables.
//!
//! Branching fixes a fractional binary to 0 or 1 through minilp's
//! incremental re-solve, so each node reuses the parent's basis. Nodes are
//! explored in order of their LP bound; with a minimization objective the
//! first all-integer node popped from the queue is therefore optimal.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem, Variable};
use ordered_float::OrderedFloat;

use super::{ConstraintOp, MilpOutcome, MilpProblem, MilpSolver, SolveStatus, VarKind};

/// LP-based branch-and-bound solver.
#[derive(Debug, Clone)]
pub struct BranchBoundSolver {
    /// A binary value within this distance of 0 or 1 counts as integral
    pub integrality_tol: f64,
    /// Abort the search after this many explored nodes
    pub node_limit: usize,
}

impl Default for BranchBoundSolver {
    fn default() -> Self {
        BranchBoundSolver {
            integrality_tol: 1e-6,
            node_limit: 100_000,
        }
    }
}

impl BranchBoundSolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MilpSolver for BranchBoundSolver {
    fn solve(&self, problem: &MilpProblem) -> Result<MilpOutcome, String> {
        let mut lp = Problem::new(OptimizationDirection::Minimize);

        let mut vars: Vec<Variable> = Vec::with_capacity(problem.num_vars());
        let mut binaries: Vec<usize> = Vec::new();
        for (idx, &(kind, obj_coeff)) in problem.vars().iter().enumerate() {
            let (lb, ub) = match kind {
                VarKind::Binary => (0.0, 1.0),
                VarKind::Continuous { lb, ub } => (lb, ub),
            };
            vars.push(lp.add_var(obj_coeff, (lb, ub)));
            if matches!(kind, VarKind::Binary) {
                binaries.push(idx);
            }
        }

        for constraint in problem.constraints() {
            let mut expr = LinearExpr::empty();
            for &(var, coeff) in &constraint.terms {
                expr.add(vars[var.index()], coeff);
            }
            let op = match constraint.op {
                ConstraintOp::Le => ComparisonOp::Le,
                ConstraintOp::Ge => ComparisonOp::Ge,
                ConstraintOp::Eq => ComparisonOp::Eq,
            };
            lp.add_constraint(expr, op, constraint.rhs);
        }

        let root = match lp.solve() {
            Ok(solution) => solution,
            Err(minilp::Error::Infeasible) => {
                return Ok(MilpOutcome::failure(SolveStatus::Infeasible))
            }
            Err(minilp::Error::Unbounded) => {
                return Ok(MilpOutcome::failure(SolveStatus::Unbounded))
            }
        };

        // Node storage; the heap holds (LP bound, slot) with ties broken by
        // insertion order for determinism.
        let mut nodes: Vec<Option<minilp::Solution>> = Vec::new();
        let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, usize)>> = BinaryHeap::new();
        heap.push(Reverse((OrderedFloat(root.objective()), nodes.len())));
        nodes.push(Some(root));

        let mut explored = 0usize;
        while let Some(Reverse((_bound, slot))) = heap.pop() {
            explored += 1;
            if explored > self.node_limit {
                return Ok(MilpOutcome::failure(SolveStatus::Other(format!(
                    "node limit of {} exceeded",
                    self.node_limit
                ))));
            }
            let solution = match nodes[slot].take() {
                Some(solution) => solution,
                None => continue,
            };

            match self.most_fractional(&solution, &vars, &binaries) {
                None => {
                    let values: Vec<f64> =
                        vars.iter().map(|&v| *solution.var_value(v)).collect();
                    log::debug!(
                        "branch and bound finished after {} nodes, objective {}",
                        explored,
                        solution.objective()
                    );
                    return Ok(MilpOutcome {
                        status: SolveStatus::Optimal,
                        objective: Some(solution.objective()),
                        values: Some(values),
                    });
                }
                Some(branch_var) => {
                    let value = *solution.var_value(vars[branch_var]);
                    let first = if value < 0.5 { 0.0 } else { 1.0 };
                    for fixed in [first, 1.0 - first] {
                        // An Err here means the branch is infeasible; prune it.
                        if let Ok(child) = solution.clone().fix_var(vars[branch_var], fixed) {
                            heap.push(Reverse((OrderedFloat(child.objective()), nodes.len())));
                            nodes.push(Some(child));
                        }
                    }
                }
            }
        }

        // Every branch was pruned as infeasible.
        Ok(MilpOutcome::failure(SolveStatus::Infeasible))
    }
}

impl BranchBoundSolver {
    /// Index (into the original variable order) of the binary variable
    /// farthest from integrality, or None if all binaries are integral.
    fn most_fractional(
        &self,
        solution: &minilp::Solution,
        vars: &[Variable],
        binaries: &[usize],
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &idx in binaries {
            let value = *solution.var_value(vars[idx]);
            let dist = value.min(1.0 - value).abs();
            if dist > self.integrality_tol {
                match best {
                    Some((_, best_dist)) if best_dist >= dist => {}
                    _ => best = Some((idx, dist)),
                }
            }
        }
        best.map(|(idx, _)| idx)
    }
}
