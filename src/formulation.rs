//! Integer-programming formulations of the TSP.
//!
//! Both exact methods share the assignment relaxation: one binary edge
//! variable x[i][j] per ordered node pair, unit in/out degree per node and
//! a forbidden diagonal. The MTZ formulation extends it with continuous
//! ordering variables so that a single optimization call already yields a
//! connected tour; the cutting-plane method instead starts from the bare
//! relaxation and grows subtour-elimination cuts.

use crate::instance::TspInstance;
use crate::milp::{ConstraintOp, LinConstraint, MilpProblem, VarId, VarKind};

/// Handles of the edge variables x[i][j] of a formulation, in row-major
/// order. Diagonal variables exist but are constrained to zero.
#[derive(Debug, Clone)]
pub struct EdgeVars {
    n: usize,
    ids: Vec<Vec<VarId>>,
}

impl EdgeVars {
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn id(&self, i: usize, j: usize) -> VarId {
        self.ids[i][j]
    }

    /// Rebuild the n x n value matrix from a solver's flat assignment.
    pub fn value_matrix(&self, values: &[f64]) -> Vec<Vec<f64>> {
        (0..self.n)
            .map(|i| (0..self.n).map(|j| values[self.ids[i][j].index()]).collect())
            .collect()
    }
}

/// Build the assignment relaxation shared by both methods: binary edge
/// variables weighted by travel cost, row and column sums fixed to one,
/// self-loops forced to zero.
pub fn assignment_relaxation(instance: &TspInstance) -> (MilpProblem, EdgeVars) {
    let n = instance.dimension;
    let mut problem = MilpProblem::new();

    let ids: Vec<Vec<VarId>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| problem.add_var(VarKind::Binary, instance.cost(i, j)))
                .collect()
        })
        .collect();
    let edges = EdgeVars { n, ids };

    for i in 0..n {
        let out_degree = (0..n).map(|j| (edges.id(i, j), 1.0)).collect();
        problem.add_constraint(LinConstraint {
            terms: out_degree,
            op: ConstraintOp::Eq,
            rhs: 1.0,
        });

        let in_degree = (0..n).map(|j| (edges.id(j, i), 1.0)).collect();
        problem.add_constraint(LinConstraint {
            terms: in_degree,
            op: ConstraintOp::Eq,
            rhs: 1.0,
        });

        problem.add_constraint(LinConstraint {
            terms: vec![(edges.id(i, i), 1.0)],
            op: ConstraintOp::Eq,
            rhs: 0.0,
        });
    }

    (problem, edges)
}

/// Build the full MTZ formulation: the assignment relaxation plus ordering
/// variables u with u[0] = 1, 2 <= u[i] <= n for i != 0, and
/// u[i] - u[j] + n * x[i][j] <= n - 1 for all i, j != 0 with i != j.
///
/// The ordering inequalities force u to increase strictly along any cycle
/// avoiding node 0, so the only integer-feasible solutions are single
/// tours through node 0.
pub fn mtz_formulation(instance: &TspInstance) -> (MilpProblem, EdgeVars) {
    let (mut problem, edges) = assignment_relaxation(instance);
    let n = instance.dimension;

    let mut order: Vec<VarId> = Vec::with_capacity(n);
    order.push(problem.add_var(VarKind::Continuous { lb: 1.0, ub: 1.0 }, 0.0));
    for _ in 1..n {
        order.push(problem.add_var(
            VarKind::Continuous {
                lb: 2.0,
                ub: n as f64,
            },
            0.0,
        ));
    }

    for i in 1..n {
        for j in 1..n {
            if i != j {
                problem.add_constraint(LinConstraint {
                    terms: vec![(order[i], 1.0), (order[j], -1.0), (edges.id(i, j), n as f64)],
                    op: ConstraintOp::Le,
                    rhs: (n - 1) as f64,
                });
            }
        }
    }

    (problem, edges)
}

/// Subtour-elimination cut for a node subset S with |S| < n: the edges
/// internal to S may not close a cycle, i.e. their sum is at most |S| - 1.
pub fn subtour_cut_constraint(edges: &EdgeVars, subset: &[usize]) -> LinConstraint {
    let mut terms = Vec::with_capacity(subset.len() * (subset.len() - 1));
    for &i in subset {
        for &j in subset {
            if i != j {
                terms.push((edges.id(i, j), 1.0));
            }
        }
    }
    LinConstraint {
        terms,
        op: ConstraintOp::Le,
        rhs: (subset.len() - 1) as f64,
    }
}
