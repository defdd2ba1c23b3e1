//! Rounded edge selections and subtour detection.
//!
//! A relaxation solution comes back as fractional values; [`Selection`]
//! rounds them to a 0/1 adjacency matrix and verifies the degree
//! invariants instead of assuming them. [`connected_components`] then
//! partitions the nodes by undirected reachability, which is what decides
//! whether the selection is a single tour or a set of illegal subtours.

/// A 0/1 selection of directed edges satisfying the assignment degree
/// constraints: every row and column sums to one and the diagonal is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    n: usize,
    x: Vec<Vec<u8>>,
}

impl Selection {
    /// Round a fractional solution matrix to a selection. Fails if any
    /// entry is farther than `tol` from both 0 and 1, or if the rounded
    /// matrix violates the degree invariants.
    pub fn from_fractional(values: &[Vec<f64>], tol: f64) -> Result<Self, String> {
        let n = values.len();
        let mut x = vec![vec![0u8; n]; n];
        for (i, row) in values.iter().enumerate() {
            if row.len() != n {
                return Err(format!(
                    "solution matrix is not square: row {} has {} entries",
                    i,
                    row.len()
                ));
            }
            for (j, &v) in row.iter().enumerate() {
                if v.abs() <= tol {
                    x[i][j] = 0;
                } else if (v - 1.0).abs() <= tol {
                    x[i][j] = 1;
                } else {
                    return Err(format!(
                        "edge value [{}][{}] = {} is not within {} of 0 or 1",
                        i, j, v, tol
                    ));
                }
            }
        }

        let selection = Selection { n, x };
        selection.check_degrees()?;
        Ok(selection)
    }

    /// Each node must have exactly one selected outgoing and one selected
    /// incoming edge and no self-loop.
    fn check_degrees(&self) -> Result<(), String> {
        for i in 0..self.n {
            if self.x[i][i] != 0 {
                return Err(format!("self-loop selected at node {}", i));
            }
            let out: u8 = self.x[i].iter().sum();
            if out != 1 {
                return Err(format!("node {} has out-degree {}, expected 1", i, out));
            }
            let inc: u8 = (0..self.n).map(|k| self.x[k][i]).sum();
            if inc != 1 {
                return Err(format!("node {} has in-degree {}, expected 1", i, inc));
            }
        }
        Ok(())
    }

    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_selected(&self, i: usize, j: usize) -> bool {
        self.x[i][j] == 1
    }

    /// The unique selected successor of node i.
    pub fn successor(&self, i: usize) -> Option<usize> {
        (0..self.n).find(|&j| self.x[i][j] == 1)
    }

    /// All selected edges (i, j) in row-major order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::with_capacity(self.n);
        for i in 0..self.n {
            for j in 0..self.n {
                if self.x[i][j] == 1 {
                    edges.push((i, j));
                }
            }
        }
        edges
    }
}

/// Partition the nodes into connected components of the selection graph,
/// treated as undirected: a node's neighbors are both its selected
/// successor and its selected predecessor, so the two sides of every node
/// merge into the same component.
///
/// Traversal uses an explicit stack with per-node visited flags. Each
/// component is returned in ascending node order; components are ordered
/// by their smallest node.
pub fn connected_components(selection: &Selection) -> Vec<Vec<usize>> {
    let n = selection.n();
    let mut visited = vec![false; n];
    let mut components = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut stack = vec![start];
        let mut component = Vec::new();
        visited[start] = true;

        while let Some(u) = stack.pop() {
            component.push(u);
            for v in 0..n {
                if (selection.is_selected(u, v) || selection.is_selected(v, u)) && !visited[v] {
                    visited[v] = true;
                    stack.push(v);
                }
            }
        }

        component.sort_unstable();
        components.push(component);
    }

    components
}
