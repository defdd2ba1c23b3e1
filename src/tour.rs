//! Tour representation and extraction.

use crate::instance::TspInstance;
use crate::subtour::Selection;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A closed tour: node 0, every other node exactly once, node 0 again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour {
    pub nodes: Vec<usize>,
}

impl Tour {
    /// Walk a final selection starting from node 0, following the unique
    /// outgoing selected edge until all nodes are visited, then close the
    /// tour. A connected selection yields a valid tour by construction;
    /// anything else is an internal invariant violation, reported as an
    /// error string for the caller to escalate.
    pub fn extract(selection: &Selection) -> Result<Self, String> {
        let n = selection.n();
        let mut nodes = Vec::with_capacity(n + 1);
        let mut visited = vec![false; n];

        let mut current = 0;
        nodes.push(current);
        visited[0] = true;

        for _ in 1..n {
            let next = selection
                .successor(current)
                .ok_or_else(|| format!("no outgoing selected edge at node {}", current))?;
            if visited[next] {
                return Err(format!(
                    "selection revisits node {} before spanning all nodes",
                    next
                ));
            }
            visited[next] = true;
            nodes.push(next);
            current = next;
        }

        if !selection.is_selected(current, 0) {
            return Err(format!(
                "tour does not close: no selected edge from node {} back to node 0",
                current
            ));
        }
        nodes.push(0);

        Ok(Tour { nodes })
    }

    /// Validate the tour shape against an instance size: length n + 1,
    /// starts and ends at node 0, every other node exactly once.
    pub fn is_complete(&self, n: usize) -> bool {
        if self.nodes.len() != n + 1 {
            return false;
        }
        if self.nodes[0] != 0 || self.nodes[n] != 0 {
            return false;
        }
        let unique: HashSet<usize> = self.nodes[..n].iter().copied().collect();
        unique.len() == n
    }

    /// Total travel cost along the tour.
    pub fn cost(&self, instance: &TspInstance) -> f64 {
        instance.tour_cost(&self.nodes)
    }

    /// Consecutive (from, to) edges of the tour.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.nodes.windows(2).map(|w| (w[0], w[1])).collect()
    }
}

impl std::fmt::Display for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for node in &self.nodes {
            if !first {
                write!(f, " -> ")?;
            }
            write!(f, "{}", node)?;
            first = false;
        }
        Ok(())
    }
}
