//! Animation trace of the iterative solve.
//!
//! Each solver iteration is snapshotted as one [`AnimationStep`]; the log
//! is append-only and handed to the caller wholesale once the solve
//! finishes. The serialized field names match the JSON wire format the
//! animation front end consumes.

use serde::{Deserialize, Serialize};

/// Snapshot of one solver iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationStep {
    /// Iteration counter, 1-based and strictly increasing
    pub iteration: usize,
    /// Objective value of this iteration's relaxed solve
    pub objective: f64,
    /// Selected directed edges
    pub edges: Vec<(usize, usize)>,
    /// Connected components of the selection, each in ascending order
    pub components: Vec<Vec<usize>>,
    /// True iff the selection is a single component spanning all nodes
    pub is_final: bool,
}

/// Append-only sequence of animation steps.
#[derive(Debug, Clone, Default)]
pub struct TraceRecorder {
    steps: Vec<AnimationStep>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one step. Prior entries are never touched.
    pub fn record(&mut self, step: AnimationStep) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&AnimationStep> {
        self.steps.last()
    }

    /// Surrender the full log.
    pub fn into_steps(self) -> Vec<AnimationStep> {
        self.steps
    }
}
