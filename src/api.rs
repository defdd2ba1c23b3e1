//! Request/response envelopes.
//!
//! This is the serialization boundary any transport (CLI, HTTP front end)
//! speaks: a method selector in, a whole-solve-or-fail JSON envelope out.
//! Field names and method labels match the animation front end's wire
//! format. Partial results are never emitted; a failed solve produces a
//! `success: false` envelope with a human-readable message only.

use crate::exact::{CuttingPlaneSolution, MtzSolution, SolverEngine};
use crate::instance::{Location, TspInstance};
use crate::trace::AnimationStep;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Solution method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// One-shot MTZ ordering formulation
    Mtz,
    /// Iterative lazy subtour elimination
    CuttingPlane,
}

impl Method {
    /// Label used in response envelopes.
    pub fn label(self) -> &'static str {
        match self {
            Method::Mtz => "MTZ",
            Method::CuttingPlane => "Lazy Subtours",
        }
    }
}

/// Solve result envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimal_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tour: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<(usize, usize)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtour_cuts: Option<Vec<Vec<usize>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_steps: Option<Vec<AnimationStep>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SolveResponse {
    pub fn failure(message: String) -> Self {
        SolveResponse {
            success: false,
            method: None,
            optimal_value: None,
            tour: None,
            edges: None,
            subtour_cuts: None,
            animation_steps: None,
            error: Some(message),
        }
    }

    /// Envelope for an MTZ solve. The method is one-shot, so the
    /// animation trace is a synthetic single final step covering the
    /// whole tour.
    pub fn from_mtz(solution: &MtzSolution, n: usize) -> Self {
        let edges = solution.tour.edges();
        let synthetic_step = AnimationStep {
            iteration: 1,
            objective: solution.objective,
            edges: edges.clone(),
            components: vec![(0..n).collect()],
            is_final: true,
        };
        SolveResponse {
            success: true,
            method: Some(Method::Mtz.label().to_string()),
            optimal_value: Some(solution.objective),
            tour: Some(solution.tour.nodes.clone()),
            edges: Some(edges),
            subtour_cuts: None,
            animation_steps: Some(vec![synthetic_step]),
            error: None,
        }
    }

    /// Envelope for a converged cutting-plane solve.
    pub fn from_cutting_plane(solution: &CuttingPlaneSolution) -> Self {
        match (&solution.tour, solution.objective) {
            (Some(tour), Some(objective)) => SolveResponse {
                success: true,
                method: Some(Method::CuttingPlane.label().to_string()),
                optimal_value: Some(objective),
                tour: Some(tour.nodes.clone()),
                edges: Some(tour.edges()),
                subtour_cuts: Some(solution.cuts.clone()),
                animation_steps: Some(solution.steps.clone()),
                error: None,
            },
            _ => SolveResponse::failure(format!(
                "cutting-plane method stopped without converging after {} iteration(s)",
                solution.iterations
            )),
        }
    }
}

/// Run one solve request against the engine and fold any failure into
/// the response envelope.
pub fn solve(engine: &SolverEngine, method: Method) -> SolveResponse {
    match method {
        Method::Mtz => match engine.solve_mtz() {
            Ok(solution) => SolveResponse::from_mtz(&solution, engine.instance().dimension),
            Err(err) => SolveResponse::failure(err.to_string()),
        },
        Method::CuttingPlane => match engine.solve_cutting_plane() {
            Ok(solution) => SolveResponse::from_cutting_plane(&solution),
            Err(err) => SolveResponse::failure(err.to_string()),
        },
    }
}

/// Instance payload for map initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse {
    pub locations: Vec<Location>,
    pub cost_matrix: Vec<Vec<f64>>,
}

pub fn data(instance: &TspInstance) -> DataResponse {
    DataResponse {
        locations: instance.locations.clone(),
        cost_matrix: instance.cost_matrix.clone(),
    }
}
