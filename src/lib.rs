//! Exact TSP Solver Library
//!
//! Computes exact optimal tours for a fixed small asymmetric TSP instance
//! and records a step-by-step trace suitable for animation.
//!
//! # Features
//!
//! - One-shot MTZ formulation (ordering variables forbid subtours outright)
//! - Iterative cutting-plane method with lazy subtour-elimination cuts
//! - Per-iteration animation trace (objective, edges, components)
//! - Pluggable MILP backend behind the [`milp::MilpSolver`] trait, with a
//!   minilp-based branch-and-bound default
//!
//! # Example
//!
//! ```no_run
//! use tsp_exact_solver::exact::SolverEngine;
//! use tsp_exact_solver::instance::TspInstance;
//! use tsp_exact_solver::milp::BranchBoundSolver;
//!
//! let engine = SolverEngine::new(
//!     TspInstance::san_francisco(),
//!     Box::new(BranchBoundSolver::new()),
//! );
//!
//! let result = engine.solve_cutting_plane().unwrap();
//! println!(
//!     "optimal cost {:.0} after {} iterations",
//!     result.objective.unwrap(),
//!     result.iterations
//! );
//! ```

pub mod api;
pub mod exact;
pub mod formulation;
pub mod instance;
pub mod milp;
pub mod subtour;
pub mod tour;
pub mod trace;

pub use exact::SolverEngine;
pub use instance::TspInstance;
pub use tour::Tour;
