//! General-purpose constrained minimisation
//!
//! Smooth objectives are minimised over convex sets that admit an exact
//! Euclidean projection. The SVM dual is one client: its feasible set is a
//! box intersected with a single hyperplane.

pub mod constraints;
pub mod projected_gradient;

pub use self::constraints::*;
pub use self::projected_gradient::*;

use crate::core::{Result, SolverStatus};
use ndarray::{Array1, ArrayView1};

/// Smooth scalar function to be minimised
pub trait Objective {
    /// Function value f(x)
    fn value(&self, x: ArrayView1<f64>) -> f64;

    /// Gradient ∇f(x)
    fn gradient(&self, x: ArrayView1<f64>) -> Array1<f64>;
}

/// Closed convex set with a Euclidean projection operator
pub trait ConvexSet {
    /// Nearest point of the set to `point`
    fn project(&self, point: ArrayView1<f64>) -> Result<Array1<f64>>;

    /// Whether `point` lies in the set up to `tolerance`
    fn contains(&self, point: ArrayView1<f64>, tolerance: f64) -> bool;
}

/// Result of a constrained minimisation
#[derive(Debug, Clone)]
pub struct OptimizationOutcome {
    /// Final iterate (always feasible)
    pub solution: Array1<f64>,
    /// Objective value at the final iterate
    pub value: f64,
    /// Number of accepted steps
    pub iterations: usize,
    /// ||P(x - ∇f(x)) - x||∞ at the final iterate
    pub projected_gradient_norm: f64,
    /// Termination reason
    pub status: SolverStatus,
    /// Objective value after every accepted step
    pub history: Vec<f64>,
}
