//! Binary soft-margin Support Vector Machine trained in the dual
//!
//! The dual problem is solved with a projected gradient method over the
//! box 0 ≤ α ≤ C intersected with the hyperplane Σ α_i y_i = 0. Linear models
//! collapse to an explicit weight vector; other kernels predict through the
//! kernel expansion over the support vectors.

pub mod api;
pub mod core;
pub mod kernel;
pub mod model;
pub mod objective;
pub mod optim;
pub mod persistence;
pub mod solver;

// Re-export main types for convenience
pub use crate::api::{EvaluationMetrics, SVM};
pub use crate::core::error::*;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::kernel::{GaussianKernel, Kernel, LinearKernel};
pub use crate::model::{DecisionFunction, FitSummary, TrainedSVM};
pub use crate::objective::{objective, DualObjective};
pub use crate::persistence::SerializableModel;
pub use crate::solver::{DualSolution, DualSolver};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
