//! Error types for SVM implementation

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SVMError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid label: expected -1 or +1, got {0}")]
    InvalidLabel(f64),

    #[error("Degenerate solution: no multiplier exceeds the support threshold {threshold:e}")]
    DegenerateSolution { threshold: f64 },

    #[error("Infeasible constraints: {0}")]
    InfeasibleConstraints(String),

    #[error("Model not trained")]
    ModelNotTrained,

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, SVMError>;

/// Non-fatal report that the dual solve stopped before meeting its tolerance.
///
/// The multipliers found so far are still used to build the model; the
/// warning travels with the fitted model so callers can inspect it.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error(
    "solver stopped after {iterations} iterations with projected gradient norm \
     {projected_gradient_norm:e} (tolerance {tolerance:e})"
)]
pub struct ConvergenceWarning {
    pub iterations: usize,
    pub projected_gradient_norm: f64,
    pub tolerance: f64,
}
