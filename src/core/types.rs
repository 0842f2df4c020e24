//! Core type definitions for SVM

use crate::core::{Result, SVMError};
use serde::{Deserialize, Serialize};

/// Prediction result containing label and decision value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class label (+1 or -1)
    pub label: f64,
    /// Raw decision function value
    pub decision_value: f64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(label: f64, decision_value: f64) -> Self {
        Self {
            label,
            decision_value,
        }
    }

    /// Build a prediction from a raw decision value
    pub fn from_decision(decision_value: f64) -> Self {
        Self::new(label_for(decision_value), decision_value)
    }

    /// Get confidence as absolute value of decision value
    pub fn confidence(&self) -> f64 {
        self.decision_value.abs()
    }
}

/// Map a decision value to a class label.
///
/// Points exactly on the boundary (including `-0.0`) are assigned to +1.
pub fn label_for(decision_value: f64) -> f64 {
    if decision_value >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// How the constrained solver terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverStatus {
    /// Projected gradient norm fell below the tolerance
    Converged,
    /// Iteration budget exhausted
    MaxIterations,
    /// Backtracking could not find a decreasing step
    LineSearchFailed,
}

impl SolverStatus {
    pub fn is_converged(&self) -> bool {
        matches!(self, SolverStatus::Converged)
    }
}

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvmConfig {
    /// Regularization parameter (upper bound for alpha)
    pub c: f64,
    /// Tolerance on the projected gradient (infinity norm)
    pub epsilon: f64,
    /// Maximum number of solver iterations
    pub max_iterations: usize,
    /// Multipliers above this value mark support vectors
    pub support_threshold: f64,
}

impl Default for SvmConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            epsilon: 1e-6,
            max_iterations: 1000,
            support_threshold: 1e-8,
        }
    }
}

impl SvmConfig {
    /// Check that every parameter is usable by the solver
    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "C must be positive and finite, got: {}",
                self.c
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "Epsilon must be positive and finite, got: {}",
                self.epsilon
            )));
        }
        if self.max_iterations == 0 {
            return Err(SVMError::InvalidParameter(
                "Maximum iterations must be at least 1".to_string(),
            ));
        }
        if !(self.support_threshold.is_finite() && self.support_threshold >= 0.0) {
            return Err(SVMError::InvalidParameter(format!(
                "Support threshold must be non-negative and finite, got: {}",
                self.support_threshold
            )));
        }
        Ok(())
    }
}
